/*  orgpass: LDAP identity resolution and organization role mapping
 *  Copyright (C) 2026 The orgpass developers
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

#[derive(Clone)]
pub struct HealthCheck {
    name: String,
    command: Arc<dyn HealthCheckCommand>,
}

impl HealthCheck {
    pub async fn execute(&self) -> HealthStatement {
        let state = self.command.check().await;
        if state {
            info!("health check '{}' passed", self.name);
        } else {
            warn!("health check '{}' failed", self.name);
        }
        HealthStatement {
            name: self.name.clone(),
            state,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct HealthStatement {
    pub name: String,
    pub state: bool,
}

#[async_trait]
pub trait HealthCheckCommand: Send + Sync {
    async fn check(&self) -> bool;
}

pub mod inject {
    use super::*;
    use std::sync::Arc;

    pub fn health_check(name: &str, command: Arc<dyn HealthCheckCommand>) -> HealthCheck {
        HealthCheck {
            name: name.to_owned(),
            command,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::health::*;
    use pretty_assertions::assert_eq;

    struct ConstantCommand(bool);

    #[async_trait]
    impl HealthCheckCommand for ConstantCommand {
        async fn check(&self) -> bool {
            self.0
        }
    }

    #[test_log::test(tokio::test)]
    async fn statement_carries_name_and_state() {
        let healthy = inject::health_check("ok", Arc::new(ConstantCommand(true)));
        let sick = inject::health_check("nok", Arc::new(ConstantCommand(false)));

        assert_eq!(
            vec![
                HealthStatement {
                    name: "ok".into(),
                    state: true,
                },
                HealthStatement {
                    name: "nok".into(),
                    state: false,
                }
            ],
            vec![healthy.execute().await, sick.execute().await]
        );
    }
}
