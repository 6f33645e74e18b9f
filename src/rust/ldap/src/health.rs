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

use crate::authenticate::{Authenticator, AuthenticatorDispatcher};
use crate::connect::Connector;
use async_trait::async_trait;
use log::warn;
use orgpass_business::health::HealthCheckCommand;

pub struct LdapHealth {
    pub(crate) connector: Connector,
    pub(crate) authenticator: AuthenticatorDispatcher,
}

#[async_trait]
impl HealthCheckCommand for LdapHealth {
    async fn check(&self) -> bool {
        let mut ldap = match self.connector.connect().await {
            Err(e) => {
                warn!("ldap health check failed: {}", e);
                return false;
            }
            Ok(ldap) => ldap,
        };
        let result = self.authenticator.server_bind(ldap.as_mut()).await;
        ldap.close().await;
        match result {
            Err(e) => {
                warn!("ldap health check failed: {}", e);
                false
            }
            Ok(()) => true,
        }
    }
}
