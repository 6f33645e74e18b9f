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

use crate::config::Config;
use log::{error, info};
use orgpass_business::health::inject::health_check;
use orgpass_business::health::HealthCheck;
use orgpass_business::identity::{self, IdentityProvider, LoginQuery};
use orgpass_ldap::config::DirectoryConfig;
use orgpass_ldap::inject::{identity_provider, ldap3_dialer};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    StdIoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    IdentityError(#[from] identity::Error),

    #[error("directory is unhealthy")]
    Unhealthy,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Login {
        username: String,
    },
    Users,
    Add {
        dn: String,
        attributes: BTreeMap<String, Vec<String>>,
    },
    Remove {
        dn: String,
    },
    Check,
}

pub fn run(config: Config, command: Command, input: impl BufRead) -> Result<(), Error> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .thread_name(env!("CARGO_PKG_NAME"))
        .build()
        .map_err(|e| {
            error!("failed to start tokio runtime: {}", e);
            e
        })?;

    let dialer = ldap3_dialer(
        config
            .ldap
            .connect_timeout_in_seconds
            .map(Duration::from_secs),
    );
    let directory = DirectoryConfig::from(config.ldap);
    let provider = identity_provider(&directory, dialer.clone())?;
    let health = health_check(
        "ldap",
        orgpass_ldap::inject::health_check(&directory, dialer)?,
    );

    let password = match command {
        Command::Login { .. } => read_password(input)?,
        _ => String::new(),
    };

    let stdout = std::io::stdout();
    runtime.block_on(execute(
        provider.as_ref(),
        &health,
        command,
        password,
        &mut stdout.lock(),
    ))
}

pub async fn execute(
    provider: &dyn IdentityProvider,
    health: &HealthCheck,
    command: Command,
    password: String,
    output: &mut impl Write,
) -> Result<(), Error> {
    match command {
        Command::Login { username } => {
            let identity = provider
                .login(&LoginQuery { username, password })
                .await?;
            print(output, &identity)
        }
        Command::Users => {
            let identities = provider.list_users().await?;
            info!("listed {} users", identities.len());
            print(output, &identities)
        }
        Command::Add { dn, attributes } => Ok(provider.add_entry(&dn, &attributes).await?),
        Command::Remove { dn } => Ok(provider.remove_entry(&dn).await?),
        Command::Check => {
            let statement = health.execute().await;
            print(output, &BTreeMap::from([(statement.name, statement.state)]))?;
            if statement.state {
                Ok(())
            } else {
                Err(Error::Unhealthy)
            }
        }
    }
}

fn print(output: &mut impl Write, value: &impl Serialize) -> Result<(), Error> {
    serde_json::to_writer_pretty(&mut *output, value)?;
    writeln!(output)?;
    Ok(())
}

/// The first line of `input` without its line terminator.
pub fn read_password(mut input: impl BufRead) -> Result<String, Error> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let password = line.trim_end_matches(|c| c == '\r' || c == '\n');
    Ok(password.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use orgpass_business::health::HealthCheckCommand;
    use orgpass_business::identity::{ApplicationIdentity, RoleType};
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingProvider {
        logins: Mutex<Vec<(String, String)>>,
        removed: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl IdentityProvider for RecordingProvider {
        async fn login(&self, query: &LoginQuery) -> Result<identity::ApplicationIdentity, identity::Error> {
            self.logins
                .lock()
                .unwrap()
                .push((query.username.clone(), query.password.clone()));
            if query.password != "secret" {
                return Err(identity::Error::InvalidCredentials);
            }
            Ok(ApplicationIdentity {
                auth_module: "ldap".to_owned(),
                auth_id: format!("cn={},dc=example,dc=org", query.username),
                login: query.username.clone(),
                org_roles: BTreeMap::from([(1, RoleType::Editor)]),
                ..Default::default()
            })
        }

        async fn list_users(&self) -> Result<Vec<ApplicationIdentity>, identity::Error> {
            Ok(vec![])
        }

        async fn add_entry(
            &self,
            _dn: &str,
            _attributes: &BTreeMap<String, Vec<String>>,
        ) -> Result<(), identity::Error> {
            Ok(())
        }

        async fn remove_entry(&self, dn: &str) -> Result<(), identity::Error> {
            self.removed.lock().unwrap().push(dn.to_owned());
            Ok(())
        }
    }

    struct ConstantCommand(bool);

    #[async_trait]
    impl HealthCheckCommand for ConstantCommand {
        async fn check(&self) -> bool {
            self.0
        }
    }

    #[fixture]
    fn healthy() -> HealthCheck {
        health_check("ldap", Arc::new(ConstantCommand(true)))
    }

    #[rstest]
    #[case("secret\n", "secret")]
    #[case("secret\r\nignored\n", "secret")]
    #[case(" spaced out \n", " spaced out ")]
    #[case("", "")]
    fn password_is_first_line(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(expected, read_password(input.as_bytes()).unwrap());
    }

    #[rstest]
    #[test_log::test(tokio::test)]
    async fn login_prints_identity(healthy: HealthCheck) {
        let provider = RecordingProvider::default();
        let mut output = Vec::new();

        execute(
            &provider,
            &healthy,
            Command::Login {
                username: "alice".to_owned(),
            },
            "secret".to_owned(),
            &mut output,
        )
        .await
        .unwrap();

        let actual: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(
            serde_json::json!({
                "auth_module": "ldap",
                "auth_id": "cn=alice,dc=example,dc=org",
                "name": "",
                "login": "alice",
                "email": "",
                "groups": [],
                "org_roles": {"1": "Editor"}
            }),
            actual
        );
        assert_eq!(
            vec![("alice".to_owned(), "secret".to_owned())],
            *provider.logins.lock().unwrap()
        );
    }

    #[rstest]
    #[test_log::test(tokio::test)]
    async fn failed_login_prints_nothing(healthy: HealthCheck) {
        let provider = RecordingProvider::default();
        let mut output = Vec::new();

        let actual = execute(
            &provider,
            &healthy,
            Command::Login {
                username: "alice".to_owned(),
            },
            "wrong".to_owned(),
            &mut output,
        )
        .await;

        assert!(matches!(
            actual,
            Err(Error::IdentityError(identity::Error::InvalidCredentials))
        ));
        assert!(output.is_empty());
    }

    #[rstest]
    #[test_log::test(tokio::test)]
    async fn remove_is_forwarded(healthy: HealthCheck) {
        let provider = RecordingProvider::default();
        let mut output = Vec::new();

        execute(
            &provider,
            &healthy,
            Command::Remove {
                dn: "cn=bob,dc=example,dc=org".to_owned(),
            },
            String::new(),
            &mut output,
        )
        .await
        .unwrap();

        assert_eq!(
            vec!["cn=bob,dc=example,dc=org".to_owned()],
            *provider.removed.lock().unwrap()
        );
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    #[test_log::test(tokio::test)]
    async fn check_reports_health(#[case] state: bool) {
        let health = health_check("ldap", Arc::new(ConstantCommand(state)));
        let mut output = Vec::new();

        let actual = execute(
            &RecordingProvider::default(),
            &health,
            Command::Check,
            String::new(),
            &mut output,
        )
        .await;

        assert_eq!(state, actual.is_ok());
        let printed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(serde_json::json!({ "ldap": state }), printed);
    }
}
