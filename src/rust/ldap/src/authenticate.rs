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

use crate::client::DirectoryClient;
use crate::config::PLACEHOLDER;
use crate::error::LdapError;
use async_trait::async_trait;
use enum_dispatch::enum_dispatch;
use log::{debug, info};
use orgpass_business::identity::Error;
use orgpass_business::util::wrap_err;

/// Whether the caller's password still has to be verified after the user
/// entry has been found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SecondBind {
    Required,
    NotRequired,
}

#[enum_dispatch(Authenticator)]
pub(crate) enum AuthenticatorDispatcher {
    ServiceBind,
    DirectBind,
}

#[async_trait]
#[enum_dispatch]
pub(crate) trait Authenticator {
    /// Initial bind of a login.
    async fn authenticate(
        &self,
        ldap: &mut dyn DirectoryClient,
        username: &str,
        password: &str,
    ) -> Result<SecondBind, Error>;

    /// Bind for operations not acting on behalf of a user.
    async fn server_bind(&self, ldap: &mut dyn DirectoryClient) -> Result<(), Error>;
}

/// Looks up users with a shared service account and verifies their password
/// with a second bind.
pub(crate) struct ServiceBind {
    pub(crate) bind_dn: String,
    pub(crate) bind_password: String,
}

#[async_trait]
impl Authenticator for ServiceBind {
    async fn authenticate(
        &self,
        ldap: &mut dyn DirectoryClient,
        username: &str,
        _password: &str,
    ) -> Result<SecondBind, Error> {
        let bind_dn = format_bind_dn(&self.bind_dn, username);
        bind(ldap, &bind_dn, &self.bind_password)
            .await
            .map_err(|e| {
                info!("initial bind failed: {}", e);
                e
            })?;
        Ok(SecondBind::Required)
    }

    async fn server_bind(&self, ldap: &mut dyn DirectoryClient) -> Result<(), Error> {
        bind(ldap, &self.bind_dn, &self.bind_password)
            .await
            .map_err(|e| {
                info!("server bind failed: {}", e);
                e
            })
    }
}

/// Binds as the user right away, the bind DN is derived from the username.
pub(crate) struct DirectBind {
    pub(crate) bind_dn_template: String,
}

#[async_trait]
impl Authenticator for DirectBind {
    async fn authenticate(
        &self,
        ldap: &mut dyn DirectoryClient,
        username: &str,
        password: &str,
    ) -> Result<SecondBind, Error> {
        let bind_dn = format_bind_dn(&self.bind_dn_template, username);
        bind(ldap, &bind_dn, password).await.map_err(|e| {
            info!("initial bind failed: {}", e);
            e
        })?;
        Ok(SecondBind::NotRequired)
    }

    async fn server_bind(&self, ldap: &mut dyn DirectoryClient) -> Result<(), Error> {
        // Direct binds are only chosen when no service password is set
        bind(ldap, &self.bind_dn_template, "").await.map_err(|e| {
            info!("server bind failed: {}", e);
            e
        })
    }
}

impl AuthenticatorDispatcher {
    pub(crate) fn new(bind_dn: &str, bind_password: &str) -> Self {
        if !bind_password.is_empty() || bind_dn.is_empty() {
            ServiceBind {
                bind_dn: bind_dn.to_owned(),
                bind_password: bind_password.to_owned(),
            }
            .into()
        } else {
            DirectBind {
                bind_dn_template: bind_dn.to_owned(),
            }
            .into()
        }
    }
}

/// Proves that the caller owns the entry found by a service account search.
/// `password` must be the one the caller supplied, never the service
/// password. An empty password never succeeds.
pub(crate) async fn second_bind(
    ldap: &mut dyn DirectoryClient,
    user_dn: &str,
    password: &str,
) -> Result<(), Error> {
    if password.is_empty() {
        info!("second bind refused for '{}': empty password", user_dn);
        return Err(Error::InvalidCredentials);
    }
    debug!("binding to LDAP as '{}'", user_dn);
    ldap.bind(user_dn, password)
        .await
        .map_err(normalise)
        .map_err(|e| {
            info!("second bind failed: {}", e);
            e
        })
}

async fn bind(ldap: &mut dyn DirectoryClient, dn: &str, password: &str) -> Result<(), Error> {
    let result = if password.is_empty() {
        debug!("binding to LDAP anonymously as '{}'", dn);
        ldap.unauthenticated_bind(dn).await
    } else {
        debug!("binding to LDAP as '{}'", dn);
        ldap.bind(dn, password).await
    };
    result.map_err(normalise)
}

fn normalise(error: LdapError) -> Error {
    if error.is_invalid_credentials() {
        debug!("wrong username or password");
        Error::InvalidCredentials
    } else {
        wrap_err(error)
    }
}

/// The username is inserted verbatim. Templates without placeholder are used
/// as they are.
pub(crate) fn format_bind_dn(template: &str, username: &str) -> String {
    if template.contains(PLACEHOLDER) {
        template.replace(PLACEHOLDER, username)
    } else {
        template.to_owned()
    }
}
