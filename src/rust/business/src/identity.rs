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
use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use thiserror::Error;

pub const AUTH_MODULE: &str = "ldap";

pub type OrgId = i64;

#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Identical for a rejected bind, an unknown user and a
    /// user without any mapped group.
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("ldap search matched more than one entry, please review your filter setting")]
    AmbiguousDirectoryMatch,

    #[error("no ldap server could be reached: {0}")]
    Connectivity(Arc<dyn StdError + Send + Sync>),

    #[error("invalid ldap configuration: {0}")]
    Configuration(String),

    #[error("backend error: {0}")]
    BackendErrorWithContext(#[from] Arc<dyn StdError + Send + Sync>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoleType {
    Viewer,
    Editor,
    Admin,
}

impl Display for RoleType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Viewer => write!(f, "Viewer"),
            Self::Editor => write!(f, "Editor"),
            Self::Admin => write!(f, "Admin"),
        }
    }
}

/// Grants `org_role` in `org_id` to every member of `group_dn`.
///
/// Mappings are evaluated in the order they are configured. The first
/// matching mapping of an organization decides the role in it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupMapping {
    pub group_dn: String,
    pub org_id: OrgId,
    pub org_role: RoleType,
    pub is_admin: bool,
}

impl GroupMapping {
    /// Matches every user, regardless of their groups.
    pub const WILDCARD: &'static str = "*";
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationIdentity {
    pub auth_module: String,
    pub auth_id: String,
    pub name: String,
    pub login: String,
    pub email: String,
    pub groups: Vec<String>,
    pub org_roles: BTreeMap<OrgId, RoleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
}

pub struct LoginQuery {
    pub username: String,
    pub password: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// An empty password fails with [`Error::InvalidCredentials`] without
    /// contacting the directory.
    async fn login(&self, query: &LoginQuery) -> Result<ApplicationIdentity, Error>;

    async fn list_users(&self) -> Result<Vec<ApplicationIdentity>, Error>;

    async fn add_entry(
        &self,
        dn: &str,
        attributes: &BTreeMap<String, Vec<String>>,
    ) -> Result<(), Error>;

    async fn remove_entry(&self, dn: &str) -> Result<(), Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::wrap_err;
    use pretty_assertions::assert_eq;

    #[test_log::test]
    fn identity_serialises_roles_by_org() {
        let identity = ApplicationIdentity {
            auth_module: AUTH_MODULE.to_owned(),
            auth_id: "cn=alice,dc=example,dc=org".to_owned(),
            name: "Alice Liddell".to_owned(),
            login: "alice".to_owned(),
            email: "alice@example.org".to_owned(),
            groups: vec!["cn=admins".to_owned()],
            org_roles: BTreeMap::from([(1, RoleType::Admin), (2, RoleType::Viewer)]),
            is_admin: Some(true),
        };

        let actual = serde_json::to_value(&identity).unwrap();

        assert_eq!(
            serde_json::json!({
                "auth_module": "ldap",
                "auth_id": "cn=alice,dc=example,dc=org",
                "name": "Alice Liddell",
                "login": "alice",
                "email": "alice@example.org",
                "groups": ["cn=admins"],
                "org_roles": {"1": "Admin", "2": "Viewer"},
                "is_admin": true
            }),
            actual
        );
    }

    #[test_log::test]
    fn unset_admin_flag_is_omitted() {
        let actual = serde_json::to_value(ApplicationIdentity::default()).unwrap();

        assert!(actual.get("is_admin").is_none());
    }

    #[test_log::test]
    fn roles_are_read_by_name() {
        let actual: Vec<RoleType> = serde_yaml::from_str("[Viewer, Editor, Admin]").unwrap();

        assert_eq!(
            vec![RoleType::Viewer, RoleType::Editor, RoleType::Admin],
            actual
        );
    }

    #[test_log::test]
    fn invalid_credentials_do_not_reveal_cause() {
        assert_eq!(
            "invalid username or password",
            Error::InvalidCredentials.to_string()
        );
    }

    #[test_log::test]
    fn foreign_errors_are_wrapped_as_context() {
        let error: Error = wrap_err(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "reset",
        ));

        assert!(matches!(error, Error::BackendErrorWithContext(_)));
        assert_eq!("backend error: reset", error.to_string());
    }
}
