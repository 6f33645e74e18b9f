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

use crate::tls::TlsMaterial;
use orgpass_business::identity::{Error, GroupMapping};

/// Placeholder for the username in bind DN and filter templates.
pub const PLACEHOLDER: &str = "%s";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TlsMode {
    #[default]
    None,
    /// TLS right from the start, usually on port 636.
    Implicit,
    StartTls,
}

/// Names of the directory attributes holding the user's properties. Empty
/// names are not requested.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeMap {
    pub username: String,
    pub surname: String,
    pub given_name: String,
    pub email: String,
    pub member_of: String,
}

#[derive(Clone, Debug, Default)]
pub struct DirectoryConfig {
    pub hosts: Vec<String>,
    pub port: u16,
    pub tls_mode: TlsMode,
    pub tls: TlsMaterial,

    pub bind_dn: String,
    pub bind_password: String,

    pub search_base_dns: Vec<String>,
    pub search_filter: String,
    pub attributes: AttributeMap,

    pub group_search_base_dns: Vec<String>,
    pub group_search_filter: Option<String>,
    pub group_search_filter_user_attribute: Option<String>,

    pub group_mappings: Vec<GroupMapping>,
}

impl DirectoryConfig {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.hosts.iter().all(|host| host.trim().is_empty()) {
            return Err(Error::Configuration("no ldap hosts configured".to_owned()));
        }
        if self.search_base_dns.is_empty() {
            return Err(Error::Configuration(
                "no search base dns configured".to_owned(),
            ));
        }
        if self.search_filter.is_empty() {
            return Err(Error::Configuration("no search filter configured".to_owned()));
        }
        if self.group_search_filter().is_some() && self.group_search_base_dns.is_empty() {
            return Err(Error::Configuration(
                "group search filter requires group search base dns".to_owned(),
            ));
        }
        Ok(())
    }

    pub(crate) fn group_search_filter(&self) -> Option<&str> {
        self.group_search_filter
            .as_deref()
            .filter(|filter| !filter.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> DirectoryConfig {
        DirectoryConfig {
            hosts: vec!["localhost".to_owned()],
            port: 389,
            search_base_dns: vec!["dc=example,dc=org".to_owned()],
            search_filter: "(cn=%s)".to_owned(),
            ..Default::default()
        }
    }

    #[test_log::test]
    fn minimal_configuration_is_valid() {
        assert!(valid().validate().is_ok());
    }

    #[test_log::test]
    fn hosts_are_required() {
        let uut = DirectoryConfig {
            hosts: vec![" ".to_owned()],
            ..valid()
        };

        assert!(matches!(uut.validate(), Err(Error::Configuration(_))));
    }

    #[test_log::test]
    fn base_dns_are_required() {
        let uut = DirectoryConfig {
            search_base_dns: vec![],
            ..valid()
        };

        assert!(matches!(uut.validate(), Err(Error::Configuration(_))));
    }

    #[test_log::test]
    fn empty_group_search_filter_means_attribute_strategy() {
        let uut = DirectoryConfig {
            group_search_filter: Some(String::new()),
            ..valid()
        };

        assert!(uut.group_search_filter().is_none());
        assert!(uut.validate().is_ok());
    }

    #[test_log::test]
    fn group_search_needs_base_dns() {
        let uut = DirectoryConfig {
            group_search_filter: Some("(memberUid=%s)".to_owned()),
            ..valid()
        };

        assert!(matches!(uut.validate(), Err(Error::Configuration(_))));
    }
}
