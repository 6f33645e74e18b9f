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

use crate::client::SearchEntry;
use crate::config::AttributeMap;

/// Pseudo attribute naming the entry's distinguished name.
pub(crate) const DN_ATTRIBUTE: &str = "dn";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectoryRecord {
    pub dn: String,
    pub username: String,
    pub surname: String,
    pub given_name: String,
    pub email: String,
    pub member_of: Vec<String>,
}

impl DirectoryRecord {
    pub(crate) fn from_entry(
        entry: &SearchEntry,
        attributes: &AttributeMap,
        member_of: Vec<String>,
    ) -> Self {
        Self {
            dn: entry.dn.clone(),
            username: first_value(entry, &attributes.username),
            surname: first_value(entry, &attributes.surname),
            given_name: first_value(entry, &attributes.given_name),
            email: first_value(entry, &attributes.email),
            member_of,
        }
    }
}

/// First value of the attribute `name`, or an empty string if the entry lacks
/// it. `dn` yields the entry's distinguished name.
pub(crate) fn first_value(entry: &SearchEntry, name: &str) -> String {
    if name.eq_ignore_ascii_case(DN_ATTRIBUTE) {
        return entry.dn.clone();
    }
    if name.is_empty() {
        return String::new();
    }
    entry
        .attrs
        .get(name)
        .and_then(|values| values.first())
        .cloned()
        .unwrap_or_default()
}

pub(crate) fn all_values(entry: &SearchEntry, name: &str) -> Vec<String> {
    if name.is_empty() {
        return Vec::new();
    }
    entry.attrs.get(name).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::fake::entry;
    use pretty_assertions::assert_eq;

    #[test_log::test]
    fn dn_is_a_pseudo_attribute() {
        let uut = entry("cn=alice,dc=example,dc=org", &[("cn", &["alice"])]);

        assert_eq!("cn=alice,dc=example,dc=org", first_value(&uut, "DN"));
        assert_eq!("alice", first_value(&uut, "cn"));
        assert_eq!("", first_value(&uut, "mail"));
        assert_eq!("", first_value(&uut, ""));
    }

    #[test_log::test]
    fn record_is_built_from_configured_attributes() {
        let uut = entry(
            "cn=alice,dc=example,dc=org",
            &[
                ("uid", &["alice"]),
                ("sn", &["Liddell"]),
                ("givenName", &["Alice"]),
                ("mail", &["alice@example.org", "a.liddell@example.org"]),
            ],
        );
        let attributes = AttributeMap {
            username: "uid".to_owned(),
            surname: "sn".to_owned(),
            given_name: "givenName".to_owned(),
            email: "mail".to_owned(),
            member_of: "memberOf".to_owned(),
        };

        let actual = DirectoryRecord::from_entry(&uut, &attributes, vec!["cn=admins".to_owned()]);

        assert_eq!(
            DirectoryRecord {
                dn: "cn=alice,dc=example,dc=org".to_owned(),
                username: "alice".to_owned(),
                surname: "Liddell".to_owned(),
                given_name: "Alice".to_owned(),
                email: "alice@example.org".to_owned(),
                member_of: vec!["cn=admins".to_owned()],
            },
            actual
        );
    }
}
