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

use crate::client::{DirectoryClient, SearchEntry};
use crate::record::{all_values, first_value, DN_ATTRIBUTE};
use crate::search::{substitute, subtree_search};
use async_trait::async_trait;
use enum_dispatch::enum_dispatch;
use ldap3::ldap_escape;
use log::{debug, info};
use orgpass_business::identity::Error;
use orgpass_business::util::wrap_err;

const MEMBER_OF: &str = "memberOf";

#[enum_dispatch(GroupResolver)]
pub(crate) enum GroupResolverDispatcher {
    MemberOfAttribute,
    ReverseGroupSearch,
}

#[async_trait]
#[enum_dispatch]
pub(crate) trait GroupResolver {
    /// Group identifiers the user behind `user` is a member of.
    async fn resolve(
        &self,
        ldap: &mut dyn DirectoryClient,
        user: &SearchEntry,
    ) -> Result<Vec<String>, Error>;
}

/// Groups are listed in an attribute of the user entry.
pub(crate) struct MemberOfAttribute {
    pub(crate) attribute: String,
}

#[async_trait]
impl GroupResolver for MemberOfAttribute {
    async fn resolve(
        &self,
        _ldap: &mut dyn DirectoryClient,
        user: &SearchEntry,
    ) -> Result<Vec<String>, Error> {
        Ok(all_values(user, &self.attribute))
    }
}

/// Groups are entries referencing the user, found by a search of their own.
pub(crate) struct ReverseGroupSearch {
    pub(crate) base_dns: Vec<String>,
    pub(crate) filter: String,
    /// Attribute of the user entry substituted into `filter`.
    pub(crate) user_attribute: String,
    /// Attribute of the group entries identifying the group.
    pub(crate) group_id_attribute: String,
}

#[async_trait]
impl GroupResolver for ReverseGroupSearch {
    async fn resolve(
        &self,
        ldap: &mut dyn DirectoryClient,
        user: &SearchEntry,
    ) -> Result<Vec<String>, Error> {
        let value = first_value(user, &self.user_attribute);
        let filter = substitute(&self.filter, &ldap_escape(value.as_str()));
        for base_dn in &self.base_dns {
            info!("searching for groups of {} in {}", user.dn, base_dn);
            let request =
                subtree_search(base_dn, &filter, vec![self.group_id_attribute.clone()]);
            let groups = ldap.search(&request).await.map_err(wrap_err)?;
            if !groups.is_empty() {
                return Ok(groups
                    .iter()
                    .map(|group| first_value(group, &self.group_id_attribute))
                    .collect());
            }
        }
        debug!("no groups found for {}", user.dn);
        Ok(Vec::new())
    }
}

impl GroupResolverDispatcher {
    pub(crate) fn new(
        member_of_attribute: &str,
        username_attribute: &str,
        group_search_base_dns: &[String],
        group_search_filter: Option<&str>,
        group_search_filter_user_attribute: Option<&str>,
    ) -> Self {
        match group_search_filter {
            None => MemberOfAttribute {
                attribute: member_of_attribute.to_owned(),
            }
            .into(),
            Some(filter) => ReverseGroupSearch {
                base_dns: group_search_base_dns.to_vec(),
                filter: filter.to_owned(),
                user_attribute: group_search_filter_user_attribute
                    .filter(|attribute| !attribute.is_empty())
                    .unwrap_or(username_attribute)
                    .to_owned(),
                group_id_attribute: group_id_attribute(member_of_attribute).to_owned(),
            }
            .into(),
        }
    }
}

fn group_id_attribute(member_of_attribute: &str) -> &str {
    if member_of_attribute.is_empty() || member_of_attribute == MEMBER_OF {
        DN_ATTRIBUTE
    } else {
        member_of_attribute
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::fake::{entry, Call, FakeDirectory};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn reverse_search(user_attribute: Option<&str>, member_of: &str) -> GroupResolverDispatcher {
        GroupResolverDispatcher::new(
            member_of,
            "uid",
            &[
                "ou=groups,dc=example,dc=org".to_owned(),
                "ou=teams,dc=example,dc=org".to_owned(),
                "ou=legacy,dc=example,dc=org".to_owned(),
            ],
            Some("(&(objectClass=posixGroup)(memberUid=%s))"),
            user_attribute,
        )
    }

    #[rstest]
    #[case("", "dn")]
    #[case("memberOf", "dn")]
    #[case("cn", "cn")]
    fn group_id_attribute_prefers_dn(#[case] member_of: &str, #[case] expected: &str) {
        assert_eq!(expected, group_id_attribute(member_of));
    }

    #[test_log::test(tokio::test)]
    async fn attribute_strategy_reads_all_values() {
        let uut = GroupResolverDispatcher::new("memberOf", "uid", &[], None, None);
        let user = entry(
            "uid=alice,dc=example,dc=org",
            &[("memberOf", &["cn=admins,dc=example,dc=org", "cn=staff,dc=example,dc=org"])],
        );
        let directory = FakeDirectory::default();

        let actual = uut.resolve(&mut directory.connection(), &user).await.unwrap();

        assert_eq!(
            vec!["cn=admins,dc=example,dc=org", "cn=staff,dc=example,dc=org"],
            actual
        );
        assert!(directory.calls().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn attribute_strategy_without_values_yields_no_groups() {
        let uut = GroupResolverDispatcher::new("memberOf", "uid", &[], None, None);
        let user = entry("uid=alice,dc=example,dc=org", &[]);
        let directory = FakeDirectory::default();

        let actual = uut.resolve(&mut directory.connection(), &user).await.unwrap();

        assert!(actual.is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn reverse_search_collects_group_dns_of_first_matching_base() {
        let uut = reverse_search(None, "memberOf");
        let user = entry("uid=bob,ou=users,dc=example,dc=org", &[("uid", &["bob"])]);
        let filter = "(&(objectClass=posixGroup)(memberUid=bob))";
        let directory = FakeDirectory::default()
            .with_entries(
                "ou=teams,dc=example,dc=org",
                filter,
                vec![
                    entry("cn=devs,ou=teams,dc=example,dc=org", &[]),
                    entry("cn=ops,ou=teams,dc=example,dc=org", &[]),
                ],
            )
            .with_entries(
                "ou=legacy,dc=example,dc=org",
                filter,
                vec![entry("cn=old,ou=legacy,dc=example,dc=org", &[])],
            );

        let actual = uut.resolve(&mut directory.connection(), &user).await.unwrap();

        assert_eq!(
            vec![
                "cn=devs,ou=teams,dc=example,dc=org",
                "cn=ops,ou=teams,dc=example,dc=org"
            ],
            actual
        );
        assert_eq!(
            Call::Search {
                base_dn: "ou=groups,dc=example,dc=org".to_owned(),
                filter: filter.to_owned(),
                attributes: vec!["dn".to_owned()],
            },
            directory.calls()[0]
        );
        assert_eq!(2, directory.searched_base_dns().len());
    }

    #[test_log::test(tokio::test)]
    async fn reverse_search_uses_configured_user_attribute() {
        let uut = reverse_search(Some("dn"), "cn");
        let user = entry("uid=bob,ou=users,dc=example,dc=org", &[("uid", &["bob"])]);
        let directory = FakeDirectory::default().with_entries(
            "ou=groups,dc=example,dc=org",
            "(&(objectClass=posixGroup)(memberUid=uid=bob,ou=users,dc=example,dc=org))",
            vec![entry("cn=devs,ou=groups,dc=example,dc=org", &[("cn", &["devs"])])],
        );

        let actual = uut.resolve(&mut directory.connection(), &user).await.unwrap();

        assert_eq!(vec!["devs"], actual);
    }

    #[test_log::test(tokio::test)]
    async fn reverse_search_escapes_filter_value() {
        let uut = reverse_search(None, "memberOf");
        let user = entry("uid=b*b,dc=example,dc=org", &[("uid", &["b*(b)"])]);
        let directory = FakeDirectory::default();

        let _ = uut.resolve(&mut directory.connection(), &user).await;

        assert_eq!(
            Call::Search {
                base_dn: "ou=groups,dc=example,dc=org".to_owned(),
                filter: "(&(objectClass=posixGroup)(memberUid=b\\2a\\28b\\29))".to_owned(),
                attributes: vec!["dn".to_owned()],
            },
            directory.calls()[0]
        );
    }

    #[test_log::test(tokio::test)]
    async fn reverse_search_without_matches_yields_no_groups() {
        let uut = reverse_search(None, "memberOf");
        let user = entry("uid=carol,dc=example,dc=org", &[("uid", &["carol"])]);
        let directory = FakeDirectory::default();

        let actual = uut.resolve(&mut directory.connection(), &user).await.unwrap();

        assert!(actual.is_empty());
        assert_eq!(3, directory.searched_base_dns().len());
    }
}
