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

use crate::record::DirectoryRecord;
use log::error;
use orgpass_business::identity::{ApplicationIdentity, Error, GroupMapping, AUTH_MODULE};
use std::collections::BTreeMap;

pub(crate) struct IdentityMapper {
    pub(crate) group_mappings: Vec<GroupMapping>,
}

impl IdentityMapper {
    pub(crate) fn build(&self, record: DirectoryRecord) -> ApplicationIdentity {
        let mut org_roles = BTreeMap::new();
        let mut is_admin = None;
        for mapping in &self.group_mappings {
            if !is_member_of(&record.member_of, &mapping.group_dn) {
                continue;
            }
            org_roles.entry(mapping.org_id).or_insert(mapping.org_role);
            if mapping.is_admin {
                is_admin = Some(true);
            } else if is_admin.is_none() {
                is_admin = Some(false);
            }
        }

        ApplicationIdentity {
            auth_module: AUTH_MODULE.to_owned(),
            auth_id: record.dn,
            name: format!("{} {}", record.given_name, record.surname),
            login: record.username,
            email: record.email,
            groups: record.member_of,
            org_roles,
            is_admin,
        }
    }

    /// Rejects users without any role if group mappings are configured.
    pub(crate) fn validate(&self, identity: &ApplicationIdentity) -> Result<(), Error> {
        if !self.group_mappings.is_empty() && identity.org_roles.is_empty() {
            error!(
                "user {} does not belong to any of the mapped ldap groups",
                identity.login
            );
            return Err(Error::InvalidCredentials);
        }
        Ok(())
    }
}

fn is_member_of(groups: &[String], group_dn: &str) -> bool {
    group_dn == GroupMapping::WILDCARD
        || groups
            .iter()
            .any(|group| group.eq_ignore_ascii_case(group_dn))
}
