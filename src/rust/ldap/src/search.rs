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

use crate::client::{DirectoryClient, SearchEntry, SearchRequest};
use crate::config::{AttributeMap, PLACEHOLDER};
use ldap3::{ldap_escape, DerefAliases, Scope};
use log::debug;
use orgpass_business::identity::Error;
use orgpass_business::util::wrap_err;

/// Substituted for the username when listing all users.
const WILDCARD: &str = "*";

pub(crate) struct UserSearch {
    pub(crate) base_dns: Vec<String>,
    pub(crate) filter: String,
    pub(crate) attributes: AttributeMap,
}

impl UserSearch {
    /// Finds exactly one entry for `username`.
    pub(crate) async fn find_user(
        &self,
        ldap: &mut dyn DirectoryClient,
        username: &str,
    ) -> Result<SearchEntry, Error> {
        let filter = substitute(&self.filter, &ldap_escape(username));
        let mut entries = self.search(ldap, &filter).await?;
        match entries.len() {
            0 => {
                debug!("no entry found for '{}'", username);
                Err(Error::InvalidCredentials)
            }
            1 => Ok(entries.remove(0)),
            n => {
                debug!("filter '{}' matched {} entries", filter, n);
                Err(Error::AmbiguousDirectoryMatch)
            }
        }
    }

    pub(crate) async fn find_all(
        &self,
        ldap: &mut dyn DirectoryClient,
    ) -> Result<Vec<SearchEntry>, Error> {
        let filter = substitute(&self.filter, WILDCARD);
        self.search(ldap, &filter).await
    }

    /// Results of the first base DN yielding any entry. Later base DNs are
    /// not queried.
    async fn search(
        &self,
        ldap: &mut dyn DirectoryClient,
        filter: &str,
    ) -> Result<Vec<SearchEntry>, Error> {
        for base_dn in &self.base_dns {
            let request = subtree_search(base_dn, filter, self.requested_attributes());
            debug!("searching in {} for {}", base_dn, filter);
            let entries = ldap.search(&request).await.map_err(wrap_err)?;
            if !entries.is_empty() {
                return Ok(entries);
            }
        }
        Ok(Vec::new())
    }

    fn requested_attributes(&self) -> Vec<String> {
        [
            &self.attributes.username,
            &self.attributes.surname,
            &self.attributes.email,
            &self.attributes.given_name,
            &self.attributes.member_of,
        ]
        .into_iter()
        .filter(|name| !name.is_empty())
        .cloned()
        .collect()
    }
}

pub(crate) fn subtree_search(base_dn: &str, filter: &str, attributes: Vec<String>) -> SearchRequest {
    SearchRequest {
        base_dn: base_dn.to_owned(),
        scope: Scope::Subtree,
        deref_aliases: DerefAliases::Never,
        filter: filter.to_owned(),
        attributes,
    }
}

pub(crate) fn substitute(template: &str, value: &str) -> String {
    template.replace(PLACEHOLDER, value)
}
