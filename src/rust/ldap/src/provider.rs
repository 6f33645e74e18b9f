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

use crate::authenticate::{second_bind, Authenticator, AuthenticatorDispatcher, SecondBind};
use crate::client::DirectoryClient;
use crate::connect::Connector;
use crate::groups::{GroupResolver, GroupResolverDispatcher};
use crate::mapping::IdentityMapper;
use crate::record::DirectoryRecord;
use crate::search::UserSearch;
use async_trait::async_trait;
use log::{debug, info};
use orgpass_business::identity::{ApplicationIdentity, Error, IdentityProvider, LoginQuery};
use orgpass_business::util::wrap_err;
use std::collections::BTreeMap;

pub struct LdapIdentityProvider {
    pub(crate) connector: Connector,
    pub(crate) authenticator: AuthenticatorDispatcher,
    pub(crate) user_search: UserSearch,
    pub(crate) group_resolver: GroupResolverDispatcher,
    pub(crate) mapper: IdentityMapper,
}

impl LdapIdentityProvider {
    async fn login_on(
        &self,
        ldap: &mut dyn DirectoryClient,
        query: &LoginQuery,
    ) -> Result<ApplicationIdentity, Error> {
        let second_bind_required = self
            .authenticator
            .authenticate(ldap, &query.username, &query.password)
            .await?;
        let user = self.user_search.find_user(ldap, &query.username).await?;
        if second_bind_required == SecondBind::Required {
            second_bind(ldap, &user.dn, &query.password).await?;
        }
        let groups = self.group_resolver.resolve(ldap, &user).await?;
        let record = DirectoryRecord::from_entry(&user, &self.user_search.attributes, groups);
        let identity = self.mapper.build(record);
        self.mapper.validate(&identity)?;
        info!("user '{}' logged in as {}", query.username, identity.auth_id);
        Ok(identity)
    }

    async fn list_users_on(
        &self,
        ldap: &mut dyn DirectoryClient,
    ) -> Result<Vec<ApplicationIdentity>, Error> {
        self.authenticator.server_bind(ldap).await?;
        let entries = self.user_search.find_all(ldap).await?;
        debug!("found {} users", entries.len());
        let mut identities = Vec::with_capacity(entries.len());
        for entry in &entries {
            let groups = self.group_resolver.resolve(ldap, entry).await?;
            let record = DirectoryRecord::from_entry(entry, &self.user_search.attributes, groups);
            identities.push(self.mapper.build(record));
        }
        Ok(identities)
    }

    async fn add_entry_on(
        &self,
        ldap: &mut dyn DirectoryClient,
        dn: &str,
        attributes: &BTreeMap<String, Vec<String>>,
    ) -> Result<(), Error> {
        self.authenticator.server_bind(ldap).await?;
        ldap.add(dn, attributes).await.map_err(wrap_err)?;
        info!("added {}", dn);
        Ok(())
    }

    async fn remove_entry_on(&self, ldap: &mut dyn DirectoryClient, dn: &str) -> Result<(), Error> {
        self.authenticator.server_bind(ldap).await?;
        ldap.delete(dn).await.map_err(wrap_err)?;
        info!("removed {}", dn);
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for LdapIdentityProvider {
    async fn login(&self, query: &LoginQuery) -> Result<ApplicationIdentity, Error> {
        if query.password.is_empty() {
            info!("refusing login of '{}' without password", query.username);
            return Err(Error::InvalidCredentials);
        }
        let mut ldap = self.connector.connect().await?;
        let result = self.login_on(ldap.as_mut(), query).await;
        ldap.close().await;
        result
    }

    async fn list_users(&self) -> Result<Vec<ApplicationIdentity>, Error> {
        let mut ldap = self.connector.connect().await?;
        let result = self.list_users_on(ldap.as_mut()).await;
        ldap.close().await;
        result
    }

    async fn add_entry(
        &self,
        dn: &str,
        attributes: &BTreeMap<String, Vec<String>>,
    ) -> Result<(), Error> {
        let mut ldap = self.connector.connect().await?;
        let result = self.add_entry_on(ldap.as_mut(), dn, attributes).await;
        ldap.close().await;
        result
    }

    async fn remove_entry(&self, dn: &str) -> Result<(), Error> {
        let mut ldap = self.connector.connect().await?;
        let result = self.remove_entry_on(ldap.as_mut(), dn).await;
        ldap.close().await;
        result
    }
}
