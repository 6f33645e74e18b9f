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

//! The directory client the identity provider drives, and its `ldap3` backed
//! implementation.

use crate::error::LdapError;
use async_trait::async_trait;
use ldap3::{drive, DerefAliases, Ldap, LdapConnAsync, LdapConnSettings, Scope, SearchOptions};
use log::debug;
use rustls::ClientConfig;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub use ldap3::SearchEntry;

pub struct SearchRequest {
    pub base_dn: String,
    pub scope: Scope,
    pub deref_aliases: DerefAliases,
    pub filter: String,
    pub attributes: Vec<String>,
}

/// One open connection to a directory server.
#[async_trait]
pub trait DirectoryClient: Send {
    async fn bind(&mut self, dn: &str, password: &str) -> Result<(), LdapError>;

    async fn unauthenticated_bind(&mut self, dn: &str) -> Result<(), LdapError>;

    async fn add(
        &mut self,
        dn: &str,
        attributes: &BTreeMap<String, Vec<String>>,
    ) -> Result<(), LdapError>;

    async fn delete(&mut self, dn: &str) -> Result<(), LdapError>;

    async fn search(&mut self, request: &SearchRequest) -> Result<Vec<SearchEntry>, LdapError>;

    async fn close(&mut self);
}

#[derive(Clone)]
pub struct TlsSettings {
    pub skip_verify: bool,
    /// Only present if CA certificates or a client certificate are
    /// configured. The platform trust store is used otherwise.
    pub client_config: Option<Arc<ClientConfig>>,
}

#[derive(Clone)]
pub enum Transport {
    Plain,
    Tls(TlsSettings),
    StartTls(TlsSettings),
}

#[async_trait]
pub trait Dialer: Send + Sync {
    /// StartTLS is negotiated as part of dialing. A failed upgrade is a
    /// failed dial.
    async fn dial(
        &self,
        host: &str,
        port: u16,
        transport: &Transport,
    ) -> Result<Box<dyn DirectoryClient>, LdapError>;
}

pub struct Ldap3Dialer {
    pub(crate) connect_timeout: Option<Duration>,
}

impl Ldap3Dialer {
    fn settings(&self, transport: &Transport) -> LdapConnSettings {
        let mut settings = LdapConnSettings::new();
        if let Some(timeout) = self.connect_timeout {
            settings = settings.set_conn_timeout(timeout);
        }
        match transport {
            Transport::Plain => settings,
            Transport::Tls(tls) => apply_tls(settings, tls),
            Transport::StartTls(tls) => apply_tls(settings, tls).set_starttls(true),
        }
    }
}

fn apply_tls(settings: LdapConnSettings, tls: &TlsSettings) -> LdapConnSettings {
    let settings = settings.set_no_tls_verify(tls.skip_verify);
    match &tls.client_config {
        Some(config) => settings.set_config(config.clone()),
        None => settings,
    }
}

#[async_trait]
impl Dialer for Ldap3Dialer {
    async fn dial(
        &self,
        host: &str,
        port: u16,
        transport: &Transport,
    ) -> Result<Box<dyn DirectoryClient>, LdapError> {
        let scheme = match transport {
            Transport::Tls(_) => "ldaps",
            Transport::Plain | Transport::StartTls(_) => "ldap",
        };
        let url = Url::parse(&format!("{}://{}:{}", scheme, host, port))
            .map_err(|e| LdapError::ConnectError(Arc::new(e)))?;

        debug!("connecting to {}", &url);
        let (conn, ldap) = LdapConnAsync::from_url_with_settings(self.settings(transport), &url)
            .await
            .map_err(|e| LdapError::ConnectError(Arc::new(e)))?;
        drive!(conn);
        debug!("connected to {}", &url);
        Ok(Box::new(Ldap3Client { ldap }))
    }
}

pub struct Ldap3Client {
    ldap: Ldap,
}

#[async_trait]
impl DirectoryClient for Ldap3Client {
    async fn bind(&mut self, dn: &str, password: &str) -> Result<(), LdapError> {
        self.ldap.simple_bind(dn, password).await?.success()?;
        Ok(())
    }

    async fn unauthenticated_bind(&mut self, dn: &str) -> Result<(), LdapError> {
        // RFC 4513 5.1.2: a simple bind with a name and an empty password
        self.ldap.simple_bind(dn, "").await?.success()?;
        Ok(())
    }

    async fn add(
        &mut self,
        dn: &str,
        attributes: &BTreeMap<String, Vec<String>>,
    ) -> Result<(), LdapError> {
        let attributes = attributes
            .iter()
            .map(|(name, values)| {
                (
                    name.as_str(),
                    values.iter().map(String::as_str).collect::<HashSet<_>>(),
                )
            })
            .collect::<Vec<_>>();
        self.ldap.add(dn, attributes).await?.success()?;
        Ok(())
    }

    async fn delete(&mut self, dn: &str) -> Result<(), LdapError> {
        self.ldap.delete(dn).await?.success()?;
        Ok(())
    }

    async fn search(&mut self, request: &SearchRequest) -> Result<Vec<SearchEntry>, LdapError> {
        let (entries, _) = self
            .ldap
            .with_search_options(SearchOptions::new().deref(request.deref_aliases))
            .search(
                &request.base_dn,
                request.scope,
                &request.filter,
                request.attributes.clone(),
            )
            .await?
            .success()?;
        Ok(entries.into_iter().map(SearchEntry::construct).collect())
    }

    async fn close(&mut self) {
        if let Err(e) = self.ldap.unbind().await {
            debug!("unbinding failed: {}", e);
        }
    }
}
