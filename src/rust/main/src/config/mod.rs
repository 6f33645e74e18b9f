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

pub mod parser;

use orgpass_business::identity::{GroupMapping, OrgId, RoleType};
use orgpass_ldap::config::{AttributeMap, DirectoryConfig, TlsMode};
use orgpass_ldap::tls::TlsMaterial;
use serde_derive::Deserialize;
use std::convert::From;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 389;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub ldap: Ldap,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Ldap {
    pub hosts: Vec<String>,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    #[serde(rename = "tls mode")]
    pub tls_mode: Tls,

    #[serde(default)]
    #[serde(rename = "skip verify")]
    pub skip_verify: bool,

    #[serde(default)]
    #[serde(rename = "root ca certs")]
    pub root_ca_certs: Vec<PathBuf>,

    #[serde(default)]
    #[serde(rename = "client cert")]
    pub client_cert: Option<PathBuf>,

    #[serde(default)]
    #[serde(rename = "client key")]
    pub client_key: Option<PathBuf>,

    #[serde(default)]
    #[serde(rename = "connect timeout in seconds")]
    pub connect_timeout_in_seconds: Option<u64>,

    #[serde(default)]
    #[serde(rename = "bind dn")]
    pub bind_dn: String,

    #[serde(default)]
    #[serde(rename = "bind password")]
    pub bind_password: String,

    #[serde(rename = "search base dns")]
    pub search_base_dns: Vec<String>,

    #[serde(rename = "search filter")]
    pub search_filter: String,

    #[serde(default)]
    pub attributes: Attributes,

    #[serde(default)]
    #[serde(rename = "group search base dns")]
    pub group_search_base_dns: Vec<String>,

    #[serde(default)]
    #[serde(rename = "group search filter")]
    pub group_search_filter: Option<String>,

    #[serde(default)]
    #[serde(rename = "group search filter user attribute")]
    pub group_search_filter_user_attribute: Option<String>,

    #[serde(default)]
    #[serde(rename = "group mappings")]
    pub group_mappings: Vec<Mapping>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
pub enum Tls {
    #[default]
    #[serde(rename = "none")]
    None,

    #[serde(rename = "tls")]
    Tls,

    #[serde(rename = "starttls")]
    StartTls,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Attributes {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub surname: String,

    #[serde(default)]
    #[serde(rename = "given name")]
    pub given_name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    #[serde(rename = "member of")]
    pub member_of: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Mapping {
    #[serde(rename = "group dn")]
    pub group_dn: String,

    #[serde(rename = "org id")]
    pub org_id: OrgId,

    #[serde(rename = "org role")]
    pub org_role: RoleType,

    #[serde(default)]
    #[serde(rename = "is admin")]
    pub is_admin: bool,
}

impl From<Tls> for TlsMode {
    fn from(value: Tls) -> Self {
        match value {
            Tls::None => TlsMode::None,
            Tls::Tls => TlsMode::Implicit,
            Tls::StartTls => TlsMode::StartTls,
        }
    }
}

impl From<Attributes> for AttributeMap {
    fn from(value: Attributes) -> Self {
        Self {
            username: value.username,
            surname: value.surname,
            given_name: value.given_name,
            email: value.email,
            member_of: value.member_of,
        }
    }
}

impl From<Mapping> for GroupMapping {
    fn from(value: Mapping) -> Self {
        Self {
            group_dn: value.group_dn,
            org_id: value.org_id,
            org_role: value.org_role,
            is_admin: value.is_admin,
        }
    }
}

impl From<Ldap> for DirectoryConfig {
    fn from(value: Ldap) -> Self {
        Self {
            hosts: value.hosts,
            port: value.port,
            tls_mode: value.tls_mode.into(),
            tls: TlsMaterial {
                skip_verify: value.skip_verify,
                root_ca_certs: value.root_ca_certs,
                client_cert: value.client_cert,
                client_key: value.client_key,
            },
            bind_dn: value.bind_dn,
            bind_password: value.bind_password,
            search_base_dns: value.search_base_dns,
            search_filter: value.search_filter,
            attributes: value.attributes.into(),
            group_search_base_dns: value.group_search_base_dns,
            group_search_filter: value.group_search_filter,
            group_search_filter_user_attribute: value.group_search_filter_user_attribute,
            group_mappings: value.group_mappings.into_iter().map(Into::into).collect(),
        }
    }
}
