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

use crate::authenticate::AuthenticatorDispatcher;
use crate::client::{Dialer, Ldap3Dialer};
use crate::config::DirectoryConfig;
use crate::connect::Connector;
use crate::groups::GroupResolverDispatcher;
use crate::health::LdapHealth;
use crate::mapping::IdentityMapper;
use crate::provider::LdapIdentityProvider;
use crate::search::UserSearch;
use orgpass_business::health::HealthCheckCommand;
use orgpass_business::identity::{Error, IdentityProvider};
use std::sync::Arc;
use std::time::Duration;

pub fn ldap3_dialer(connect_timeout: Option<Duration>) -> Arc<dyn Dialer> {
    Arc::new(Ldap3Dialer { connect_timeout })
}

pub fn identity_provider(
    config: &DirectoryConfig,
    dialer: Arc<dyn Dialer>,
) -> Result<Arc<dyn IdentityProvider>, Error> {
    config.validate()?;
    Ok(Arc::new(LdapIdentityProvider {
        connector: connector(config, dialer),
        authenticator: AuthenticatorDispatcher::new(&config.bind_dn, &config.bind_password),
        user_search: UserSearch {
            base_dns: config.search_base_dns.clone(),
            filter: config.search_filter.clone(),
            attributes: config.attributes.clone(),
        },
        group_resolver: GroupResolverDispatcher::new(
            &config.attributes.member_of,
            &config.attributes.username,
            &config.group_search_base_dns,
            config.group_search_filter(),
            config.group_search_filter_user_attribute.as_deref(),
        ),
        mapper: IdentityMapper {
            group_mappings: config.group_mappings.clone(),
        },
    }))
}

pub fn health_check(
    config: &DirectoryConfig,
    dialer: Arc<dyn Dialer>,
) -> Result<Arc<dyn HealthCheckCommand>, Error> {
    config.validate()?;
    Ok(Arc::new(LdapHealth {
        connector: connector(config, dialer),
        authenticator: AuthenticatorDispatcher::new(&config.bind_dn, &config.bind_password),
    }))
}

fn connector(config: &DirectoryConfig, dialer: Arc<dyn Dialer>) -> Connector {
    Connector {
        hosts: config
            .hosts
            .iter()
            .map(|host| host.trim())
            .filter(|host| !host.is_empty())
            .map(str::to_owned)
            .collect(),
        port: config.port,
        tls_mode: config.tls_mode,
        tls: config.tls.clone(),
        dialer,
    }
}
