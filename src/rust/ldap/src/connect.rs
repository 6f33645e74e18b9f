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

use crate::client::{DirectoryClient, Dialer, Transport};
use crate::config::TlsMode;
use crate::tls::TlsMaterial;
use log::{debug, warn};
use orgpass_business::identity::Error;
use std::sync::Arc;

pub struct Connector {
    pub(crate) hosts: Vec<String>,
    pub(crate) port: u16,
    pub(crate) tls_mode: TlsMode,
    pub(crate) tls: TlsMaterial,
    pub(crate) dialer: Arc<dyn Dialer>,
}

impl Connector {
    /// Tries all hosts in order and returns the first connection that could
    /// be established. The caller owns the connection and has to close it.
    pub(crate) async fn connect(&self) -> Result<Box<dyn DirectoryClient>, Error> {
        let transport = self.transport()?;
        let mut last_error = None;
        for host in &self.hosts {
            debug!("connecting to {}:{}", host, self.port);
            match self.dialer.dial(host, self.port, &transport).await {
                Err(e) => {
                    warn!("ldap connection to '{}:{}' failed: {}", host, self.port, e);
                    last_error = Some(e);
                }
                Ok(ldap) => {
                    debug!("connected to {}:{}", host, self.port);
                    return Ok(ldap);
                }
            }
        }
        warn!("failed to connect to any backend");
        match last_error {
            Some(e) => Err(Error::Connectivity(Arc::new(e))),
            None => Err(Error::Configuration("no ldap hosts configured".to_owned())),
        }
    }

    fn transport(&self) -> Result<Transport, Error> {
        Ok(match self.tls_mode {
            TlsMode::None => Transport::Plain,
            TlsMode::Implicit => Transport::Tls(self.tls.load()?),
            TlsMode::StartTls => Transport::StartTls(self.tls.load()?),
        })
    }
}
