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

use crate::client::TlsSettings;
use log::{debug, warn};
use orgpass_business::identity::Error;
use rustls::client::{ServerCertVerified, ServerCertVerifier};
use rustls::{Certificate, ClientConfig, PrivateKey, RootCertStore, ServerName};
use rustls_pemfile::Item;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

#[derive(Clone, Debug, Default)]
pub struct TlsMaterial {
    pub skip_verify: bool,
    pub root_ca_certs: Vec<PathBuf>,
    pub client_cert: Option<PathBuf>,
    pub client_key: Option<PathBuf>,
}

impl TlsMaterial {
    /// Reads all configured files. Any unreadable or unparsable file is a
    /// configuration error.
    pub(crate) fn load(&self) -> Result<TlsSettings, Error> {
        let roots = self.root_store()?;
        let client_identity = self.client_identity()?;
        if roots.is_none() && client_identity.is_none() {
            return Ok(TlsSettings {
                skip_verify: self.skip_verify,
                client_config: None,
            });
        }

        let builder = ClientConfig::builder().with_safe_defaults();
        let config = if self.skip_verify {
            let builder = builder.with_custom_certificate_verifier(Arc::new(NoVerification));
            match client_identity {
                None => builder.with_no_client_auth(),
                Some((chain, key)) => builder
                    .with_client_auth_cert(chain, key)
                    .map_err(|e| configuration_error("client certificate is invalid", e))?,
            }
        } else {
            let roots = match roots {
                Some(roots) => roots,
                None => native_root_store()?,
            };
            let builder = builder.with_root_certificates(roots);
            match client_identity {
                None => builder.with_no_client_auth(),
                Some((chain, key)) => builder
                    .with_client_auth_cert(chain, key)
                    .map_err(|e| configuration_error("client certificate is invalid", e))?,
            }
        };
        Ok(TlsSettings {
            skip_verify: self.skip_verify,
            client_config: Some(Arc::new(config)),
        })
    }

    fn root_store(&self) -> Result<Option<RootCertStore>, Error> {
        if self.root_ca_certs.is_empty() {
            return Ok(None);
        }
        let mut store = RootCertStore::empty();
        for path in &self.root_ca_certs {
            let certificates = read_certificates(path)?;
            let (added, _) = store.add_parsable_certificates(&certificates);
            if added == 0 {
                return Err(Error::Configuration(format!(
                    "failed to append CA certificate {}",
                    path.display()
                )));
            }
            debug!("loaded {} CA certificates from {}", added, path.display());
        }
        Ok(Some(store))
    }

    fn client_identity(&self) -> Result<Option<(Vec<Certificate>, PrivateKey)>, Error> {
        let (cert_path, key_path) = match (&self.client_cert, &self.client_key) {
            (Some(cert), Some(key)) => (cert, key),
            (None, None) => return Ok(None),
            _ => {
                warn!("ignoring client certificate, both certificate and key are required");
                return Ok(None);
            }
        };
        let chain = read_certificates(cert_path)?
            .into_iter()
            .map(Certificate)
            .collect::<Vec<_>>();
        if chain.is_empty() {
            return Err(Error::Configuration(format!(
                "no client certificate found in {}",
                cert_path.display()
            )));
        }
        Ok(Some((chain, read_private_key(key_path)?)))
    }
}

fn read_certificates(path: &Path) -> Result<Vec<Vec<u8>>, Error> {
    let file = File::open(path)
        .map_err(|e| configuration_error(&format!("could not read {}", path.display()), e))?;
    rustls_pemfile::certs(&mut BufReader::new(file))
        .map_err(|e| configuration_error(&format!("could not parse {}", path.display()), e))
}

fn read_private_key(path: &Path) -> Result<PrivateKey, Error> {
    let file = File::open(path)
        .map_err(|e| configuration_error(&format!("could not read {}", path.display()), e))?;
    let items = rustls_pemfile::read_all(&mut BufReader::new(file))
        .map_err(|e| configuration_error(&format!("could not parse {}", path.display()), e))?;
    let mut keys = items.into_iter().filter_map(|item| match item {
        Item::RSAKey(key) | Item::PKCS8Key(key) | Item::ECKey(key) => Some(key),
        _ => None,
    });
    match (keys.next(), keys.next()) {
        (Some(key), None) => Ok(PrivateKey(key)),
        (None, _) => Err(Error::Configuration(format!(
            "no private key found in {}",
            path.display()
        ))),
        (Some(_), Some(_)) => Err(Error::Configuration(format!(
            "put only one private key into {}",
            path.display()
        ))),
    }
}

fn native_root_store() -> Result<RootCertStore, Error> {
    let certificates = rustls_native_certs::load_native_certs()
        .map_err(|e| configuration_error("could not load platform CA certificates", e))?;
    let mut store = RootCertStore::empty();
    store.add_parsable_certificates(
        &certificates
            .into_iter()
            .map(|cert| cert.0)
            .collect::<Vec<_>>(),
    );
    Ok(store)
}

fn configuration_error(context: &str, error: impl std::fmt::Display) -> Error {
    Error::Configuration(format!("{}: {}", context, error))
}

struct NoVerification;

impl ServerCertVerifier for NoVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &Certificate,
        _intermediates: &[Certificate],
        _server_name: &ServerName,
        _scts: &mut dyn Iterator<Item = &[u8]>,
        _ocsp_response: &[u8],
        _now: SystemTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("orgpass-tls-{}-{}", std::process::id(), name));
        fs::write(&path, content).unwrap();
        path
    }

    #[test_log::test]
    fn nothing_configured_uses_platform_defaults() {
        let uut = TlsMaterial {
            skip_verify: true,
            ..Default::default()
        };

        let actual = uut.load().unwrap();

        assert!(actual.skip_verify);
        assert!(actual.client_config.is_none());
    }

    #[test_log::test]
    fn missing_ca_file_is_a_configuration_error() {
        let uut = TlsMaterial {
            root_ca_certs: vec![PathBuf::from("/nonexistent/orgpass/ca.pem")],
            ..Default::default()
        };

        let actual = uut.load();

        assert!(matches!(actual, Err(Error::Configuration(_))));
    }

    #[test_log::test]
    fn ca_file_without_certificates_is_a_configuration_error() {
        let path = scratch_file("empty-ca.pem", "this is not a certificate\n");
        let uut = TlsMaterial {
            root_ca_certs: vec![path.clone()],
            ..Default::default()
        };

        let actual = uut.load();

        fs::remove_file(path).unwrap();
        match actual {
            Err(Error::Configuration(message)) => {
                assert!(message.starts_with("failed to append CA certificate"))
            }
            _ => panic!("expected a configuration error"),
        }
    }

    #[test_log::test]
    fn missing_client_certificate_is_a_configuration_error() {
        let uut = TlsMaterial {
            client_cert: Some(PathBuf::from("/nonexistent/orgpass/client.pem")),
            client_key: Some(PathBuf::from("/nonexistent/orgpass/client.key")),
            ..Default::default()
        };

        let actual = uut.load();

        assert!(matches!(actual, Err(Error::Configuration(_))));
    }

    #[test_log::test]
    fn lone_client_key_is_ignored() {
        let uut = TlsMaterial {
            client_key: Some(PathBuf::from("/nonexistent/orgpass/client.key")),
            ..Default::default()
        };

        let actual = uut.load().unwrap();

        assert!(actual.client_config.is_none());
    }
}
