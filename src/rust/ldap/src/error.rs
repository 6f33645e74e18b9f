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

use std::error::Error as StdError;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use thiserror::Error;

/// LDAP result codes with a meaning of their own. Everything else is carried along
/// unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultCode {
    Success,
    InvalidCredentials,
    Other(u32),
}

impl From<u32> for ResultCode {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::Success,
            49 => Self::InvalidCredentials,
            v => Self::Other(v),
        }
    }
}

impl Display for ResultCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "0 (success)"),
            Self::InvalidCredentials => write!(f, "49 (invalid credentials)"),
            Self::Other(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum LdapError {
    #[error("ldap operation failed with result code {code}: {text}")]
    Result { code: ResultCode, text: String },

    #[error("ldap connection failed: {0}")]
    ConnectError(Arc<dyn StdError + Send + Sync>),

    #[error("ldap protocol error: {0}")]
    ProtocolError(Arc<dyn StdError + Send + Sync>),
}

impl LdapError {
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(
            self,
            Self::Result {
                code: ResultCode::InvalidCredentials,
                ..
            }
        )
    }
}

impl From<ldap3::LdapError> for LdapError {
    fn from(error: ldap3::LdapError) -> Self {
        match error {
            ldap3::LdapError::LdapResult { result } => Self::Result {
                code: result.rc.into(),
                text: result.text,
            },
            e => Self::ProtocolError(Arc::new(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test_log::test]
    fn numeric_codes_are_named() {
        assert_eq!(ResultCode::Success, ResultCode::from(0u32));
        assert_eq!(ResultCode::InvalidCredentials, ResultCode::from(49u32));
        assert_eq!(ResultCode::Other(32), ResultCode::from(32u32));
    }

    #[test_log::test]
    fn only_code_49_counts_as_invalid_credentials() {
        let rejected = LdapError::Result {
            code: ResultCode::InvalidCredentials,
            text: String::new(),
        };
        let unwilling = LdapError::Result {
            code: ResultCode::Other(53),
            text: "unwilling to perform".to_owned(),
        };

        assert!(rejected.is_invalid_credentials());
        assert!(!unwilling.is_invalid_credentials());
        assert_eq!(
            "ldap operation failed with result code 53: unwilling to perform",
            unwilling.to_string()
        );
    }
}
