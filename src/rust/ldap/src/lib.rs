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

//! Resolves users against an LDAP directory and maps their group memberships
//! to organization roles.

mod authenticate;
pub mod client;
pub mod config;
mod connect;
pub mod error;
mod groups;
mod health;
pub mod inject;
mod mapping;
mod provider;
mod record;
mod search;
pub mod tls;

pub use health::LdapHealth;
pub use provider::LdapIdentityProvider;
pub use record::DirectoryRecord;
