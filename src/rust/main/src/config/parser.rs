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

use crate::config::Config;
use crate::util::read_file as read;

use std::process::exit;

use log::{debug, error};

const EXIT_CODE: i32 = 1;

pub fn parse_config(path: &str) -> Config {
    let raw_config = match read(path) {
        Err(e) => {
            error!("Failed to read file {}: {}", path, e);
            exit(EXIT_CODE);
        }
        Ok(content) => content,
    };
    match parse_raw_config(&raw_config) {
        Err(e) => {
            error!("Could not parse config: ");
            error!("{}", e);
            exit(EXIT_CODE);
        }
        Ok(config) => {
            debug!("parsed configuration of {} hosts", config.ldap.hosts.len());
            config
        }
    }
}

pub fn parse_raw_config(raw_config: &str) -> Result<Config, serde_yaml::Error> {
    serde_yaml::from_str(raw_config)
}
