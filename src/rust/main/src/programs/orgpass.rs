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

use orgpass_main::cli_parser;
use orgpass_main::cli_parser::FLAG_VERBOSE;
use orgpass_main::config::parser::parse_config;
use orgpass_main::logging;
use orgpass_main::runtime;

use log::error;
use log::info;
use std::process::exit;

fn main() {
    let arguments = cli_parser::parse_arguments();
    let log_config = arguments
        .get_one(cli_parser::FLAG_LOG_CONFIG)
        .map(String::as_str)
        .unwrap_or(cli_parser::FLAG_LOG_DEFAULT);
    logging::initialise(log_config, arguments.get_count(FLAG_VERBOSE));

    let command = match cli_parser::parse_command(&arguments) {
        Err(e) => {
            error!("{}", e);
            exit(2);
        }
        Ok(v) => v,
    };

    let config_path = arguments
        .get_one(cli_parser::FLAG_CONFIG)
        .map(String::as_str)
        .unwrap_or(cli_parser::FLAG_CONFIG_DEFAULT);
    info!("config is at {}", config_path);
    let config = parse_config(config_path);

    if let Err(e) = runtime::run(config, command, std::io::stdin().lock()) {
        error!("{}", e);
        exit(1);
    }
}
