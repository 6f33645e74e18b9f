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

use crate::runtime::Command as Job;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use std::collections::BTreeMap;
use thiserror::Error;

pub const FLAG_CONFIG: &str = "config";
pub const FLAG_CONFIG_DEFAULT: &str = "/etc/orgpass/config.yml";

pub const FLAG_LOG_CONFIG: &str = "log";
pub const FLAG_LOG_DEFAULT: &str = "/etc/orgpass/log4rs.yml";

pub const FLAG_VERBOSE: &str = "verbose";

const COMMAND_LOGIN: &str = "login";
const COMMAND_USERS: &str = "users";
const COMMAND_ADD: &str = "add";
const COMMAND_REMOVE: &str = "remove";
const COMMAND_CHECK: &str = "check";

const ARG_USERNAME: &str = "username";
const ARG_DN: &str = "dn";
const ARG_ATTRIBUTE: &str = "attribute";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("attribute '{0}' is not of the form key=value")]
    MalformedAttribute(String),

    #[error("no command given")]
    MissingCommand,
}

pub fn parse_arguments() -> ArgMatches {
    build().get_matches()
}

fn build() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .subcommand_required(true)
        .arg(
            Arg::new(FLAG_CONFIG)
                .short('c')
                .long(FLAG_CONFIG)
                .value_name("PATH")
                .help("The config file to run with")
                .num_args(1)
                .default_value(FLAG_CONFIG_DEFAULT),
        )
        .arg(
            Arg::new(FLAG_LOG_CONFIG)
                .short('l')
                .long(FLAG_LOG_CONFIG)
                .value_name("PATH")
                .help("The log4rs logging configuration")
                .num_args(1)
                .default_value(FLAG_LOG_DEFAULT),
        )
        .arg(
            Arg::new(FLAG_VERBOSE)
                .short('v')
                .long(FLAG_VERBOSE)
                .help("Log more, repeat for even more")
                .action(ArgAction::Count),
        )
        .subcommand(
            Command::new(COMMAND_LOGIN)
                .about("Authenticate a user, the password is read from stdin")
                .arg(
                    Arg::new(ARG_USERNAME)
                        .value_name("USERNAME")
                        .required(true),
                ),
        )
        .subcommand(Command::new(COMMAND_USERS).about("List all users of the directory"))
        .subcommand(
            Command::new(COMMAND_ADD)
                .about("Add an entry to the directory")
                .arg(Arg::new(ARG_DN).value_name("DN").required(true))
                .arg(
                    Arg::new(ARG_ATTRIBUTE)
                        .short('a')
                        .long(ARG_ATTRIBUTE)
                        .value_name("KEY=VALUE")
                        .help("Attribute of the new entry, repeat for multiple values")
                        .action(ArgAction::Append),
                ),
        )
        .subcommand(
            Command::new(COMMAND_REMOVE)
                .about("Remove an entry from the directory")
                .arg(Arg::new(ARG_DN).value_name("DN").required(true)),
        )
        .subcommand(
            Command::new(COMMAND_CHECK).about("Check that the directory is reachable"),
        )
}

pub fn parse_command(arguments: &ArgMatches) -> Result<Job, Error> {
    match arguments.subcommand() {
        Some((COMMAND_LOGIN, arguments)) => Ok(Job::Login {
            username: string(arguments, ARG_USERNAME),
        }),
        Some((COMMAND_USERS, _)) => Ok(Job::Users),
        Some((COMMAND_ADD, arguments)) => Ok(Job::Add {
            dn: string(arguments, ARG_DN),
            attributes: parse_attributes(
                arguments
                    .get_many::<String>(ARG_ATTRIBUTE)
                    .into_iter()
                    .flatten()
                    .map(String::as_str),
            )?,
        }),
        Some((COMMAND_REMOVE, arguments)) => Ok(Job::Remove {
            dn: string(arguments, ARG_DN),
        }),
        Some((COMMAND_CHECK, _)) => Ok(Job::Check),
        _ => Err(Error::MissingCommand),
    }
}

fn string(arguments: &ArgMatches, name: &str) -> String {
    arguments
        .get_one::<String>(name)
        .cloned()
        .unwrap_or_default()
}

/// Groups `key=value` pairs by key. Repeated keys collect multiple values.
fn parse_attributes<'a>(
    pairs: impl Iterator<Item = &'a str>,
) -> Result<BTreeMap<String, Vec<String>>, Error> {
    let mut result: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for pair in pairs {
        match pair.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                result
                    .entry(key.to_owned())
                    .or_default()
                    .push(value.to_owned());
            }
            _ => return Err(Error::MalformedAttribute(pair.to_owned())),
        }
    }
    Ok(result)
}
