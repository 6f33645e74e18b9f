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

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::Path;
use std::process::exit;

const EXIT_CODE: i32 = 1;

/// Uses the log4rs configuration at `path` if there is one. Otherwise logs to
/// stderr with a level depending on `verbosity_level`.
pub fn initialise(path: &str, verbosity_level: u8) {
    let result = if Path::new(path).is_file() {
        log4rs::init_file(path, Default::default()).map_err(|e| e.to_string())
    } else {
        initialise_from_verbosity(verbosity_level)
    };
    if let Err(e) = result {
        eprintln!("could not initialise logging: {}", e);
        exit(EXIT_CODE);
    }
}

fn initialise_from_verbosity(verbosity_level: u8) -> Result<(), String> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{level} {m}{n}")))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(
            Root::builder()
                .appender("stderr")
                .build(level(verbosity_level)),
        )
        .map_err(|e| e.to_string())?;

    log4rs::init_config(config)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

fn level(verbosity_level: u8) -> LevelFilter {
    match verbosity_level {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
