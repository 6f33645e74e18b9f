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

use crate::identity::Error;
use std::error::Error as StdError;
use std::sync::Arc;

pub fn wrap_err<T: StdError + Send + Sync + 'static>(error: T) -> Error {
    Error::from(Arc::new(error) as Arc<dyn StdError + Send + Sync>)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing_call() -> Result<(), std::fmt::Error> {
        Err(std::fmt::Error)
    }

    fn forward() -> Result<(), Error> {
        failing_call().map_err(wrap_err)?;
        Ok(())
    }

    #[test_log::test]
    fn wrapped_errors_propagate_through_question_mark() {
        assert!(matches!(forward(), Err(Error::BackendErrorWithContext(_))));
    }
}
