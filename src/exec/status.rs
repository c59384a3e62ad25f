use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use crate::status::{FAILURE, Status};

/// Exit code of a reaped child, or the signal number that killed it.
pub fn decode(status: ExitStatus) -> Status {
    status.code().or_else(|| status.signal()).unwrap_or(FAILURE)
}
