use std::io::Write;

use super::BuiltinIo;
use crate::shell::Shell;
use crate::status::{FAILURE, SUCCESS, Status};

/// `history` lists every history line, including those loaded at startup.
/// `history --nb-entries` counts only the lines entered in this session.
pub fn history(shell: &mut Shell, args: &[String], io: &mut BuiltinIo) -> Status {
    if !io.expect_args("history", args, &[0, 1]) {
        return FAILURE;
    }
    let written = match args.first().map(String::as_str) {
        None => shell
            .history
            .iter()
            .try_for_each(|line| writeln!(io.stdout, "{line}")),
        Some("--nb-entries") => writeln!(io.stdout, "{}", shell.session_history()),
        Some(other) => return io.fail(format!("history: unknown option '{other}'")),
    };
    match written {
        Ok(()) => SUCCESS,
        Err(e) => io.fail(format!("history: {e}")),
    }
}
