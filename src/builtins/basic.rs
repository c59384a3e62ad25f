use std::io::{ErrorKind, Read, Write};

use super::BuiltinIo;
use crate::parse::Runner;
use crate::shell::Shell;
use crate::status::{FAILURE, SUCCESS, Status};

/// Empty command line.
pub fn empty(_: &mut Shell, _: &[String], _: &mut BuiltinIo) -> Status {
    SUCCESS
}

/// `T`
pub fn succeed(_: &mut Shell, _: &[String], _: &mut BuiltinIo) -> Status {
    SUCCESS
}

/// `F`
pub fn fail(_: &mut Shell, _: &[String], _: &mut BuiltinIo) -> Status {
    FAILURE
}

/// `exit [code]`
pub fn exit(shell: &mut Shell, args: &[String], io: &mut BuiltinIo) -> Status {
    if !io.expect_args("exit", args, &[0, 1]) {
        return FAILURE;
    }
    let code = match args.first() {
        None => SUCCESS,
        Some(arg) => match arg.parse::<Status>() {
            Ok(code) => code,
            Err(_) => return io.fail(format!("exit: numeric argument required: '{arg}'")),
        },
    };
    shell.request_exit(code);
    code
}

/// `shcat`: copy stdin to stdout unchanged.
///
/// A read interrupted by SIGINT ends the copy with a failure; other
/// interrupted reads are retried.
pub fn shcat(shell: &mut Shell, _: &[String], io: &mut BuiltinIo) -> Status {
    let mut buf = [0u8; 8192];
    loop {
        let n = match io.stdin.read(&mut buf) {
            Ok(0) => return SUCCESS,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {
                if shell.cancelled() {
                    return FAILURE;
                }
                continue;
            }
            Err(e) => return io.fail(format!("shcat: {e}")),
        };
        if let Err(e) = io.stdout.write_all(&buf[..n]) {
            return io.fail(format!("shcat: {e}"));
        }
    }
}
