use std::io::Write;

use super::BuiltinIo;
use crate::shell::Shell;
use crate::status::{FAILURE, SUCCESS, Status};

/// `alias` lists every alias; `alias KEY VALUE...` defines one.
pub fn alias(shell: &mut Shell, args: &[String], io: &mut BuiltinIo) -> Status {
    match args {
        [] => {
            for a in shell.aliases.list() {
                if writeln!(io.stdout, "alias {} = '{}'", a.key, a.value).is_err() {
                    return FAILURE;
                }
            }
            SUCCESS
        }
        [_] => {
            io.expect_args("alias", args, &[0, 2]);
            FAILURE
        }
        [key, value @ ..] => match shell.aliases.define(key, &value.join(" ")) {
            Ok(()) => SUCCESS,
            Err(e) => io.fail(e),
        },
    }
}

/// `unalias KEY`
pub fn unalias(shell: &mut Shell, args: &[String], io: &mut BuiltinIo) -> Status {
    if !io.expect_args("unalias", args, &[1]) {
        return FAILURE;
    }
    match shell.aliases.remove(&args[0]) {
        Ok(()) => SUCCESS,
        Err(e) => io.fail(e),
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{args, io};
    use super::*;

    fn bare_shell() -> Shell {
        let mut sh = Shell::new();
        let _ = sh.aliases.remove("~");
        sh
    }

    #[test]
    fn define_then_list() {
        let mut sh = bare_shell();
        let (mut io, out, _) = io("");
        assert_eq!(alias(&mut sh, &args(&["ll", "ls -l"]), &mut io), SUCCESS);
        assert_eq!(alias(&mut sh, &args(&["g", "git", "status"]), &mut io), SUCCESS);
        assert_eq!(alias(&mut sh, &[], &mut io), SUCCESS);
        assert_eq!(out.text(), "alias ll = 'ls -l'\nalias g = 'git status'\n");
    }

    #[test]
    fn single_argument_is_rejected() {
        let mut sh = bare_shell();
        let (mut io, _, err) = io("");
        assert_eq!(alias(&mut sh, &args(&["ll"]), &mut io), FAILURE);
        assert!(err.text().contains("wrong number of arguments"));
        assert!(sh.aliases.is_empty());
    }

    #[test]
    fn unalias_round_trip() {
        let mut sh = bare_shell();
        let (mut io, _, _) = io("");
        alias(&mut sh, &args(&["ll", "ls -l"]), &mut io);
        assert_eq!(unalias(&mut sh, &args(&["ll"]), &mut io), SUCCESS);
        assert!(sh.aliases.is_empty());
    }

    #[test]
    fn unalias_missing_key_fails() {
        let mut sh = bare_shell();
        let (mut io, _, err) = io("");
        assert_eq!(unalias(&mut sh, &args(&["nope"]), &mut io), FAILURE);
        assert_eq!(err.text(), "jsh: unalias: no such alias key: nope\n");
    }
}
