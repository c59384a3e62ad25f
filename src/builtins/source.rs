use std::path::Path;

use super::BuiltinIo;
use crate::shell::Shell;
use crate::status::{FAILURE, Status};

/// `source FILE`: evaluate FILE line by line in this shell.
pub fn source(shell: &mut Shell, args: &[String], io: &mut BuiltinIo) -> Status {
    if !io.expect_args("source", args, &[1]) {
        return FAILURE;
    }
    match shell.source_file(Path::new(&args[0])) {
        Ok(status) => status,
        Err(e) => io.fail(e),
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{args, io};
    use super::*;
    use crate::status::SUCCESS;

    #[test]
    fn unreadable_file() {
        let mut sh = Shell::new();
        let (mut io, _, err) = io("");
        assert_eq!(source(&mut sh, &args(&["/nonexistent/jsh/rc"]), &mut io), FAILURE);
        assert!(err.text().starts_with("jsh: opening of file '/nonexistent/jsh/rc' failed"));
    }

    #[test]
    fn defines_aliases_in_the_calling_shell() {
        let dir = tempfile::tempdir().unwrap();
        let rc = dir.path().join("rc");
        std::fs::write(&rc, "alias fine T\nfine\n").unwrap();
        let mut sh = Shell::new();
        let (mut io, _, _) = io("");
        let path = rc.to_string_lossy().into_owned();
        assert_eq!(source(&mut sh, &[path], &mut io), SUCCESS);
        assert_eq!(sh.aliases.get("fine"), Some("T"));
    }
}
