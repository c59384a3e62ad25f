use std::path::PathBuf;

use log::debug;

use super::BuiltinIo;
use crate::shell::Shell;
use crate::status::{FAILURE, SUCCESS, Status};

/// `cd [DIR]`: without an argument, go home.
pub fn cd(shell: &mut Shell, args: &[String], io: &mut BuiltinIo) -> Status {
    if !io.expect_args("cd", args, &[0, 1]) {
        return FAILURE;
    }
    let target = match args.first() {
        Some(dir) => PathBuf::from(dir),
        None => shell
            .home_dir()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    match std::env::set_current_dir(&target) {
        Ok(()) => {
            debug!("cd: now in '{}'", target.display());
            SUCCESS
        }
        Err(e) => io.fail(format!("cd: {}: {e}", target.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{args, io};
    use super::*;

    // The working directory is process-wide; only the failure path is
    // exercised here so parallel tests keep their directory.
    #[test]
    fn missing_directory_fails() {
        let mut sh = Shell::new();
        let (mut io, _, err) = io("");
        let before = std::env::current_dir().unwrap();
        assert_eq!(cd(&mut sh, &args(&["/nonexistent/jsh/dir"]), &mut io), FAILURE);
        assert!(err.text().starts_with("jsh: cd: /nonexistent/jsh/dir: "));
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn too_many_arguments() {
        let mut sh = Shell::new();
        let (mut io, _, _) = io("");
        assert_eq!(cd(&mut sh, &args(&["a", "b"]), &mut io), FAILURE);
    }
}
