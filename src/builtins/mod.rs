//! Commands implemented inside the shell process.
//!
//! Builtins take priority over programs on `PATH` and run without forking,
//! so they can change the shell's own directory, aliases and flags.

mod alias;
mod basic;
mod cd;
mod history;
mod prompt;
mod source;
mod toggle;

use std::fmt::Display;
use std::io::{Read, Write};

use crate::error::ShellError;
use crate::shell::Shell;
use crate::status::{FAILURE, Status};

/// A builtin's entry point. `args` excludes the command name.
pub type BuiltinFn = fn(&mut Shell, &[String], &mut BuiltinIo) -> Status;

/// Builtin table, sorted by name for binary search.
const BUILTINS: &[(&str, BuiltinFn)] = &[
    ("", basic::empty),
    ("F", basic::fail),
    ("T", basic::succeed),
    ("alias", alias::alias),
    ("cd", cd::cd),
    ("color", toggle::color),
    ("debug", toggle::debug),
    ("exit", basic::exit),
    ("history", history::history),
    ("prompt", prompt::prompt),
    ("shcat", basic::shcat),
    ("source", source::source),
    ("unalias", alias::unalias),
];

/// Find the builtin called `name`.
pub fn lookup(name: &str) -> Option<BuiltinFn> {
    BUILTINS
        .binary_search_by(|(n, _)| (*n).cmp(name))
        .ok()
        .map(|i| BUILTINS[i].1)
}

/// Names of all builtins, in table order.
pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|(n, _)| *n)
}

/// Standard streams of a running builtin, already redirected.
pub struct BuiltinIo {
    pub stdin: Box<dyn Read>,
    pub stdout: Box<dyn Write>,
    pub stderr: Box<dyn Write>,
}

impl BuiltinIo {
    /// Print `jsh: <msg>` on the builtin's stderr and return failure.
    pub fn fail(&mut self, msg: impl Display) -> Status {
        let _ = writeln!(self.stderr, "jsh: {msg}");
        FAILURE
    }

    /// Check the argument count, complaining when it is wrong.
    pub fn expect_args(&mut self, name: &str, args: &[String], allowed: &[usize]) -> bool {
        if allowed.contains(&args.len()) {
            return true;
        }
        let expected: Vec<String> = allowed.iter().map(usize::to_string).collect();
        self.fail(ShellError::Usage(format!(
            "{name}: wrong number of arguments (expected {})",
            expected.join(" or ")
        )));
        false
    }
}

/// Parse an `on`/`off` argument.
fn on_off(arg: &str) -> Option<bool> {
    match arg {
        "on" => Some(true),
        "off" => Some(false),
        _ => None,
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{args, io};
    use super::*;

    #[test]
    fn table_is_sorted() {
        let names: Vec<&str> = names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn lookup_finds_every_builtin() {
        for name in names() {
            assert!(lookup(name).is_some(), "missing builtin '{name}'");
        }
        assert!(lookup("ls").is_none());
        assert!(lookup("t").is_none());
    }

    #[test]
    fn wrong_argument_count_is_reported() {
        let (mut io, _, err) = io("");
        assert!(!io.expect_args("cd", &args(&["a", "b"]), &[0, 1]));
        assert_eq!(err.text(), "jsh: cd: wrong number of arguments (expected 0 or 1)\n");
    }

    #[test]
    fn on_off_parsing() {
        assert_eq!(on_off("on"), Some(true));
        assert_eq!(on_off("off"), Some(false));
        assert_eq!(on_off("yes"), None);
    }
}
