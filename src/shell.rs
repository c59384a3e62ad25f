//! The shell session: every piece of mutable state a line can touch.

use std::fmt::Display;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use crate::alias::AliasTable;
use crate::config::Config;
use crate::error::{ParseError, ShellError};
use crate::exec::streams::Inherited;
use crate::logging;
use crate::parse::{self, Runner};
use crate::prompt::Prompt;
use crate::signals;
use crate::status::{FAILURE, SUCCESS, Status};

/// Maximum nesting of `source` calls.
pub const MAX_SOURCE_DEPTH: usize = 64;

const DEFAULT_PROMPT: &str = "%u@%h:%d%$ ";
const DEFAULT_MAX_DIR_LEN: usize = 25;

const RED: &str = "\x1b[1;31m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    pub debug: bool,
    pub color: bool,
    /// Reading from a terminal.
    pub interactive: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            debug: false,
            color: true,
            interactive: false,
        }
    }
}

pub struct Shell {
    pub aliases: AliasTable,
    pub flags: Flags,
    pub prompt: Prompt,
    /// History lines, oldest first: those loaded at startup, then the ones
    /// entered during this session.
    pub history: Vec<String>,
    session_history: usize,
    home: Option<PathBuf>,
    last_status: Status,
    exit_code: Option<Status>,
    source_depth: usize,
    watch_interrupts: bool,
    /// Where unredirected streams go; a running builtin's redirections.
    pub(crate) streams: Inherited,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    /// A session with only the `~` alias defined.
    pub fn new() -> Self {
        let home = std::env::var_os("HOME").map(PathBuf::from);
        let mut aliases = AliasTable::new();
        if let Some(home) = &home {
            let _ = aliases.define("~", &home.to_string_lossy());
        }
        Self {
            aliases,
            flags: Flags::default(),
            prompt: Prompt::new(DEFAULT_PROMPT, DEFAULT_MAX_DIR_LEN),
            history: Vec::new(),
            session_history: 0,
            home,
            last_status: SUCCESS,
            exit_code: None,
            source_depth: 0,
            watch_interrupts: false,
            streams: Inherited::default(),
        }
    }

    /// A session set up from configuration: flags, prompt and aliases.
    pub fn from_config(config: &Config) -> Self {
        let mut shell = Self::new();
        let s = &config.settings;
        shell.flags.debug = s.debug;
        shell.flags.color = s.color;
        if !s.prompt.is_empty() {
            shell.prompt = Prompt::new(s.prompt.clone(), s.max_dir_length);
        }
        for alias in &config.aliases {
            if let Err(e) = shell.aliases.define(&alias.name, &alias.value) {
                shell.report(&e);
            }
        }
        shell
    }

    /// Let SIGINT cancel the line being evaluated.
    pub fn watch_interrupts(&mut self, on: bool) {
        self.watch_interrupts = on;
    }

    pub fn home_dir(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    pub fn last_status(&self) -> Status {
        self.last_status
    }

    /// Prepend lines saved by an earlier session.
    pub fn seed_history<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let session = self.history.split_off(self.history.len() - self.session_history);
        self.history.extend(lines.into_iter().map(Into::into));
        self.history.extend(session);
    }

    /// Record a line typed by the user.
    pub fn record_history(&mut self, line: &str) {
        if !line.trim().is_empty() {
            self.history.push(line.to_string());
            self.session_history += 1;
        }
    }

    /// Number of lines recorded since the shell started.
    pub fn session_history(&self) -> usize {
        self.session_history
    }

    /// Resolve aliases in `line` and evaluate it.
    pub fn eval_line(&mut self, line: &str) -> Status {
        let resolved = self.aliases.resolve(line);
        let status = parse::parse_expr(self, &resolved);
        self.last_status = status;
        status
    }

    /// Evaluate every line of `path` in order; the status is the last line's.
    pub fn source_file(&mut self, path: &Path) -> Result<Status, ShellError> {
        if self.source_depth >= MAX_SOURCE_DEPTH {
            return Err(ShellError::SourceDepth(MAX_SOURCE_DEPTH));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ShellError::Source {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("source: evaluating '{}'", path.display());

        self.source_depth += 1;
        let mut status = SUCCESS;
        for line in content.lines() {
            if self.cancelled() {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }
            status = self.eval_line(line);
        }
        self.source_depth -= 1;
        Ok(status)
    }

    /// Stop evaluating and leave the shell with `code`.
    pub fn request_exit(&mut self, code: Status) {
        debug!("shell: exit requested with status {code}");
        self.exit_code = Some(code);
    }

    pub fn exit_code(&self) -> Option<Status> {
        self.exit_code
    }

    pub fn set_debug(&mut self, on: bool) {
        self.flags.debug = on;
        logging::set_debug(on);
    }

    pub fn set_color(&mut self, on: bool) {
        self.flags.color = on;
    }

    /// Print a diagnostic on stderr, following a builtin's `2>` if one is
    /// in effect.
    pub fn report(&self, err: &dyn Display) {
        if let Some(mut stderr) = self.streams.stderr() {
            let _ = writeln!(stderr, "jsh: {err}");
        } else if self.flags.color && self.flags.interactive {
            eprintln!("{RED}jsh: {err}{RESET}");
        } else {
            eprintln!("jsh: {err}");
        }
    }

    /// Print a diagnostic and end the process.
    pub fn fatal(&self, err: ShellError) -> ! {
        self.report(&err);
        std::process::exit(FAILURE);
    }
}

impl Runner for Shell {
    fn run_cmd(&mut self, cmd: &str) -> Status {
        match parse::parse_cmd(cmd) {
            Ok(pipeline) => self.execute(pipeline),
            Err(e) => {
                self.parse_error(e);
                FAILURE
            }
        }
    }

    fn parse_error(&mut self, err: ParseError) {
        self.report(&err);
    }

    fn cancelled(&self) -> bool {
        self.exit_code.is_some() || (self.watch_interrupts && signals::interrupted())
    }
}
