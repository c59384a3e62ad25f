//! jsh: a small interactive shell.
//!
//! A line goes through three stages: alias substitution, evaluation of the
//! expression grammar (`;`, `&&`, `||`, `( ... )`, `#`), and execution of each
//! remaining `cmd` unit as a pipeline of builtins and external programs. Every
//! stage reports problems as diagnostics and hands a status back up, so the
//! logical operators always have something to work with.
//!
//! # Architecture
//!
//! - **[`alias`]**: alias table and command-position-aware substitution.
//! - **[`parse`]**: expression evaluator, tokenizer, pipeline builder.
//! - **[`exec`]**: pipe allocation, stream wiring, spawning and reaping.
//! - **[`builtins`]**: sorted builtin table and the builtin commands.
//! - **[`shell`]**: the session object tying the above together.
//! - **[`config`]**: embedded defaults plus user overlay merge.

/// Alias table and resolution.
pub mod alias;
/// In-process commands.
pub mod builtins;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
pub mod error;
/// Pipeline execution.
pub mod exec;
/// Debug tracing setup.
pub mod logging;
/// Expression grammar, tokenizer and pipeline types.
pub mod parse;
pub mod prompt;
/// Session state and line evaluation.
pub mod shell;
/// SIGINT handling.
pub mod signals;
pub mod status;

pub use error::{ParseError, ShellError};
pub use shell::Shell;
pub use status::{FAILURE, SUCCESS, Status};

/// Evaluate one line in a fresh session with only the `~` alias defined.
///
/// This is the main entry point for tests and simple usage.
pub fn evaluate(line: &str) -> Status {
    Shell::new().eval_line(line)
}
