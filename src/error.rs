//! Error taxonomy for the shell.
//!
//! None of these cross the expression-evaluation recursion: each failure is
//! printed as a diagnostic and turned into a failure status at the level
//! where it occurred.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Syntax problems found while reducing an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("parse error: unbalanced parenthesis when evaluating '{0}'")]
    UnbalancedParens(String),
    #[error("parse error: unbalanced quoting in '{0}'")]
    UnbalancedQuotes(String),
    #[error("parse error: no file specified after redirection operator '{0}'")]
    MissingRedirectTarget(&'static str),
    #[error("parse error: empty command in pipeline")]
    EmptyPipelineStage,
}

#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("unalias: no such alias key: {0}")]
    NoSuchAlias(String),
    #[error("error opening file '{}': {source}", path.display())]
    Redirect { path: PathBuf, source: io::Error },
    #[error("couldn't execute command '{program}': {source}")]
    Exec { program: String, source: io::Error },
    #[error("{what}: {source}")]
    Resource { what: &'static str, source: io::Error },
    #[error("opening of file '{}' failed: {source}", path.display())]
    Source { path: PathBuf, source: io::Error },
    #[error("source: maximum nesting depth of {0} exceeded")]
    SourceDepth(usize),
    #[error("{0}")]
    Usage(String),
    #[error("config parse error in '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        source: Box<toml::de::Error>,
    },
}

impl ShellError {
    /// Whether the shell cannot safely continue after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ShellError::Resource { .. })
    }
}
