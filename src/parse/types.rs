//! Types produced by the parser and consumed by the execution engine.

use std::path::PathBuf;

/// Top-level operator splitting an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `&&`: run the right side only if the left succeeded
    And,
    /// `||`: run the right side only if the left failed
    Or,
    /// `;`: run both sides
    Semi,
    /// `#`: drop everything from here on
    Comment,
}

impl Operator {
    /// The operator's shell syntax.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Semi => ";",
            Operator::Comment => "#",
        }
    }

    /// Number of bytes the operator occupies in the expression.
    pub fn width(&self) -> usize {
        self.as_str().len()
    }
}

/// Stream redirection operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectOp {
    /// `<`
    Input,
    /// `>`
    Output,
    /// `>>`
    Append,
    /// `2>`
    Error,
}

impl RedirectOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectOp::Input => "<",
            RedirectOp::Output => ">",
            RedirectOp::Append => ">>",
            RedirectOp::Error => "2>",
        }
    }
}

/// One lexical unit of a `cmd`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A word with quotes removed and escapes resolved.
    Word(String),
    /// `|`
    Pipe,
    Redirect(RedirectOp),
}

/// One stage of a pipeline: argv plus its explicit stream redirections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandNode {
    /// `argv[0]` is the builtin or program name.
    pub argv: Vec<String>,
    pub input_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    /// Open `output_file` in append mode (`>>`) instead of truncating it.
    pub output_append: bool,
    pub error_file: Option<PathBuf>,
}

impl CommandNode {
    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or("")
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }

    /// Record a redirection. A later redirection of the same stream wins.
    pub fn redirect(&mut self, op: RedirectOp, target: String) {
        let target = PathBuf::from(target);
        match op {
            RedirectOp::Input => self.input_file = Some(target),
            RedirectOp::Output => {
                self.output_file = Some(target);
                self.output_append = false;
            }
            RedirectOp::Append => {
                self.output_file = Some(target);
                self.output_append = true;
            }
            RedirectOp::Error => self.error_file = Some(target),
        }
    }
}

/// Stages connected left to right by pipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub nodes: Vec<CommandNode>,
}

impl Pipeline {
    /// Number of pipes needed to connect the stages.
    pub fn pipe_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}
