pub mod expr;
pub mod pipeline;
pub mod tokenize;
pub mod types;

pub use expr::{Runner, parse_expr};
pub use pipeline::build;
pub use tokenize::tokenize;
pub use types::{CommandNode, Operator, Pipeline, RedirectOp, Token};

use crate::error::ParseError;

/// Tokenize one `cmd` unit and group it into a [`Pipeline`].
pub fn parse_cmd(cmd: &str) -> Result<Pipeline, ParseError> {
    build(tokenize(cmd)?)
}
