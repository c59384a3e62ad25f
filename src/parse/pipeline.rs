use log::debug;

use super::types::{CommandNode, Pipeline, Token};
use crate::error::ParseError;

/// Group the tokens of one `cmd` unit into pipeline stages.
///
/// Each redirection operator consumes the following word as its target.
/// A lone stage without words becomes the empty-name builtin so that its
/// redirections are still honoured.
pub fn build(tokens: Vec<Token>) -> Result<Pipeline, ParseError> {
    let mut nodes = Vec::new();
    let mut node = CommandNode::default();
    let mut tokens = tokens.into_iter();

    while let Some(token) = tokens.next() {
        match token {
            Token::Word(word) => node.argv.push(word),
            Token::Redirect(op) => match tokens.next() {
                Some(Token::Word(target)) => {
                    debug!("pipeline: {} '{}'", op.as_str(), target);
                    node.redirect(op, target);
                }
                _ => return Err(ParseError::MissingRedirectTarget(op.as_str())),
            },
            Token::Pipe => nodes.push(std::mem::take(&mut node)),
        }
    }
    nodes.push(node);

    if nodes.len() > 1 {
        if nodes.iter().any(|n| n.argv.is_empty()) {
            return Err(ParseError::EmptyPipelineStage);
        }
    } else if nodes[0].argv.is_empty() {
        nodes[0].argv.push(String::new());
    }

    debug!("pipeline: {} stage(s)", nodes.len());
    Ok(Pipeline { nodes })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::parse::tokenize::tokenize;

    fn parse(cmd: &str) -> Result<Pipeline, ParseError> {
        build(tokenize(cmd).unwrap())
    }

    fn argv(node: &CommandNode) -> Vec<&str> {
        node.argv.iter().map(String::as_str).collect()
    }

    #[test]
    fn single_stage() {
        let p = parse("ls -l /tmp").unwrap();
        assert_eq!(p.nodes.len(), 1);
        assert_eq!(p.pipe_count(), 0);
        assert_eq!(argv(&p.nodes[0]), vec!["ls", "-l", "/tmp"]);
    }

    #[test]
    fn splits_on_pipes() {
        let p = parse("cat f | sort | uniq -c").unwrap();
        assert_eq!(p.pipe_count(), 2);
        assert_eq!(argv(&p.nodes[0]), vec!["cat", "f"]);
        assert_eq!(argv(&p.nodes[1]), vec!["sort"]);
        assert_eq!(argv(&p.nodes[2]), vec!["uniq", "-c"]);
    }

    #[test]
    fn attaches_redirections() {
        let p = parse("sort < in > out 2> err").unwrap();
        let node = &p.nodes[0];
        assert_eq!(argv(node), vec!["sort"]);
        assert_eq!(node.input_file, Some(PathBuf::from("in")));
        assert_eq!(node.output_file, Some(PathBuf::from("out")));
        assert!(!node.output_append);
        assert_eq!(node.error_file, Some(PathBuf::from("err")));
    }

    #[test]
    fn append_redirection() {
        let p = parse("echo hi >> log").unwrap();
        assert_eq!(p.nodes[0].output_file, Some(PathBuf::from("log")));
        assert!(p.nodes[0].output_append);
    }

    #[test]
    fn last_redirection_wins() {
        let p = parse("echo hi >> a > b").unwrap();
        assert_eq!(p.nodes[0].output_file, Some(PathBuf::from("b")));
        assert!(!p.nodes[0].output_append);
    }

    #[test]
    fn redirections_belong_to_their_stage() {
        let p = parse("cat < in | sort > out").unwrap();
        assert_eq!(p.nodes[0].input_file, Some(PathBuf::from("in")));
        assert_eq!(p.nodes[0].output_file, None);
        assert_eq!(p.nodes[1].output_file, Some(PathBuf::from("out")));
    }

    #[test]
    fn missing_redirect_target() {
        assert_eq!(parse("echo hi >"), Err(ParseError::MissingRedirectTarget(">")));
        assert_eq!(
            parse("cat 2> | wc"),
            Err(ParseError::MissingRedirectTarget("2>"))
        );
    }

    #[test]
    fn empty_stage_in_pipeline() {
        assert_eq!(parse("ls |"), Err(ParseError::EmptyPipelineStage));
        assert_eq!(parse("| wc"), Err(ParseError::EmptyPipelineStage));
    }

    #[test]
    fn empty_unit_runs_empty_builtin() {
        let p = parse("").unwrap();
        assert_eq!(argv(&p.nodes[0]), vec![""]);
        let p = parse("> out").unwrap();
        assert_eq!(argv(&p.nodes[0]), vec![""]);
        assert_eq!(p.nodes[0].output_file, Some(PathBuf::from("out")));
    }
}
