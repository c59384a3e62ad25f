//! Recursive evaluation of the `expr` grammar.
//!
//! The evaluator never builds a tree: it resolves a leading `( ... )` group
//! to a `T`/`F` token, splits on the first top-level operator, and recurses.
//! Whatever remains without operators is a `cmd` unit handed to the
//! [`Runner`].

use log::debug;

use super::types::Operator;
use crate::error::ParseError;
use crate::status::{FAILURE, SUCCESS, Status, truth_token};

/// The side of evaluation that actually runs things.
pub trait Runner {
    /// Run one `cmd` unit (pipes and redirections, no expression operators).
    fn run_cmd(&mut self, cmd: &str) -> Status;

    /// Report a syntax error found while reducing the expression.
    fn parse_error(&mut self, err: ParseError);

    /// When true, the rest of the expression is abandoned with failure status.
    fn cancelled(&self) -> bool {
        false
    }
}

/// Evaluate `expr` and return its status.
pub fn parse_expr<R: Runner + ?Sized>(runner: &mut R, expr: &str) -> Status {
    if runner.cancelled() {
        debug!("parser: cancelled, dropping '{expr}'");
        return FAILURE;
    }
    let expr = expr.trim_start_matches([' ', '\t', '\n']);

    if expr.starts_with('(') {
        let Some(close) = matching_paren(expr) else {
            runner.parse_error(ParseError::UnbalancedParens(expr.trim_end().to_string()));
            return FAILURE;
        };
        let inner = &expr[1..close];
        debug!("parser: resolving bracket '({inner})'");
        let status = parse_expr(runner, inner);
        let rewritten = format!("{}{}", truth_token(status), &expr[close + 1..]);
        debug!("parser: bracket resolved to '{rewritten}'");
        return parse_expr(runner, &rewritten);
    }

    let Some((at, op)) = find_operator(expr) else {
        return runner.run_cmd(expr);
    };

    if op == Operator::Comment {
        debug!("parser: dropping comment '{}'", &expr[at..]);
        return parse_expr(runner, &expr[..at]);
    }

    let (left, right) = (&expr[..at], &expr[at + op.width()..]);
    debug!("parser: '{}' split into '{left}' and '{right}'", op.as_str());
    let status = parse_expr(runner, left);
    match op {
        Operator::And if status != SUCCESS => status,
        Operator::Or if status == SUCCESS => SUCCESS,
        _ => parse_expr(runner, right),
    }
}

/// Byte offset of the `)` closing the `(` at offset 0.
fn matching_paren(expr: &str) -> Option<usize> {
    let (mut depth, mut esc, mut dq) = (0usize, false, false);
    for (i, c) in expr.char_indices() {
        if esc {
            esc = false;
            continue;
        }
        match c {
            '\\' => esc = true,
            '"' => dq = !dq,
            _ if dq => {}
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// First unquoted, unescaped operator in left-to-right order.
fn find_operator(expr: &str) -> Option<(usize, Operator)> {
    let bytes = expr.as_bytes();
    let (mut esc, mut dq) = (false, false);
    for (i, c) in expr.char_indices() {
        if esc {
            esc = false;
            continue;
        }
        let next = bytes.get(i + 1).copied();
        let op = match c {
            '\\' => {
                esc = true;
                continue;
            }
            '"' => {
                dq = !dq;
                continue;
            }
            _ if dq => continue,
            '#' => Operator::Comment,
            ';' => Operator::Semi,
            '&' if next == Some(b'&') => Operator::And,
            '|' if next == Some(b'|') => Operator::Or,
            _ => continue,
        };
        return Some((i, op));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every `cmd` unit it is asked to run. `T` and `F` behave like
    /// the builtins, `fail` fails, anything else succeeds.
    #[derive(Default)]
    struct Recorder {
        ran: Vec<String>,
        errors: Vec<ParseError>,
        cancel_after: Option<usize>,
    }

    impl Runner for Recorder {
        fn run_cmd(&mut self, cmd: &str) -> Status {
            let cmd = cmd.trim().to_string();
            let status = match cmd.as_str() {
                "F" | "fail" => FAILURE,
                _ => SUCCESS,
            };
            self.ran.push(cmd);
            status
        }

        fn parse_error(&mut self, err: ParseError) {
            self.errors.push(err);
        }

        fn cancelled(&self) -> bool {
            self.cancel_after.is_some_and(|n| self.ran.len() >= n)
        }
    }

    fn eval(expr: &str) -> (Status, Recorder) {
        let mut r = Recorder::default();
        let status = parse_expr(&mut r, expr);
        (status, r)
    }

    #[test]
    fn literals() {
        assert_eq!(eval("T").0, SUCCESS);
        assert_eq!(eval("F").0, FAILURE);
    }

    #[test]
    fn plain_command_is_passed_through() {
        let (status, r) = eval("  ls -l | wc");
        assert_eq!(status, SUCCESS);
        assert_eq!(r.ran, vec!["ls -l | wc"]);
    }

    #[test]
    fn and_short_circuits() {
        let (status, r) = eval("F && touched");
        assert_eq!(status, FAILURE);
        assert_eq!(r.ran, vec!["F"]);
        let (status, r) = eval("T && F");
        assert_eq!(status, FAILURE);
        assert_eq!(r.ran, vec!["T", "F"]);
    }

    #[test]
    fn or_short_circuits() {
        let (status, r) = eval("T || touched");
        assert_eq!(status, SUCCESS);
        assert_eq!(r.ran, vec!["T"]);
        let (status, r) = eval("F || T");
        assert_eq!(status, SUCCESS);
        assert_eq!(r.ran, vec!["F", "T"]);
    }

    #[test]
    fn semicolon_runs_both_and_returns_right() {
        let (status, r) = eval("fail ; ok");
        assert_eq!(status, SUCCESS);
        assert_eq!(r.ran, vec!["fail", "ok"]);
        assert_eq!(eval("ok ; fail").0, FAILURE);
    }

    #[test]
    fn operators_split_left_to_right() {
        // Splits at `&&` first: "F" && ("x || y").
        let (status, r) = eval("F && x || y");
        assert_eq!(status, FAILURE);
        assert_eq!(r.ran, vec!["F"]);
    }

    #[test]
    fn groups_become_truth_tokens() {
        assert_eq!(eval("(F) || (T)").0, SUCCESS);
        assert_eq!(eval("(T) && (F)").0, FAILURE);
        let (status, r) = eval("(F) && (touched)");
        assert_eq!(status, FAILURE);
        assert!(!r.ran.contains(&"touched".to_string()));
    }

    #[test]
    fn nested_groups() {
        let (status, r) = eval("((a && F) || b) && c");
        assert_eq!(status, SUCCESS);
        assert_eq!(r.ran, vec!["a", "F", "F", "b", "T", "c"]);
    }

    #[test]
    fn unbalanced_parens_run_nothing() {
        let (status, r) = eval("(echo hi");
        assert_eq!(status, FAILURE);
        assert!(r.ran.is_empty());
        assert_eq!(r.errors, vec![ParseError::UnbalancedParens("(echo hi".into())]);
    }

    #[test]
    fn comment_truncates() {
        let (status, r) = eval("ok # fail && more");
        assert_eq!(status, SUCCESS);
        assert_eq!(r.ran, vec!["ok"]);
    }

    #[test]
    fn quoted_operators_are_ignored() {
        let (_, r) = eval("echo \"a && b; #c\" && d");
        assert_eq!(r.ran, vec!["echo \"a && b; #c\"", "d"]);
    }

    #[test]
    fn escaped_operators_are_ignored() {
        let (_, r) = eval("echo a \\; b");
        assert_eq!(r.ran, vec!["echo a \\; b"]);
    }

    #[test]
    fn quoted_parens_do_not_count() {
        let (status, r) = eval("(echo \")\")");
        assert_eq!(status, SUCCESS);
        assert_eq!(r.ran, vec!["echo \")\"", "T"]);
    }

    #[test]
    fn single_pipe_is_not_an_operator() {
        assert_eq!(find_operator("a | b"), None);
        assert_eq!(find_operator("a || b"), Some((2, Operator::Or)));
        assert_eq!(find_operator("a & b"), None);
    }

    #[test]
    fn cancellation_abandons_the_rest() {
        let mut r = Recorder { cancel_after: Some(1), ..Default::default() };
        let status = parse_expr(&mut r, "a ; b ; c");
        assert_eq!(status, FAILURE);
        assert_eq!(r.ran, vec!["a"]);
    }
}
