use super::types::{RedirectOp, Token};
use crate::error::ParseError;

/// Split one `cmd` unit into words and pipe/redirection operators.
///
/// Words are delimited by whitespace and by unquoted `|`, `<`, `>`, `>>`.
/// `2>` is an operator only at the start of a word. A `\` makes the next
/// character literal (and is dropped); `"..."` spans are literal too and
/// join with adjacent text into a single word.
pub fn tokenize(cmd: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut chars = cmd.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                // A trailing backslash has nothing to escape; keep it.
                word.push(chars.next().unwrap_or('\\'));
                in_word = true;
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        None => return Err(ParseError::UnbalancedQuotes(cmd.trim().to_string())),
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(escaped) => word.push(escaped),
                            None => {
                                return Err(ParseError::UnbalancedQuotes(cmd.trim().to_string()));
                            }
                        },
                        Some(other) => word.push(other),
                    }
                }
            }
            c if c.is_whitespace() => flush(&mut tokens, &mut word, &mut in_word),
            '|' => {
                flush(&mut tokens, &mut word, &mut in_word);
                tokens.push(Token::Pipe);
            }
            '<' => {
                flush(&mut tokens, &mut word, &mut in_word);
                tokens.push(Token::Redirect(RedirectOp::Input));
            }
            '>' => {
                flush(&mut tokens, &mut word, &mut in_word);
                let op = if chars.peek() == Some(&'>') {
                    chars.next();
                    RedirectOp::Append
                } else {
                    RedirectOp::Output
                };
                tokens.push(Token::Redirect(op));
            }
            '2' if !in_word && chars.peek() == Some(&'>') => {
                chars.next();
                tokens.push(Token::Redirect(RedirectOp::Error));
            }
            other => {
                word.push(other);
                in_word = true;
            }
        }
    }
    flush(&mut tokens, &mut word, &mut in_word);
    Ok(tokens)
}

fn flush(tokens: &mut Vec<Token>, word: &mut String, in_word: &mut bool) {
    if *in_word {
        tokens.push(Token::Word(std::mem::take(word)));
        *in_word = false;
    }
}
