//! Command tokenizer
//!
//! Splits a raw command string into whitespace-delimited tokens, keeping
//! quoted segments (single or double quotes) together as one token with
//! the quotes removed. Pieces not separated by whitespace merge into a
//! single token, so `summary:"jira title"` tokenizes to `summary:jira title`.
//!
//! The lexer is defined with the logos derive macro; token assembly is a
//! single pass over the lexed pieces.

use logos::Logos;
use std::fmt;

/// Lexical pieces of a command string. A token is one or more adjacent
/// non-`Space` pieces.
#[derive(Logos, Debug, PartialEq, Clone, Copy)]
enum Piece {
    #[regex(r#""[^"]*""#)]
    DoubleQuoted,

    #[regex(r"'[^']*'")]
    SingleQuoted,

    #[regex(r#"[^ \t\r\n"']+"#)]
    Bare,

    #[regex(r"[ \t\r\n]+")]
    Space,
}

/// The command string could not be lexed. The only way to get here is a
/// quote that never closes (or a stray quote character mid-token).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizeError {
    /// Byte offset of the offending quote character.
    pub position: usize,
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unterminated quote at byte {}", self.position)
    }
}

impl std::error::Error for TokenizeError {}

/// Tokenize a command string into whitespace-delimited, quote-aware tokens.
pub fn tokenize(command: &str) -> Result<Vec<String>, TokenizeError> {
    let mut tokens: Vec<String> = Vec::new();
    let mut current: Option<String> = None;
    let mut lexer = Piece::lexer(command);

    while let Some(piece) = lexer.next() {
        let piece = piece.map_err(|()| TokenizeError {
            position: lexer.span().start,
        })?;
        match piece {
            Piece::Space => {
                if let Some(token) = current.take() {
                    tokens.push(token);
                }
            }
            Piece::Bare => {
                current
                    .get_or_insert_with(String::new)
                    .push_str(lexer.slice());
            }
            Piece::DoubleQuoted | Piece::SingleQuoted => {
                let quoted = lexer.slice();
                current
                    .get_or_insert_with(String::new)
                    .push_str(&quoted[1..quoted.len() - 1]);
            }
        }
    }
    if let Some(token) = current.take() {
        tokens.push(token);
    }
    Ok(tokens)
}
