//! Error types for grammar compilation and command routing
//!
//! Compile-time problems (`GrammarError`) are fatal to the single
//! registration that triggered them and never surface at route time.
//! Route-time problems (`RouteError`) are surfaced to the `route_to`
//! caller; a grammar that almost matches is not an error.

use std::fmt;

/// Errors raised while compiling a grammar string or an explicit
/// pattern-fragment list into a `Grammar`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// A bracket or paren group was opened but never closed, or closed
    /// without being opened.
    Unbalanced(String),
    /// A quantifier suffix with nothing to quantify (a unit that is only
    /// `?`, `*` or `+`).
    DanglingQuantifier(String),
    /// An alternation group with no alternatives, or with an empty
    /// alternative (`()`, `(a|)`).
    EmptyAlternation(String),
    /// A quantifier attached where none is allowed (inside a bracketed
    /// group, or on one side of a key:value colon).
    NestedQuantifier(String),
    /// A unit that fits none of the grammar forms.
    InvalidRule(String),
    /// An explicit regex fragment that the regex engine rejected.
    InvalidPattern(String),
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::Unbalanced(rule) => {
                write!(f, "unbalanced group in grammar unit '{}'", rule)
            }
            GrammarError::DanglingQuantifier(rule) => {
                write!(f, "quantifier with nothing to quantify: '{}'", rule)
            }
            GrammarError::EmptyAlternation(rule) => {
                write!(f, "empty alternation in grammar unit '{}'", rule)
            }
            GrammarError::NestedQuantifier(rule) => {
                write!(f, "quantifier not allowed inside '{}'", rule)
            }
            GrammarError::InvalidRule(rule) => {
                write!(f, "illegal routing syntax: '{}'", rule)
            }
            GrammarError::InvalidPattern(msg) => {
                write!(f, "invalid regex pattern: {}", msg)
            }
        }
    }
}

impl std::error::Error for GrammarError {}

/// Errors raised while routing a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// No registered grammar concluded a match for the command. Carries
    /// the command text and the source text of every grammar considered.
    NoMatch {
        command: String,
        considered: Vec<String>,
    },
    /// The command text could not be tokenized (unterminated quote).
    InvalidCommand { command: String, reason: String },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::NoMatch {
                command,
                considered,
            } => {
                write!(
                    f,
                    "no route found for '{}' ({} grammars considered)",
                    command,
                    considered.len()
                )
            }
            RouteError::InvalidCommand { command, reason } => {
                write!(f, "cannot tokenize command '{}': {}", command, reason)
            }
        }
    }
}

impl std::error::Error for RouteError {}
