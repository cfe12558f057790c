//! Command grammar compilation, token matching, and routing
//!
//! The pieces compose bottom-up: the tokenizer splits a raw command into
//! quote-aware tokens; the pattern builder compiles one element's textual
//! sub-pattern into an anchored regex; the grammar compiler assembles an
//! ordered element sequence with quantifiers; the matcher walks tokens
//! against that sequence; the router picks the first registered grammar
//! whose match concludes and invokes its handler.

pub mod error;
pub mod grammar;
pub mod matcher;
pub mod pattern;
pub mod router;
pub mod tokenizer;

pub use error::{GrammarError, RouteError};
pub use grammar::{Grammar, GrammarElement, NameArity, Quantifier};
pub use matcher::{match_tokens, NamedValue, RouteMatch, SubMatch};
pub use router::{Handler, Route, Router};
