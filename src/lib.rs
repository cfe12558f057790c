//! # tokroute
//!
//! A token-level command grammar compiler and first-match router.
//!
//! A compact grammar string describes the shape of a command:
//!
//! ```text
//! (close|open) [link:<link_url>]+
//! subscribe <user_repo> [<option(+label|commits|author)>:<value>]+
//! ```
//!
//! Grammars compile to an ordered sequence of single-token patterns with
//! quantifiers. Matching walks the command's tokens against that
//! sequence, so a repeated element collects *every* occurrence of its
//! named captures in order — unlike regex repetition, which keeps only
//! the last one. A router holds (grammar, handler) entries and resolves
//! each incoming command to the first registered grammar that matches.

pub mod route;

pub use route::{
    match_tokens, Grammar, GrammarElement, GrammarError, NameArity, NamedValue, Quantifier,
    Route, RouteError, RouteMatch, Router, SubMatch,
};
