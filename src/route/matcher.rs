//! Token Matcher / Repetition Engine
//!
//! Walks a tokenized command against a compiled grammar's elements in
//! order and accumulates a `RouteMatch`. Repetition is applied at token
//! granularity, which is what lets a repeated element like
//! `[label:<label>]+` yield *every* matched `label` in order rather than
//! collapsing to the last occurrence the way regex repetition does.
//!
//! The consumer is greedy and never backtracks: once a repeated element
//! has taken as many tokens as it can, control moves to the next element
//! and tokens are never given back. Grammars whose adjacent repeated
//! elements accept overlapping token sets are therefore resolved
//! leftmost-greedy; stacked alternative grammars on one handler are the
//! way to express the other reading. This keeps matching linear in the
//! token count.

use crate::route::grammar::{Grammar, NameArity, Quantifier};
use crate::route::pattern::TokenCaptures;
use serde::{Serialize, Serializer};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;

/// A captured value: a scalar for `ONE`/`ZERO_OR_ONE` elements, an ordered
/// sequence for repeated elements (and for names declared by more than one
/// element). Which variant a name gets is fixed at grammar compile time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NamedValue {
    Single(String),
    Many(Vec<String>),
}

impl NamedValue {
    /// The scalar value, if this is a `Single`.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            NamedValue::Single(value) => Some(value),
            NamedValue::Many(_) => None,
        }
    }

    /// All values in occurrence order; a `Single` yields one element.
    pub fn values(&self) -> Vec<&str> {
        match self {
            NamedValue::Single(value) => vec![value.as_str()],
            NamedValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

/// One consumed token: which element matched it, where, and what it
/// captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubMatch {
    /// Index of the grammar element that consumed the token.
    pub element_index: usize,
    /// Index of the token in the command's token sequence.
    pub token_index: usize,
    /// The token text.
    pub text: String,
    /// Span of the pattern match within the token.
    pub span: Range<usize>,
    /// Numbered capture groups (group 1 onward) in index order.
    pub groups: Vec<Option<String>>,
    /// Participating named captures for this occurrence.
    pub named: Vec<(String, String)>,
}

fn grammar_source_text<S>(grammar: &Arc<Grammar>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(grammar.source_text())
}

/// The result of matching a token sequence against one grammar. Created
/// fresh per attempt; a failed match keeps the sub-matches accumulated up
/// to the failure point for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct RouteMatch {
    conclusion: bool,
    matches: Vec<SubMatch>,
    named: BTreeMap<String, NamedValue>,
    #[serde(rename = "grammar", serialize_with = "grammar_source_text")]
    grammar: Arc<Grammar>,
}

impl RouteMatch {
    /// Whether every required element was satisfied and the full token
    /// sequence was consumed.
    pub fn conclusion(&self) -> bool {
        self.conclusion
    }

    /// Per-token sub-matches in consumption order.
    pub fn matches(&self) -> &[SubMatch] {
        &self.matches
    }

    /// The sub-match for the token at position `index`.
    pub fn sub_match(&self, index: usize) -> Option<&SubMatch> {
        self.matches.get(index)
    }

    /// The consumed tokens in order.
    pub fn texts(&self) -> Vec<&str> {
        self.matches.iter().map(|m| m.text.as_str()).collect()
    }

    /// The grammar that produced this result.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// The grammar's original textual form.
    pub fn grammar_text(&self) -> &str {
        self.grammar.source_text()
    }

    /// Look up a captured name. Repeated elements yield `Many` (an empty
    /// sequence when zero occurrences matched); scalar elements yield
    /// `Single`, absent when their optional element did not match.
    pub fn named(&self, name: &str) -> Option<&NamedValue> {
        self.named.get(name)
    }

    /// Scalar shorthand for `named`.
    pub fn named_str(&self, name: &str) -> Option<&str> {
        self.named.get(name).and_then(NamedValue::as_single)
    }

    /// All values for a name in occurrence order, empty when absent.
    pub fn named_all(&self, name: &str) -> Vec<&str> {
        self.named.get(name).map(NamedValue::values).unwrap_or_default()
    }

    /// Declared capture names present in this result.
    pub fn names(&self) -> Vec<&str> {
        self.named.keys().map(String::as_str).collect()
    }

    /// Values of key:value occurrences whose matched key text equals
    /// `key`, in occurrence order. This is the dynamic companion to
    /// `named`: for `[<option(summary|project)>:<value>]+` matched against
    /// `summary:"jira title" project:NOWHERE`, `option_values("summary")`
    /// is `["jira title"]`.
    pub fn option_values(&self, key: &str) -> Vec<&str> {
        self.matches
            .iter()
            .filter(|m| m.groups.len() == 2 && m.groups[0].as_deref() == Some(key))
            .filter_map(|m| m.groups[1].as_deref())
            .collect()
    }

    /// Matched key texts of key:value occurrences, de-duplicated in first
    /// occurrence order.
    pub fn option_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for m in &self.matches {
            if m.groups.len() == 2 {
                if let Some(key) = m.groups[0].as_deref() {
                    if !keys.contains(&key) {
                        keys.push(key);
                    }
                }
            }
        }
        keys
    }
}

/// Match a token sequence against a grammar. Never fails: a non-match
/// yields `conclusion() == false` with partial sub-matches retained.
pub fn match_tokens(grammar: &Arc<Grammar>, tokens: &[String]) -> RouteMatch {
    let mut cursor = 0usize;
    let mut matches: Vec<SubMatch> = Vec::new();
    let mut failed = false;

    for (element_index, element) in grammar.elements().iter().enumerate() {
        match element.quantifier() {
            Quantifier::One => {
                match tokens.get(cursor).and_then(|t| element.match_token(t)) {
                    Some(caps) => {
                        matches.push(sub_match(element_index, cursor, caps));
                        cursor += 1;
                    }
                    None => {
                        failed = true;
                        break;
                    }
                }
            }
            Quantifier::ZeroOrOne => {
                if let Some(caps) = tokens.get(cursor).and_then(|t| element.match_token(t)) {
                    matches.push(sub_match(element_index, cursor, caps));
                    cursor += 1;
                }
            }
            Quantifier::ZeroOrMore | Quantifier::OneOrMore => {
                let mut occurrences = 0usize;
                while let Some(caps) = tokens.get(cursor).and_then(|t| element.match_token(t)) {
                    matches.push(sub_match(element_index, cursor, caps));
                    cursor += 1;
                    occurrences += 1;
                }
                if occurrences == 0 && element.quantifier().is_required() {
                    failed = true;
                    break;
                }
            }
        }
    }

    let conclusion = !failed && cursor == tokens.len();
    let named = collect_named(grammar, &matches);
    RouteMatch {
        conclusion,
        matches,
        named,
        grammar: Arc::clone(grammar),
    }
}

fn sub_match(element_index: usize, token_index: usize, caps: TokenCaptures) -> SubMatch {
    SubMatch {
        element_index,
        token_index,
        text: caps.text,
        span: caps.span,
        groups: caps.groups,
        named: caps.named,
    }
}

/// Fold per-occurrence captures into the name map. Aggregated names are
/// pre-seeded with an empty sequence so a concluded match of a `*` element
/// with zero occurrences still answers `named` with an empty sequence.
fn collect_named(grammar: &Grammar, matches: &[SubMatch]) -> BTreeMap<String, NamedValue> {
    let mut named: BTreeMap<String, NamedValue> = BTreeMap::new();
    for (name, arity) in grammar.name_arities() {
        if arity == NameArity::Aggregated {
            named.insert(name.to_string(), NamedValue::Many(Vec::new()));
        }
    }
    for sub in matches {
        for (name, value) in &sub.named {
            match named.entry(name.clone()) {
                Entry::Occupied(mut entry) => {
                    if let NamedValue::Many(values) = entry.get_mut() {
                        values.push(value.clone());
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert(NamedValue::Single(value.clone()));
                }
            }
        }
    }
    named
}
