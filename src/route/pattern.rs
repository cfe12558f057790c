//! Element Pattern Builder
//!
//! Turns the textual sub-pattern of a single grammar element into a
//! compiled regex anchored to one token, plus the ordered list of capture
//! names the element declares.
//!
//! A grammar element's sub-pattern is one of:
//!
//! ```text
//! settings                 literal (case-insensitive exact token)
//! (set|get|delete)         anonymous alternation
//! <rid>                    named capture of one token
//! <verb(set|get|delete)>   named capture restricted to an alternation
//! jira.project:<project>   key:value pair (either side any of the above)
//! ```
//!
//! Quantifier suffixes and bracketed groups are handled by the grammar
//! compiler before the rule text reaches this module.

use crate::route::error::GrammarError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// Classifier for literal rules: `settings`, `create-jira`, `foo.bar`, `+label`
static META_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w.+-]+$").unwrap());

/// Classifier for anonymous alternations: `(set|get|delete|help)`
static META_ANON_FILTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(([\w.+|-]*)\)$").unwrap());

/// Classifier for bare named captures: `<rid>`
static META_NAMED_ARG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<(\w+)>$").unwrap());

/// Classifier for named captures with an alternation: `<verb(set|get)>`,
/// `<option(+label|commits|author)>`
static META_NAMED_ARG_FILTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<(\w+)\(([\w.+|-]*)\)>$").unwrap());

/// Captures from matching one element pattern against one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCaptures {
    /// The full token text the pattern was matched against.
    pub text: String,
    /// Span of the match within the token.
    pub span: Range<usize>,
    /// Numbered capture groups (group 1 onward) in index order; `None` for
    /// groups that did not participate in the match.
    pub groups: Vec<Option<String>>,
    /// Participating named captures in declaration order.
    pub named: Vec<(String, String)>,
}

/// A compiled element pattern: an anchored regex over a single token plus
/// the capture names it declares. Immutable once built.
#[derive(Debug, Clone)]
pub struct ElementPattern {
    regex: Regex,
    group_names: Vec<String>,
}

impl ElementPattern {
    /// Compile a textual sub-pattern (see module docs for the forms).
    /// Matching is case-insensitive and anchored to the whole token,
    /// so `settings` matches the token `SETTINGS` but not `settingsx`.
    pub fn from_rule(rule: &str) -> Result<Self, GrammarError> {
        let source = rule_to_pattern_source(rule, RuleContext::Top)?;
        Self::from_anchored(format!("(?i)^{}$", source))
    }

    /// Compile a raw regex fragment from the explicit pattern-list form.
    /// The fragment may use `(?P<name>...)` named groups; it is anchored
    /// to the whole token but otherwise taken verbatim (case-sensitive).
    pub fn from_fragment(fragment: &str) -> Result<Self, GrammarError> {
        Self::from_anchored(format!("^(?:{})$", fragment))
    }

    fn from_anchored(pattern: String) -> Result<Self, GrammarError> {
        let regex =
            Regex::new(&pattern).map_err(|e| GrammarError::InvalidPattern(e.to_string()))?;
        let group_names = regex
            .capture_names()
            .flatten()
            .map(str::to_string)
            .collect();
        Ok(Self { regex, group_names })
    }

    /// Capture names declared by this pattern, in declaration order.
    pub fn group_names(&self) -> &[String] {
        &self.group_names
    }

    /// The compiled regex source, retained for diagnostics.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Match this pattern against a single token.
    pub fn match_token(&self, token: &str) -> Option<TokenCaptures> {
        let caps = self.regex.captures(token)?;
        let full = caps.get(0)?;
        let groups = (1..caps.len())
            .map(|i| caps.get(i).map(|m| m.as_str().to_string()))
            .collect();
        let named = self
            .group_names
            .iter()
            .filter_map(|name| {
                caps.name(name)
                    .map(|m| (name.clone(), m.as_str().to_string()))
            })
            .collect();
        Some(TokenCaptures {
            text: token.to_string(),
            span: full.range(),
            groups,
            named,
        })
    }
}

/// Where a rule sits within its element. A bare `<name>` capture matches
/// any non-whitespace token on its own, but narrows to `[^:]+` inside a
/// key:value pair so the separating colon stays unambiguous. The one
/// exception is a value behind a *literal* key: there the key already
/// bounds the split, so the value may contain colons (`link:<link_url>`
/// capturing a URL).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleContext {
    Top,
    Key,
    Value { literal_key: bool },
}

fn rule_to_pattern_source(rule: &str, context: RuleContext) -> Result<String, GrammarError> {
    if META_LITERAL.is_match(rule) {
        return Ok(format!("({})", regex::escape(rule)));
    }
    if let Some(caps) = META_ANON_FILTER.captures(rule) {
        let alts = split_alternatives(rule, &caps[1])?;
        return Ok(format!("({})", alts.join("|")));
    }
    if let Some(caps) = META_NAMED_ARG.captures(rule) {
        let charset = match context {
            RuleContext::Top | RuleContext::Value { literal_key: true } => r"\S+",
            RuleContext::Key | RuleContext::Value { literal_key: false } => "[^:]+",
        };
        return Ok(format!("(?P<{}>{})", &caps[1], charset));
    }
    if let Some(caps) = META_NAMED_ARG_FILTER.captures(rule) {
        let alts = split_alternatives(rule, &caps[2])?;
        return Ok(format!("(?P<{}>{})", &caps[1], alts.join("|")));
    }
    if context == RuleContext::Top {
        let splits: Vec<&str> = rule.split(':').collect();
        if splits.len() == 2 {
            let literal_key = META_LITERAL.is_match(splits[0]);
            let left = rule_to_pattern_source(splits[0], RuleContext::Key)?;
            let right = rule_to_pattern_source(splits[1], RuleContext::Value { literal_key })?;
            return Ok(format!("{}:{}", left, right));
        }
    }
    // A dangling open group reads better as an unbalance report than as a
    // generic syntax error.
    if rule.starts_with('(') || rule.starts_with('<') || rule.starts_with('[') {
        return Err(GrammarError::Unbalanced(rule.to_string()));
    }
    Err(GrammarError::InvalidRule(rule.to_string()))
}

/// Split and escape the interior of an alternation. Every alternative must
/// be non-empty.
fn split_alternatives(rule: &str, interior: &str) -> Result<Vec<String>, GrammarError> {
    let alts: Vec<&str> = interior.split('|').collect();
    if alts.iter().any(|a| a.is_empty()) {
        return Err(GrammarError::EmptyAlternation(rule.to_string()));
    }
    Ok(alts.iter().map(|a| regex::escape(a)).collect())
}
