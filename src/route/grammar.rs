//! Grammar Compiler
//!
//! Compiles a grammar string such as `(close|open) [link:<link_url>]+`
//! into an ordered sequence of grammar elements, each carrying a compiled
//! token pattern, a quantifier, and its capture names. The explicit
//! pattern-list form (`from_fragments`) bypasses the textual syntax and
//! builds the same element list from raw regex fragments; both entry
//! points converge on the same representation.
//!
//! Element order is significant and fixed once compiled. Per-capture-name
//! arity (scalar vs. aggregated sequence) is also decided here, at compile
//! time, so match results never have to guess.

use crate::route::error::GrammarError;
use crate::route::pattern::{ElementPattern, TokenCaptures};
use serde::Serialize;
use std::collections::BTreeMap;

/// Cardinality constraint on a grammar element, applied at token
/// granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Quantifier {
    /// Exactly one token (no suffix).
    One,
    /// At most one token (`?`).
    ZeroOrOne,
    /// Any number of tokens, including none (`*`).
    ZeroOrMore,
    /// At least one token (`+`).
    OneOrMore,
}

impl Quantifier {
    /// Parse a quantifier suffix string (`""`, `"?"`, `"*"`, `"+"`).
    pub fn from_suffix(suffix: &str) -> Option<Quantifier> {
        match suffix {
            "" => Some(Quantifier::One),
            "?" => Some(Quantifier::ZeroOrOne),
            "*" => Some(Quantifier::ZeroOrMore),
            "+" => Some(Quantifier::OneOrMore),
            _ => None,
        }
    }

    /// The textual suffix for this quantifier.
    pub fn suffix(self) -> &'static str {
        match self {
            Quantifier::One => "",
            Quantifier::ZeroOrOne => "?",
            Quantifier::ZeroOrMore => "*",
            Quantifier::OneOrMore => "+",
        }
    }

    /// Whether this quantifier consumes more than one token.
    pub fn is_repeating(self) -> bool {
        matches!(self, Quantifier::ZeroOrMore | Quantifier::OneOrMore)
    }

    /// Whether at least one occurrence is required for the match to hold.
    pub fn is_required(self) -> bool {
        matches!(self, Quantifier::One | Quantifier::OneOrMore)
    }
}

/// Whether a capture name yields a scalar or an ordered sequence. Decided
/// per grammar at compile time: a name aggregates when its owning element
/// repeats, or when more than one element declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameArity {
    Single,
    Aggregated,
}

/// One positional unit of a compiled grammar.
#[derive(Debug, Clone, Serialize)]
pub struct GrammarElement {
    raw_pattern: String,
    quantifier: Quantifier,
    #[serde(skip_serializing)]
    pattern: ElementPattern,
}

impl GrammarElement {
    fn new(raw_pattern: String, quantifier: Quantifier, pattern: ElementPattern) -> Self {
        Self {
            raw_pattern,
            quantifier,
            pattern,
        }
    }

    /// The textual sub-pattern this element was compiled from, without its
    /// quantifier suffix or surrounding brackets.
    pub fn raw_pattern(&self) -> &str {
        &self.raw_pattern
    }

    pub fn quantifier(&self) -> Quantifier {
        self.quantifier
    }

    /// Capture names declared within this element, in declaration order.
    pub fn named_groups(&self) -> &[String] {
        self.pattern.group_names()
    }

    /// Match this element against a single token.
    pub fn match_token(&self, token: &str) -> Option<TokenCaptures> {
        self.pattern.match_token(token)
    }
}

/// A compiled grammar: an ordered element sequence plus the original
/// textual form, retained for diagnostics and for handlers.
#[derive(Debug, Clone, Serialize)]
pub struct Grammar {
    source_text: String,
    elements: Vec<GrammarElement>,
    #[serde(skip_serializing)]
    arities: BTreeMap<String, NameArity>,
}

impl Grammar {
    /// Compile grammar text into a `Grammar`. Empty text compiles to the
    /// zero-element grammar, which matches only an empty command.
    pub fn compile(text: &str) -> Result<Grammar, GrammarError> {
        let mut elements = Vec::new();
        for unit in split_units(text)? {
            elements.push(compile_unit(&unit)?);
        }
        Ok(Self::from_elements(text.to_string(), elements))
    }

    /// Build a grammar from raw (regex fragment, quantifier suffix) pairs.
    /// This is the escape hatch for patterns the textual syntax cannot
    /// express, such as `(?P<name>...)` groups over arbitrary alternations.
    pub fn from_fragments(pairs: &[(&str, &str)]) -> Result<Grammar, GrammarError> {
        let mut elements = Vec::with_capacity(pairs.len());
        for (fragment, suffix) in pairs {
            let quantifier = Quantifier::from_suffix(suffix)
                .ok_or_else(|| GrammarError::InvalidRule(format!("{}{}", fragment, suffix)))?;
            let pattern = ElementPattern::from_fragment(fragment)?;
            elements.push(GrammarElement::new(
                (*fragment).to_string(),
                quantifier,
                pattern,
            ));
        }
        let source_text = pairs
            .iter()
            .map(|(fragment, suffix)| format!("{}{}", fragment, suffix))
            .collect::<Vec<_>>()
            .join(" ");
        Ok(Self::from_elements(source_text, elements))
    }

    fn from_elements(source_text: String, elements: Vec<GrammarElement>) -> Grammar {
        let mut arities: BTreeMap<String, NameArity> = BTreeMap::new();
        for element in &elements {
            for name in element.named_groups() {
                arities
                    .entry(name.clone())
                    .and_modify(|arity| *arity = NameArity::Aggregated)
                    .or_insert(if element.quantifier().is_repeating() {
                        NameArity::Aggregated
                    } else {
                        NameArity::Single
                    });
            }
        }
        Grammar {
            source_text,
            elements,
            arities,
        }
    }

    /// The textual form this grammar was compiled from.
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn elements(&self) -> &[GrammarElement] {
        &self.elements
    }

    /// Compile-time arity of a capture name, if the grammar declares it.
    pub fn name_arity(&self, name: &str) -> Option<NameArity> {
        self.arities.get(name).copied()
    }

    /// All declared capture names with their arities.
    pub fn name_arities(&self) -> impl Iterator<Item = (&str, NameArity)> {
        self.arities.iter().map(|(name, arity)| (name.as_str(), *arity))
    }
}

/// Split grammar text on whitespace outside bracket and paren groups.
fn split_units(text: &str) -> Result<Vec<String>, GrammarError> {
    let mut units = Vec::new();
    let mut current = String::new();
    let mut depth: i32 = 0;
    for ch in text.chars() {
        match ch {
            '[' | '(' => {
                depth += 1;
                current.push(ch);
            }
            ']' | ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(GrammarError::Unbalanced(text.to_string()));
                }
                current.push(ch);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    units.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if depth != 0 {
        return Err(GrammarError::Unbalanced(text.to_string()));
    }
    if !current.is_empty() {
        units.push(current);
    }
    Ok(units)
}

/// Compile one whitespace-delimited grammar unit into an element.
fn compile_unit(unit: &str) -> Result<GrammarElement, GrammarError> {
    if let Some(interior) = unit.strip_prefix('[') {
        return compile_bracket_unit(unit, interior);
    }
    // Trailing ? * + on a non-bracket unit is that unit's quantifier.
    let (rule, quantifier) = match unit.strip_suffix(['?', '*', '+']) {
        Some("") => return Err(GrammarError::DanglingQuantifier(unit.to_string())),
        Some(rule) => {
            let suffix = &unit[rule.len()..];
            (rule, Quantifier::from_suffix(suffix).unwrap_or(Quantifier::One))
        }
        None => (unit, Quantifier::One),
    };
    let pattern = ElementPattern::from_rule(rule)?;
    Ok(GrammarElement::new(rule.to_string(), quantifier, pattern))
}

/// Compile a `[interior]` unit with an optional trailing quantifier. The
/// default quantifier for a bracketed group is `ZeroOrOne`.
fn compile_bracket_unit(unit: &str, interior: &str) -> Result<GrammarElement, GrammarError> {
    let close = interior
        .find(']')
        .ok_or_else(|| GrammarError::Unbalanced(unit.to_string()))?;
    let rule = &interior[..close];
    let suffix = &interior[close + 1..];
    let quantifier = match suffix {
        "" => Quantifier::ZeroOrOne,
        s => Quantifier::from_suffix(s)
            .ok_or_else(|| GrammarError::InvalidRule(unit.to_string()))?,
    };
    if rule.is_empty() {
        return Err(GrammarError::InvalidRule(unit.to_string()));
    }
    if rule.contains('[') {
        return Err(GrammarError::InvalidRule(unit.to_string()));
    }
    // A lone quantifier character is a literal ([+] matches "+"); a
    // longer rule with a quantifier tail is a nesting mistake.
    if rule.len() > 1 && rule.ends_with(['?', '*', '+']) {
        return Err(GrammarError::NestedQuantifier(unit.to_string()));
    }
    let pattern = ElementPattern::from_rule(rule)?;
    Ok(GrammarElement::new(rule.to_string(), quantifier, pattern))
}
