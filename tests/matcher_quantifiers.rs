//! Exhaustive quantifier battery for the greedy token matcher
//!
//! Each case is a grammar of single-letter literals with quantifier
//! suffixes and an input word whose characters become the token sequence
//! (`"aab"` is the tokens `a a b`).

use rstest::rstest;
use std::sync::Arc;
use tokroute::{match_tokens, Grammar};

fn matches(grammar_text: &str, word: &str) -> bool {
    let grammar = Arc::new(Grammar::compile(grammar_text).unwrap());
    let tokens: Vec<String> = word.chars().map(|c| c.to_string()).collect();
    match_tokens(&grammar, &tokens).conclusion()
}

#[rstest]
#[case("a", "", false)]
#[case("a", "a", true)]
#[case("a", "b", false)]
#[case("a", "aa", false)]
#[case("a", "ab", false)]
#[case("a*", "", true)]
#[case("a*", "a", true)]
#[case("a*", "b", false)]
#[case("a*", "aa", true)]
#[case("a*", "ab", false)]
#[case("a*", "aaa", true)]
#[case("a*", "aab", false)]
#[case("a?", "", true)]
#[case("a?", "a", true)]
#[case("a?", "b", false)]
#[case("a?", "aa", false)]
#[case("a?", "ab", false)]
#[case("a?", "aaa", false)]
#[case("a?", "aab", false)]
#[case("a+", "", false)]
#[case("a+", "a", true)]
#[case("a+", "b", false)]
#[case("a+", "aa", true)]
#[case("a+", "ab", false)]
#[case("a+", "aaa", true)]
#[case("a+", "aab", false)]
#[case("a b", "", false)]
#[case("a b", "a", false)]
#[case("a b", "b", false)]
#[case("a b", "aa", false)]
#[case("a b", "ab", true)]
#[case("a b", "aaa", false)]
#[case("a b", "aab", false)]
#[case("a* b", "", false)]
#[case("a* b", "a", false)]
#[case("a* b", "b", true)]
#[case("a* b", "aa", false)]
#[case("a* b", "ab", true)]
#[case("a* b", "aaa", false)]
#[case("a* b", "aab", true)]
#[case("a? b", "", false)]
#[case("a? b", "a", false)]
#[case("a? b", "b", true)]
#[case("a? b", "aa", false)]
#[case("a? b", "ab", true)]
#[case("a? b", "aaa", false)]
#[case("a? b", "aab", false)]
#[case("a+ b", "", false)]
#[case("a+ b", "a", false)]
#[case("a+ b", "b", false)]
#[case("a+ b", "aa", false)]
#[case("a+ b", "ab", true)]
#[case("a+ b", "aaa", false)]
#[case("a+ b", "aab", true)]
#[case("a* c* b", "aab", true)]
#[case("a* c* b", "acb", true)]
#[case("a* c* b", "b", true)]
#[case("a* c* b", "cb", true)]
#[case("a* c* b", "cab", false)]
fn quantifier_battery(#[case] grammar: &str, #[case] word: &str, #[case] expected: bool) {
    assert_eq!(
        matches(grammar, word),
        expected,
        "grammar '{}' vs tokens '{}'",
        grammar,
        word
    );
}

#[rstest]
#[case("a b", "AB", true)]
#[case("a+ b", "AAB", true)]
fn literals_match_case_insensitively(
    #[case] grammar: &str,
    #[case] word: &str,
    #[case] expected: bool,
) {
    assert_eq!(matches(grammar, word), expected);
}
