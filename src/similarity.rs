//! Pluggable string similarity for the topic resolver's fuzzy fallback.

use std::collections::BTreeSet;
use strsim::normalized_levenshtein;

/// Scores two strings on a 0-100 scale.
pub trait Similarity: Send + Sync {
    fn score(&self, a: &str, b: &str) -> f64;
}

/// Token-set ratio: compares the sorted token intersection against each
/// side's intersection-plus-remainder string and keeps the best ratio.
/// Tolerant of word order and of extra words around the shared core, which
/// is what matching a whole question against a topic name needs.
#[derive(Debug, Default, Clone)]
pub struct TokenSetRatio;

fn tokens(s: &str) -> BTreeSet<String> {
    s.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

fn join_parts(base: &str, rest: &[&str]) -> String {
    if rest.is_empty() {
        base.to_string()
    } else if base.is_empty() {
        rest.join(" ")
    } else {
        format!("{} {}", base, rest.join(" "))
    }
}

impl Similarity for TokenSetRatio {
    fn score(&self, a: &str, b: &str) -> f64 {
        let ta = tokens(a);
        let tb = tokens(b);
        if ta.is_empty() || tb.is_empty() {
            return 0.0;
        }

        let inter: Vec<&str> = ta.intersection(&tb).map(|s| s.as_str()).collect();
        let only_a: Vec<&str> = ta.difference(&tb).map(|s| s.as_str()).collect();
        let only_b: Vec<&str> = tb.difference(&ta).map(|s| s.as_str()).collect();

        let base = inter.join(" ");
        let combined_a = join_parts(&base, &only_a);
        let combined_b = join_parts(&base, &only_b);

        [
            normalized_levenshtein(&base, &combined_a),
            normalized_levenshtein(&base, &combined_b),
            normalized_levenshtein(&combined_a, &combined_b),
        ]
        .into_iter()
        .fold(0.0_f64, f64::max)
            * 100.0
    }
}
