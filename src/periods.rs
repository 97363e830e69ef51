//! Period resolution: free text to canonical period keys.

use crate::config::PeriodAlias;
use regex::Regex;
use tracing::debug;

/// Explicit period tokens recognized in comparative questions.
const PERIOD_TOKEN_PATTERN: &str =
    r"q[1-4]|quarter [1-4]|last quarter|current quarter|past year|year over year";

pub struct PeriodResolver {
    aliases: Vec<(String, PeriodAlias)>,
    year_comparison: (String, String),
    token_re: Regex,
}

impl PeriodResolver {
    pub fn new(aliases: Vec<(String, PeriodAlias)>, year_comparison: (String, String)) -> Self {
        Self {
            aliases,
            year_comparison,
            token_re: Regex::new(PERIOD_TOKEN_PATTERN).unwrap(),
        }
    }

    /// Single-mention mode: first alias phrase contained in the question,
    /// scanned in declaration order. Year-comparison markers are not
    /// canonical periods and are skipped.
    pub fn resolve_single(&self, question: &str) -> Option<String> {
        let q = question.to_lowercase();
        self.aliases.iter().find_map(|(phrase, alias)| match alias {
            PeriodAlias::Quarter(key) if q.contains(phrase.as_str()) => Some(key.clone()),
            _ => None,
        })
    }

    /// Multi-mention mode: explicit period tokens in left-to-right order,
    /// mapped through the alias table; unmapped tokens are dropped. Any
    /// year-comparison mention overrides the whole sequence with the
    /// configured year-ago/current pair.
    pub fn resolve_pair(&self, question: &str) -> Vec<String> {
        let q = question.to_lowercase();
        let mut periods = Vec::new();
        let mut year_comparison = false;

        for token in self.token_re.find_iter(&q) {
            match self.lookup(token.as_str()) {
                Some(PeriodAlias::Quarter(key)) => periods.push(key.clone()),
                Some(PeriodAlias::YearComparison) => year_comparison = true,
                None => debug!(token = token.as_str(), "unmapped period token"),
            }
        }

        if year_comparison {
            let (ago, current) = &self.year_comparison;
            return vec![ago.clone(), current.clone()];
        }
        periods
    }

    fn lookup(&self, token: &str) -> Option<&PeriodAlias> {
        self.aliases
            .iter()
            .find(|(phrase, _)| phrase == token)
            .map(|(_, alias)| alias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QaConfig;

    fn resolver() -> PeriodResolver {
        let config = QaConfig::default();
        PeriodResolver::new(config.period_aliases, config.year_comparison)
    }

    #[test]
    fn test_single_mention() {
        let r = resolver();
        assert_eq!(r.resolve_single("What is revenue for Q3?"), Some("sep-24".to_string()));
        assert_eq!(
            r.resolve_single("revenue for September 2024"),
            Some("sep-24".to_string())
        );
        assert_eq!(r.resolve_single("how about now"), None);
    }

    #[test]
    fn test_single_mention_skips_year_marker() {
        let r = resolver();
        assert_eq!(r.resolve_single("profit over the past year"), None);
    }

    #[test]
    fn test_pair_in_order_of_appearance() {
        let r = resolver();
        assert_eq!(
            r.resolve_pair("Compare profit Q2 vs Q3"),
            vec!["jun-24".to_string(), "sep-24".to_string()]
        );
        assert_eq!(
            r.resolve_pair("Compare profit Q3 vs Q2"),
            vec!["sep-24".to_string(), "jun-24".to_string()]
        );
    }

    #[test]
    fn test_unmapped_tokens_dropped() {
        // "quarter 3" and "last quarter" are recognized tokens with no
        // alias entry; they must be dropped, not mis-mapped.
        let r = resolver();
        assert_eq!(r.resolve_pair("compare quarter 3 with last quarter"), Vec::<String>::new());
    }

    #[test]
    fn test_year_comparison_overrides_sequence() {
        let r = resolver();
        assert_eq!(
            r.resolve_pair("growth from q1 to q2 over the past year"),
            vec!["sep-23".to_string(), "sep-24".to_string()]
        );
        assert_eq!(
            r.resolve_pair("year over year change"),
            vec!["sep-23".to_string(), "sep-24".to_string()]
        );
    }

    #[test]
    fn test_fewer_than_two_periods() {
        let r = resolver();
        assert_eq!(r.resolve_pair("did profit increase in q3"), vec!["sep-24".to_string()]);
    }
}
