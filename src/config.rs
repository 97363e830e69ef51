//! Static configuration: alias tables, matching threshold, default paths.
//!
//! Alias tables are ordered pair lists, not maps: resolution scans them in
//! declaration order and the first match wins.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Acceptance threshold for fuzzy topic matching, on a 0-100 scale.
pub const SIMILARITY_THRESHOLD: f64 = 60.0;

/// What a period alias phrase resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodAlias {
    /// A canonical period column key.
    Quarter(String),
    /// Marker: the question asks about a year-ago/current pair, not a
    /// single period.
    YearComparison,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaConfig {
    /// Ordered (phrase, canonical topic) pairs.
    pub topic_aliases: Vec<(String, String)>,
    /// Ordered (phrase, mapping) pairs.
    pub period_aliases: Vec<(String, PeriodAlias)>,
    pub similarity_threshold: f64,
    /// Default metrics CSV file.
    pub csv_path: PathBuf,
    /// Identifier of the fine-tuned extractive QA model used as fallback.
    pub model_id: String,
    /// (year-ago, current) period pair for "past year" questions.
    pub year_comparison: (String, String),
}

fn topic(phrase: &str, canonical: &str) -> (String, String) {
    (phrase.to_string(), canonical.to_string())
}

fn quarter(phrase: &str, key: &str) -> (String, PeriodAlias) {
    (phrase.to_string(), PeriodAlias::Quarter(key.to_string()))
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            topic_aliases: vec![
                topic("revenue", "net sales/income from operations"),
                topic("profit", "net profit/(loss) for the period"),
                topic("expenses", "other expenses"),
                topic("tax", "tax"),
                topic("income", "total income from operations"),
                topic("sales", "net sales/income from operations"),
            ],
            period_aliases: vec![
                quarter("q1", "mar-24"),
                quarter("1st quarter", "mar-24"),
                quarter("jan-mar", "mar-24"),
                quarter("q2", "jun-24"),
                quarter("2nd quarter", "jun-24"),
                quarter("apr-jun", "jun-24"),
                quarter("q3", "sep-24"),
                quarter("3rd quarter", "sep-24"),
                quarter("jul-sep", "sep-24"),
                quarter("q4", "dec-23"),
                quarter("4th quarter", "dec-23"),
                quarter("oct-dec", "dec-23"),
                quarter("current", "sep-24"),
                quarter("previous", "jun-24"),
                quarter("last", "dec-23"),
                ("past year".to_string(), PeriodAlias::YearComparison),
                ("year over year".to_string(), PeriodAlias::YearComparison),
                quarter("september 2024", "sep-24"),
                quarter("march 2024", "mar-24"),
                quarter("december 2023", "dec-23"),
            ],
            similarity_threshold: SIMILARITY_THRESHOLD,
            csv_path: PathBuf::from("Trent.csv"),
            model_id: "qa_finetuned".to_string(),
            // NOTE: "sep-23" is not among the declared period columns, so a
            // year comparison against the shipped table resolves to missing
            // data. Kept as configured upstream rather than remapped.
            year_comparison: ("sep-23".to_string(), "sep-24".to_string()),
        }
    }
}
