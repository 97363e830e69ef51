//! In-memory metrics table and value lookup.

use crate::error::{QaError, Result};
use std::collections::HashMap;

/// Quarterly metrics keyed by (canonical topic, period). Built once by the
/// loader, read-only afterwards. Rows keep declaration order so that fuzzy
/// matching ties resolve to the earlier row.
#[derive(Debug, Clone)]
pub struct MetricTable {
    periods: Vec<String>,
    rows: Vec<(String, HashMap<String, String>)>,
}

impl MetricTable {
    pub fn new(periods: Vec<String>) -> Self {
        Self {
            periods,
            rows: Vec::new(),
        }
    }

    /// Appends a row. The topic is trimmed and lowercased; topics are
    /// unique case-insensitively.
    pub fn push_row(&mut self, topic: &str, cells: HashMap<String, String>) -> Result<()> {
        let canonical = topic.trim().to_lowercase();
        if self.rows.iter().any(|(t, _)| t == &canonical) {
            return Err(QaError::Table(format!("duplicate topic: {}", canonical)));
        }
        self.rows.push((canonical, cells));
        Ok(())
    }

    pub fn period_keys(&self) -> &[String] {
        &self.periods
    }

    pub fn has_period(&self, key: &str) -> bool {
        self.periods.iter().any(|p| p == key)
    }

    /// Canonical topic names in table order.
    pub fn topic_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(|(t, _)| t.as_str())
    }

    /// Value lookup. `Ok(None)` when the row, the period or the value
    /// itself is missing; `Err` only for cell text that is not a number.
    pub fn get(&self, topic: &str, period: &str) -> Result<Option<f64>> {
        let Some((_, cells)) = self.rows.iter().find(|(t, _)| t == topic) else {
            return Ok(None);
        };
        match cells.get(period) {
            Some(raw) => clean_number(raw),
            None => Ok(None),
        }
    }

    /// Sentence-form rendering of every present value, used as the context
    /// handed to the fallback model.
    pub fn context_text(&self) -> String {
        let mut out = String::new();
        for (topic, cells) in &self.rows {
            for period in &self.periods {
                let Some(raw) = cells.get(period) else { continue };
                if let Ok(Some(value)) = clean_number(raw) {
                    out.push_str(&format!("The {} for {} is {}. ", topic, period, value));
                }
            }
        }
        out.trim_end().to_string()
    }
}

/// Strips thousands separators and parses the cell. Blank cells and the
/// "nan" sentinel are absent values; anything else that still fails to
/// parse is a malformed cell.
pub fn clean_number(raw: &str) -> Result<Option<f64>> {
    let cleaned = raw.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    cleaned
        .parse::<f64>()
        .map(Some)
        .map_err(|_| QaError::Table(format!("malformed numeric value: '{}'", raw)))
}
