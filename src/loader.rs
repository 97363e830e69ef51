//! CSV ingestion: loads the metrics file into a [`MetricTable`].
//!
//! Column names are trimmed and lowercased; the topics column is trimmed
//! and lowercased as well so alias matching sees consistent keys. Cells
//! are read as text and stay text; numeric cleaning happens at lookup.

use crate::error::{QaError, Result};
use crate::table::MetricTable;
use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

const TOPICS_COLUMN: &str = "topics";

/// Loads and preprocesses the metrics CSV.
pub fn load_table(path: &Path) -> Result<MetricTable> {
    let df = read_csv(path)?;
    let table = table_from_dataframe(&df)?;
    info!(
        "loaded {} topics across {} periods from {}",
        table.topic_names().count(),
        table.period_keys().len(),
        path.display()
    );
    Ok(table)
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    // Schema inference disabled so every column arrives as text; values
    // like "4,156.67" must survive until clean_number sees them.
    let mut df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(0))
        .finish()
        .map_err(|e| QaError::Table(format!("failed to read CSV {}: {}", path.display(), e)))?
        .collect()
        .map_err(|e| QaError::Table(format!("failed to load CSV {}: {}", path.display(), e)))?;

    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|c| c.trim().to_lowercase())
        .collect();
    df.set_column_names(&names)?;
    Ok(df)
}

/// Converts a text dataframe into the in-memory table.
pub fn table_from_dataframe(df: &DataFrame) -> Result<MetricTable> {
    let topics = df
        .column(TOPICS_COLUMN)
        .map_err(|_| QaError::Table(format!("missing '{}' column", TOPICS_COLUMN)))?
        .str()?
        .clone();

    let period_cols: Vec<String> = df
        .get_column_names()
        .iter()
        .filter(|&&c| c != TOPICS_COLUMN)
        .map(|c| c.to_string())
        .collect();

    let mut table = MetricTable::new(period_cols.clone());
    for idx in 0..df.height() {
        let Some(topic) = topics.get(idx) else {
            continue;
        };
        let mut cells = HashMap::new();
        for col in &period_cols {
            if let Some(raw) = df.column(col)?.str()?.get(idx) {
                cells.insert(col.clone(), raw.to_string());
            }
        }
        table.push_row(topic, cells)?;
    }
    Ok(table)
}
