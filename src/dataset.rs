//! SQuAD-format training-data synthesis for the fallback model.
//!
//! Generates fact questions for every numeric (topic, period) cell plus
//! yes/no and percent-change comparison questions for every quarter pair
//! with both values present. Fine-tuning itself happens outside this
//! crate; this module only produces its input.

use crate::error::Result;
use crate::table::MetricTable;
use itertools::Itertools;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize, Deserialize)]
pub struct SquadFile {
    pub version: String,
    pub data: Vec<SquadDocument>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SquadDocument {
    pub title: String,
    pub paragraphs: Vec<SquadParagraph>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SquadParagraph {
    pub context: String,
    pub qas: Vec<SquadQuestion>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SquadQuestion {
    pub question: String,
    pub id: String,
    pub answers: Vec<SquadAnswer>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SquadAnswer {
    pub text: String,
    pub answer_start: usize,
}

fn example_id(prefix: &str, parts: &[&str]) -> String {
    let mut hasher = DefaultHasher::new();
    for part in parts {
        part.hash(&mut hasher);
    }
    format!("{}_{:x}", prefix, hasher.finish())
}

fn fact_paragraph(topic: &str, period: &str, value: f64) -> SquadParagraph {
    let prefix = format!("The {} for {} is ", topic, period);
    let text = value.to_string();
    SquadParagraph {
        context: format!("{}{}.", prefix, text),
        qas: vec![SquadQuestion {
            question: format!("What is the {} for {}?", topic, period),
            id: example_id("basic", &[topic, period]),
            answers: vec![SquadAnswer {
                text,
                answer_start: prefix.len(),
            }],
        }],
    }
}

/// Yes/no and percent-change QA pairs for one quarter pair. A zero base
/// value cannot yield a percent change, so such pairs produce nothing.
fn comparison_paragraphs(
    topic: &str,
    p1: &str,
    p2: &str,
    v1: f64,
    v2: f64,
) -> Vec<SquadParagraph> {
    if v1 == 0.0 {
        return Vec::new();
    }
    let change = (v2 - v1) / v1 * 100.0;
    let direction = if v2 > v1 { "increased" } else { "decreased" };
    let pct = format!("{:.2}%", change.abs());
    let yesno = if v2 > v1 { "yes" } else { "no" };

    let mut context = format!(
        "The {} {} from {} in {} to {} in {} (",
        topic, direction, v1, p1, v2, p2
    );
    let pct_start = context.len();
    context.push_str(&pct);
    context.push_str("). The answer is ");
    let yesno_start = context.len();
    context.push_str(yesno);
    context.push('.');

    vec![
        SquadParagraph {
            context: context.clone(),
            qas: vec![SquadQuestion {
                question: format!("Did {} increase from {} to {}?", topic, p1, p2),
                id: example_id("comp_yesno", &[topic, p1, p2]),
                answers: vec![SquadAnswer {
                    text: yesno.to_string(),
                    answer_start: yesno_start,
                }],
            }],
        },
        SquadParagraph {
            context,
            qas: vec![SquadQuestion {
                question: format!(
                    "What was the percentage change in {} from {} to {}?",
                    topic, p1, p2
                ),
                id: example_id("comp_pct", &[topic, p1, p2]),
                answers: vec![SquadAnswer {
                    text: pct,
                    answer_start: pct_start,
                }],
            }],
        },
    ]
}

/// Builds the full dataset, shuffled so fact and comparison examples mix.
pub fn build_dataset(table: &MetricTable) -> Result<SquadFile> {
    let mut paragraphs = Vec::new();

    for topic in table.topic_names() {
        let valid: Vec<(&str, f64)> = table
            .period_keys()
            .iter()
            .filter_map(|p| {
                table
                    .get(topic, p)
                    .unwrap_or(None)
                    .map(|v| (p.as_str(), v))
            })
            .collect();

        for (period, value) in &valid {
            paragraphs.push(fact_paragraph(topic, period, *value));
        }
        for ((p1, v1), (p2, v2)) in valid.into_iter().tuple_combinations() {
            paragraphs.extend(comparison_paragraphs(topic, p1, p2, v1, v2));
        }
    }

    paragraphs.shuffle(&mut rand::thread_rng());
    info!("generated {} QA paragraphs", paragraphs.len());

    Ok(SquadFile {
        version: "2.0".to_string(),
        data: vec![SquadDocument {
            title: "Financial_QAs".to_string(),
            paragraphs,
        }],
    })
}

/// Writes the dataset as pretty-printed JSON.
pub fn export_squad(dataset: &SquadFile, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(dataset)?;
    std::fs::write(path, json)?;
    Ok(())
}
