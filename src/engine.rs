//! Query resolution pipeline: classify, resolve, compute, format.
//!
//! The pipeline is strictly linear per call and every internal step
//! reports failure as an absent result; one boundary at [`QaEngine::answer_query`]
//! converts genuinely unexpected errors into a textual answer, so the
//! public surface is total.

use crate::config::QaConfig;
use crate::error::Result;
use crate::fallback::FallbackAnswerer;
use crate::intent::{IntentClassifier, QueryIntent};
use crate::loader;
use crate::periods::PeriodResolver;
use crate::similarity::TokenSetRatio;
use crate::table::MetricTable;
use crate::topics::TopicResolver;
use tracing::{info, warn};

const GUIDANCE: &str =
    "Please ask about a specific metric and quarter (e.g. 'What was revenue in Q3?')";

/// Result of interpreting one question. Ephemeral, one per call.
#[derive(Debug, Clone)]
pub struct ParsedQuery {
    pub intent: QueryIntent,
    pub topic: Option<String>,
    pub periods: Vec<String>,
}

/// Numeric outcome of a two-period resolution.
#[derive(Debug, Clone)]
pub struct ResolutionResult {
    pub first_period: String,
    pub first_value: f64,
    pub second_period: String,
    pub second_value: f64,
    pub increased: bool,
    /// None when the base value is zero.
    pub percent_change: Option<f64>,
}

impl ResolutionResult {
    fn new(first_period: String, first_value: f64, second_period: String, second_value: f64) -> Self {
        let percent_change = if first_value == 0.0 {
            None
        } else {
            Some((second_value - first_value) / first_value * 100.0)
        };
        Self {
            increased: second_value > first_value,
            first_period,
            first_value,
            second_period,
            second_value,
            percent_change,
        }
    }
}

/// The query answering engine. Immutable after construction; all answer
/// paths take `&self`, so one instance serves concurrent callers.
pub struct QaEngine {
    table: MetricTable,
    topics: TopicResolver,
    periods: PeriodResolver,
    intents: IntentClassifier,
    fallback: Box<dyn FallbackAnswerer>,
}

impl QaEngine {
    pub fn new(config: QaConfig, table: MetricTable, fallback: Box<dyn FallbackAnswerer>) -> Self {
        let topics = TopicResolver::new(
            config.topic_aliases,
            config.similarity_threshold,
            Box::new(TokenSetRatio),
        );
        let periods = PeriodResolver::new(config.period_aliases, config.year_comparison);
        Self {
            table,
            topics,
            periods,
            intents: IntentClassifier,
            fallback,
        }
    }

    /// Loads the table from the configured CSV path and builds the engine.
    pub fn from_config(config: QaConfig, fallback: Box<dyn FallbackAnswerer>) -> Result<Self> {
        let table = loader::load_table(&config.csv_path)?;
        Ok(Self::new(config, table, fallback))
    }

    /// Answers one question. Total: every input yields a string.
    pub async fn answer_query(&self, question: &str) -> String {
        match self.answer_inner(question).await {
            Ok(answer) => answer,
            Err(e) => format!("Error processing your question: {}", e),
        }
    }

    /// Interprets one question into intent, topic and periods.
    pub fn parse(&self, question: &str) -> ParsedQuery {
        let topic = self.topics.resolve(question, self.table.topic_names());
        let single = self.periods.resolve_single(question);
        let intent = self
            .intents
            .classify(question, topic.as_deref(), single.as_deref());
        let periods = match intent {
            QueryIntent::YesNo | QueryIntent::Growth | QueryIntent::Comparison => {
                self.periods.resolve_pair(question)
            }
            _ => single.into_iter().collect(),
        };
        ParsedQuery {
            intent,
            topic,
            periods,
        }
    }

    async fn answer_inner(&self, question: &str) -> Result<String> {
        let parsed = self.parse(question);
        info!(
            intent = ?parsed.intent,
            topic = ?parsed.topic,
            periods = ?parsed.periods,
            "parsed query"
        );

        // Comparative intents first; an unresolvable comparison falls
        // through to the single-value path rather than failing.
        if let Some(topic) = parsed.topic.as_deref() {
            let comparative = match parsed.intent {
                QueryIntent::YesNo => self.yesno_answer(question, topic, &parsed.periods)?,
                QueryIntent::Growth => self.growth_answer(topic, &parsed.periods)?,
                QueryIntent::Comparison => self.comparison_answer(topic, &parsed.periods)?,
                _ => None,
            };
            if let Some(answer) = comparative {
                return Ok(answer);
            }
        }

        let single = match parsed.intent {
            QueryIntent::Fact => parsed.periods.first().cloned(),
            _ => self.periods.resolve_single(question),
        };
        match (parsed.topic.as_deref(), single) {
            (Some(topic), Some(period)) => match self.table.get(topic, &period)? {
                Some(value) => Ok(format!("The {} for {} is {}.", topic, period, value)),
                None => Ok(format!("Could not find {} data for {}", topic, period)),
            },
            _ => self.deferred_answer(question).await,
        }
    }

    /// Rule-based resolution came up empty: hand the raw question to the
    /// fallback model. A fallback failure or an empty span degrades to the
    /// guidance message, never to an internal failure description.
    async fn deferred_answer(&self, question: &str) -> Result<String> {
        let context = self.table.context_text();
        match self.fallback.answer(question, &context).await {
            Ok(answer) if !answer.trim().is_empty() => Ok(answer),
            Ok(_) => Ok(GUIDANCE.to_string()),
            Err(e) => {
                warn!(error = %e, "fallback answerer failed");
                Ok(GUIDANCE.to_string())
            }
        }
    }

    /// Shared two-period resolution for the comparative intents. None when
    /// fewer than two periods resolved or either value is missing.
    fn resolve_change(&self, topic: &str, periods: &[String]) -> Result<Option<ResolutionResult>> {
        if periods.len() < 2 {
            return Ok(None);
        }
        let (p1, p2) = (&periods[0], &periods[1]);
        for period in [p1, p2] {
            if !self.table.has_period(period) {
                warn!(period = period.as_str(), "resolved period missing from table");
            }
        }
        match (self.table.get(topic, p1)?, self.table.get(topic, p2)?) {
            (Some(v1), Some(v2)) => Ok(Some(ResolutionResult::new(
                p1.clone(),
                v1,
                p2.clone(),
                v2,
            ))),
            _ => Ok(None),
        }
    }

    fn cannot_compute(topic: &str, period: &str) -> String {
        format!(
            "Cannot compute change for {}: base value for {} is zero",
            topic, period
        )
    }

    fn yesno_answer(
        &self,
        question: &str,
        topic: &str,
        periods: &[String],
    ) -> Result<Option<String>> {
        let Some(result) = self.resolve_change(topic, periods)? else {
            return Ok(None);
        };
        let Some(change) = result.percent_change else {
            return Ok(Some(Self::cannot_compute(topic, &result.first_period)));
        };
        let direction = if result.increased { "increased" } else { "decreased" };
        let q = question.to_lowercase();
        let answer = if (q.contains("increase") && result.increased)
            || (q.contains("decrease") && !result.increased)
        {
            "yes"
        } else {
            "no"
        };
        Ok(Some(format!(
            "{} {} from {} to {} ({:.2}%). Answer: {}",
            topic,
            direction,
            result.first_value,
            result.second_value,
            change.abs(),
            answer
        )))
    }

    fn growth_answer(&self, topic: &str, periods: &[String]) -> Result<Option<String>> {
        let Some(result) = self.resolve_change(topic, periods)? else {
            return Ok(None);
        };
        let Some(change) = result.percent_change else {
            return Ok(Some(Self::cannot_compute(topic, &result.first_period)));
        };
        let direction = if change > 0.0 { "increased" } else { "decreased" };
        Ok(Some(format!(
            "{} {} by {:.2}% from {} to {}",
            topic,
            direction,
            change.abs(),
            result.first_period,
            result.second_period
        )))
    }

    fn comparison_answer(&self, topic: &str, periods: &[String]) -> Result<Option<String>> {
        let Some(result) = self.resolve_change(topic, periods)? else {
            return Ok(None);
        };
        let Some(change) = result.percent_change else {
            return Ok(Some(Self::cannot_compute(topic, &result.first_period)));
        };
        // Zero change counts as an increase.
        let direction = if change >= 0.0 { "Increase" } else { "Decrease" };
        Ok(Some(format!(
            "{} changed from {} ({}) to {} ({}). {} of {:.2}%",
            topic,
            result.first_value,
            result.first_period,
            result.second_value,
            result.second_period,
            direction,
            change.abs()
        )))
    }
}
