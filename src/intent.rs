//! Lexical intent classification.

/// Question intent. Lexical, not semantic: surface tokens decide, with a
/// fixed priority order as the tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryIntent {
    /// Single-value lookup.
    Fact,
    /// "Did X increase ...?" style questions.
    YesNo,
    /// Growth / change questions.
    Growth,
    /// Explicit two-period comparison.
    Comparison,
    /// Nothing recognized; defer to the fallback model.
    Unknown,
}

#[derive(Debug, Default)]
pub struct IntentClassifier;

impl IntentClassifier {
    /// Rule order is deliberate: yes/no words beat growth words beat
    /// comparison words. A bare lookup is FACT only when both a topic and
    /// a single period resolved; otherwise the question is UNKNOWN.
    pub fn classify(
        &self,
        question: &str,
        topic: Option<&str>,
        period: Option<&str>,
    ) -> QueryIntent {
        let q = question.to_lowercase();
        if q.contains("did") || q.contains("was") {
            QueryIntent::YesNo
        } else if q.contains("growth") || q.contains("change") {
            QueryIntent::Growth
        } else if q.contains("compare") || q.contains("vs") {
            QueryIntent::Comparison
        } else if topic.is_some() && period.is_some() {
            QueryIntent::Fact
        } else {
            QueryIntent::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_priority() {
        let c = IntentClassifier;
        // "did" outranks "change", "change" outranks "compare".
        assert_eq!(c.classify("did profit change?", None, None), QueryIntent::YesNo);
        assert_eq!(
            c.classify("compare the change in profit", None, None),
            QueryIntent::Growth
        );
        assert_eq!(
            c.classify("compare profit q2 vs q3", None, None),
            QueryIntent::Comparison
        );
    }

    #[test]
    fn test_fact_requires_topic_and_period() {
        let c = IntentClassifier;
        assert_eq!(
            c.classify("profit for q3", Some("profit"), Some("sep-24")),
            QueryIntent::Fact
        );
        assert_eq!(c.classify("profit for q3", Some("profit"), None), QueryIntent::Unknown);
        assert_eq!(c.classify("anything at all", None, None), QueryIntent::Unknown);
    }
}
