//! Topic resolution: free text to canonical table topic.

use crate::similarity::Similarity;
use tracing::debug;

/// Resolves topic references via the alias table first, then by fuzzy
/// matching the whole question against the known topic names.
pub struct TopicResolver {
    aliases: Vec<(String, String)>,
    threshold: f64,
    similarity: Box<dyn Similarity>,
}

impl TopicResolver {
    pub fn new(
        aliases: Vec<(String, String)>,
        threshold: f64,
        similarity: Box<dyn Similarity>,
    ) -> Self {
        Self {
            aliases,
            threshold,
            similarity,
        }
    }

    /// Alias phrases are scanned in declaration order; the first phrase
    /// contained in the question wins. Without an alias hit, the best
    /// fuzzy candidate is accepted only above the threshold; ties keep the
    /// earlier table row.
    pub fn resolve<'a, I>(&self, question: &str, topics: I) -> Option<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let q = question.to_lowercase();
        for (phrase, canonical) in &self.aliases {
            if q.contains(phrase.as_str()) {
                return Some(canonical.clone());
            }
        }

        let mut best: Option<(&str, f64)> = None;
        for candidate in topics {
            let score = self.similarity.score(&q, candidate);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((candidate, score));
            }
        }
        match best {
            Some((topic, score)) if score > self.threshold => {
                debug!(topic, score, "fuzzy topic match");
                Some(topic.to_string())
            }
            _ => None,
        }
    }
}
