//! Fallback extractive QA model, used when rule-based resolution is
//! inconclusive.

use crate::error::{QaError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Opaque `(question, context) -> answer span` collaborator.
#[async_trait]
pub trait FallbackAnswerer: Send + Sync {
    async fn answer(&self, question: &str, context: &str) -> Result<String>;
}

/// Client for a hosted question-answering inference endpoint. The context
/// is split into fixed-size chunks and the best-scoring span wins, since
/// extractive models cap their input length.
pub struct HfQaClient {
    model_id: String,
    api_token: String,
    base_url: String,
    client: reqwest::Client,
    chunk_size: usize,
}

#[derive(Debug, Deserialize)]
struct QaResponse {
    answer: String,
    #[serde(default)]
    score: f64,
}

impl HfQaClient {
    pub fn new(model_id: String, api_token: String) -> Self {
        Self {
            model_id,
            api_token,
            base_url: "https://api-inference.huggingface.co/models".to_string(),
            client: reqwest::Client::new(),
            chunk_size: 800,
        }
    }

    async fn query_chunk(&self, question: &str, context: &str) -> Result<QaResponse> {
        let body = serde_json::json!({
            "inputs": { "question": question, "context": context }
        });
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, self.model_id))
            .header("Authorization", format!("Bearer {}", self.api_token))
            .json(&body)
            .send()
            .await
            .map_err(|e| QaError::Fallback(format!("inference call failed: {}", e)))?;

        response
            .json::<QaResponse>()
            .await
            .map_err(|e| QaError::Fallback(format!("failed to parse inference response: {}", e)))
    }

    fn chunks(context: &str, size: usize) -> Vec<String> {
        let chars: Vec<char> = context.chars().collect();
        chars.chunks(size).map(|c| c.iter().collect()).collect()
    }
}

#[async_trait]
impl FallbackAnswerer for HfQaClient {
    async fn answer(&self, question: &str, context: &str) -> Result<String> {
        if self.api_token.is_empty() {
            return Err(QaError::Fallback(
                "no inference API token configured".to_string(),
            ));
        }

        let mut best: Option<QaResponse> = None;
        for chunk in Self::chunks(context, self.chunk_size) {
            let response = self.query_chunk(question, &chunk).await?;
            debug!(score = response.score, "fallback chunk scored");
            if best.as_ref().map_or(true, |b| response.score > b.score) {
                best = Some(response);
            }
        }
        best.map(|b| b.answer)
            .ok_or_else(|| QaError::Fallback("empty context".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunking_preserves_content() {
        let text = "a".repeat(1700);
        let chunks = HfQaClient::chunks(&text, 800);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks.concat(), text);
    }

    #[tokio::test]
    async fn test_missing_token_is_an_error() {
        let client = HfQaClient::new("qa_finetuned".to_string(), String::new());
        let result = client.answer("question?", "context").await;
        assert!(matches!(result, Err(QaError::Fallback(_))));
    }
}
