//! HTTP client for a remote scoring service

use super::CategoryScorer;
use anyhow::{Context, Result};
use async_trait::async_trait;
use modelabs_domain::{ModelId, ModelRecord, ModelType};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ScoreRequest<'a> {
    model_id: &'a ModelId,
    model_name: &'a str,
    model_type: ModelType,
    categories: &'a [&'static str],
    metadata: &'a serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ScoreResponse {
    category_scores: BTreeMap<String, f64>,
}

/// Scorer that POSTs the model to `{base_url}/score` and reads back
/// `{"category_scores": {...}}`.
#[derive(Debug, Clone)]
pub struct HttpCategoryScorer {
    client: Client,
    endpoint: String,
}

impl HttpCategoryScorer {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build scoring client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/score", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CategoryScorer for HttpCategoryScorer {
    async fn score(&self, record: &ModelRecord) -> Result<BTreeMap<String, f64>> {
        let request = ScoreRequest {
            model_id: &record.id,
            model_name: &record.name,
            model_type: record.model_type,
            categories: record.model_type.categories(),
            metadata: &record.metadata,
        };

        debug!(endpoint = %self.endpoint, model_id = %record.id, "Requesting scores");

        let response: ScoreResponse = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .context("scoring request failed")?
            .error_for_status()
            .context("scoring service returned an error")?
            .json()
            .await
            .context("invalid scoring response")?;

        Ok(response.category_scores)
    }

    fn name(&self) -> &str {
        "HttpCategoryScorer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record() -> ModelRecord {
        ModelRecord::new(
            ModelId::new("vision-1").unwrap(),
            ModelType::Multimodal,
            "Vision One",
        )
    }

    #[tokio::test]
    async fn test_scores_are_parsed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/score"))
            .and(body_partial_json(json!({
                "model_id": "vision-1",
                "model_type": "Multimodal",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "category_scores": {"visual_recognition": 81.5, "integration": 70.0}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let scorer = HttpCategoryScorer::new(&format!("{}/", server.uri()), Duration::from_secs(5)).unwrap();
        let scores = scorer.score(&record()).await.unwrap();

        assert_eq!(scores.len(), 2);
        assert_eq!(scores["visual_recognition"], 81.5);
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/score"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let scorer = HttpCategoryScorer::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let err = scorer.score(&record()).await.unwrap_err();
        assert!(format!("{:#}", err).contains("scoring service returned an error"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/score"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"scores": []})))
            .mount(&server)
            .await;

        let scorer = HttpCategoryScorer::new(&server.uri(), Duration::from_secs(5)).unwrap();
        assert!(scorer.score(&record()).await.is_err());
    }
}
