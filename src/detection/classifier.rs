/*!
 * Remote text-classification backend.
 *
 * Speaks the Hugging Face inference API shape: the request body is
 * `{"inputs": "<text>"}` and the response is a list of `{label, score}`
 * entries, either flat or nested one level per input.
 */

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::Detector;
use crate::errors::DetectorError;

/// Text used to check that the endpoint answers
const PROBE_TEXT: &str = "This short sentence only checks that the classifier endpoint responds.";

/// Request body for the classification endpoint
#[derive(Debug, Serialize)]
struct ClassificationRequest<'a> {
    inputs: &'a str,
}

/// One label with its probability
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Response body; some deployments nest the list per input
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ClassificationResponse {
    fn into_labels(self) -> Vec<LabelScore> {
        match self {
            ClassificationResponse::Nested(mut outer) => {
                if outer.is_empty() {
                    Vec::new()
                } else {
                    outer.swap_remove(0)
                }
            }
            ClassificationResponse::Flat(labels) => labels,
        }
    }
}

/// Client for a text-classification endpoint
#[derive(Debug)]
pub struct ClassifierDetector {
    name: String,
    endpoint: Url,
    api_key: Option<String>,
    /// Labels meaning "human-written", compared case-insensitively
    human_labels: Vec<String>,
    client: Client,
}

impl ClassifierDetector {
    pub fn new(
        name: impl Into<String>,
        endpoint: &str,
        api_key: Option<String>,
        human_labels: Vec<String>,
        timeout: Duration,
    ) -> Result<Self, DetectorError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| DetectorError::Unavailable(format!("invalid endpoint '{}': {}", endpoint, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DetectorError::Unavailable(e.to_string()))?;

        Ok(Self {
            name: name.into(),
            endpoint,
            api_key: api_key.filter(|k| !k.is_empty()),
            human_labels: human_labels.into_iter().map(|l| l.to_lowercase()).collect(),
            client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Map the classifier output to an AI probability.
    ///
    /// The highest-scoring label wins; when it is a human label the AI
    /// probability is its complement.
    pub fn ai_probability(&self, labels: &[LabelScore]) -> Result<f64, DetectorError> {
        let top = labels
            .iter()
            .filter(|l| l.score.is_finite())
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or_else(|| DetectorError::ParseError("classifier returned no labels".to_string()))?;

        if self.human_labels.contains(&top.label.to_lowercase()) {
            Ok(1.0 - top.score)
        } else {
            Ok(top.score)
        }
    }

    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, DetectorError> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&ClassificationRequest { inputs: text });

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Classifier API error ({}): {}", status, message);
            return Err(DetectorError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: ClassificationResponse = serde_json::from_str(&body)
            .map_err(|e| DetectorError::ParseError(format!("{}: {}", e, body)))?;

        Ok(parsed.into_labels())
    }
}

#[async_trait]
impl Detector for ClassifierDetector {
    fn name(&self) -> &str {
        &self.name
    }

    async fn probe(&self) -> Result<(), DetectorError> {
        debug!("Probing classifier at {}", self.endpoint);
        let labels = self.classify(PROBE_TEXT).await?;
        self.ai_probability(&labels).map(|_| ())
    }

    async fn score_chunk(&self, chunk: &str) -> Result<f64, DetectorError> {
        let labels = self.classify(chunk).await?;
        self.ai_probability(&labels)
    }
}
