use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::core::config::SurveyApiConfig;
use crate::features::survey::models::SurveyRecord;

#[derive(Debug, thiserror::Error)]
pub enum SurveyClientError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Survey request failed: {0}")]
    Request(String),

    #[error("Survey API returned HTTP {0}")]
    Status(u16),

    #[error("Failed to decode survey response: {0}")]
    Decode(String),
}

/// Anything that can produce the current set of survey submissions
#[async_trait]
pub trait SurveySource: Send + Sync {
    async fn fetch_records(&self) -> Result<Vec<SurveyRecord>, SurveyClientError>;
}

/// Kobo data endpoint payload: either the paginated envelope or a bare array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum KoboDataResponse {
    Paged {
        #[serde(default)]
        results: Vec<Value>,
    },
    List(Vec<Value>),
}

impl KoboDataResponse {
    fn into_values(self) -> Vec<Value> {
        match self {
            KoboDataResponse::Paged { results } => results,
            KoboDataResponse::List(values) => values,
        }
    }
}

/// Client for the KoboToolbox submissions API
pub struct KoboClient {
    client: reqwest::Client,
    config: SurveyApiConfig,
}

impl KoboClient {
    pub fn new(config: SurveyApiConfig) -> Result<Self, SurveyClientError> {
        let client = reqwest::Client::builder()
            .user_agent("TraceabilityDashboard/1.0 (farm-survey-monitoring)")
            .build()
            .map_err(|e| SurveyClientError::Client(e.to_string()))?;

        if config.token.is_none() {
            tracing::warn!("KOBO_TOKEN is not set; survey requests will be unauthenticated");
        }

        Ok(Self { client, config })
    }
}

#[async_trait]
impl SurveySource for KoboClient {
    async fn fetch_records(&self) -> Result<Vec<SurveyRecord>, SurveyClientError> {
        let url = self.config.data_url();
        tracing::debug!("Fetching survey records from {}", url);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.config.token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("Token {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| SurveyClientError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SurveyClientError::Status(response.status().as_u16()));
        }

        let payload: KoboDataResponse = response
            .json()
            .await
            .map_err(|e| SurveyClientError::Decode(e.to_string()))?;

        Ok(decode_records(payload.into_values()))
    }
}

/// Decode raw submissions one by one, skipping the ones that do not fit.
fn decode_records(values: Vec<Value>) -> Vec<SurveyRecord> {
    let total = values.len();
    let records: Vec<SurveyRecord> = values
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping survey submission #{}: {}", i, e);
                None
            }
        })
        .collect();

    tracing::debug!("Decoded {}/{} survey submissions", records.len(), total);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paged_and_bare_payloads() {
        let paged: KoboDataResponse =
            serde_json::from_value(json!({"count": 1, "results": [{"_id": 1}]})).unwrap();
        assert_eq!(paged.into_values().len(), 1);

        let bare: KoboDataResponse = serde_json::from_value(json!([{"_id": 1}, {"_id": 2}])).unwrap();
        assert_eq!(bare.into_values().len(), 2);

        let no_results: KoboDataResponse = serde_json::from_value(json!({"detail": "x"})).unwrap();
        assert!(no_results.into_values().is_empty());
    }

    #[test]
    fn test_decode_skips_non_objects() {
        let records = decode_records(vec![json!({"_id": 1}), json!("garbage"), json!(42)]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let client = KoboClient::new(SurveyApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            asset_uid: "missing".to_string(),
            token: Some("token".to_string()),
        })
        .unwrap();

        let result = client.fetch_records().await;
        assert!(matches!(result, Err(SurveyClientError::Request(_))));
    }
}
