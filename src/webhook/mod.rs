use crate::models::chat::ChatResponse;

use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use serde::Serialize;
use std::error::Error as StdError;

/// Seam between the UI controller and whatever answers queries. The
/// production implementation is [`WebhookClient`]; tests substitute
/// their own.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    async fn query(
        &self,
        text: &str
    ) -> Result<ChatResponse, Box<dyn StdError + Send + Sync>>;
}

#[derive(Serialize)]
struct QueryRequest {
    query: String,
}

/// Client for the external workflow webhook. One POST per user message,
/// no retries and no timeout: the UI keeps at most one request in
/// flight, so a slow endpoint simply keeps the composer locked.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: HttpClient,
    endpoint: String,
}

impl WebhookClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl QueryBackend for WebhookClient {
    async fn query(
        &self,
        text: &str
    ) -> Result<ChatResponse, Box<dyn StdError + Send + Sync>> {
        let req = QueryRequest {
            query: text.to_string(),
        };
        debug!("POST {} query_len={}", self.endpoint, text.len());
        let resp = self.http
            .post(&self.endpoint)
            .json(&req)
            .send().await?
            .error_for_status()?;
        let data = resp.json::<ChatResponse>().await?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_body_is_a_single_query_field() {
        let req = QueryRequest {
            query: "machine status".into(),
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body, serde_json::json!({"query": "machine status"}));
    }
}
