//! HTTP Translator
//!
//! Calls a remote translate endpoint (`POST {endpoint}` with a JSON
//! [`TranslationRequest`]) and maps transport failures onto [`TranslateError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, StatusCode};
use url::Url;

use super::translator::{
    Result, TranslateError, TranslationRequest, TranslationResponse, Translator,
};
use super::types::TranslationResult;

/// Header carrying a per-call correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Remote translator over HTTP.
pub struct HttpTranslator {
    endpoint: Url,
    client: Client,
}

impl HttpTranslator {
    /// `timeout` bounds the whole HTTP exchange; the orchestrator applies its
    /// own, usually shorter, deadline on top.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    fn name(&self) -> &str {
        "http"
    }

    async fn translate(&self, request: TranslationRequest) -> Result<TranslationResult> {
        let request_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!(
            request_id = %request_id,
            endpoint = %self.endpoint,
            query = %request.query,
            "Sending translation request"
        );

        let resp = self
            .client
            .post(self.endpoint.clone())
            .header(REQUEST_ID_HEADER, &request_id)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranslateError::Timeout
                } else {
                    TranslateError::Http(e)
                }
            })?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            tracing::warn!(request_id = %request_id, ?retry_after_secs, "Translator rate limited");
            return Err(TranslateError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TranslationResponse>(&text)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or(text);
            return Err(TranslateError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        let response: TranslationResponse = serde_json::from_str(&body)?;
        let result = response.into_result()?;

        tracing::debug!(
            request_id = %request_id,
            grammar = %result.grammar_query,
            source = %result.source,
            "Translation received"
        );
        Ok(result)
    }
}
