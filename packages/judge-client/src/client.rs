//! HTTP client for the Judge0 batch submission API.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response, Url};
use tracing::{debug, info, warn};

use crate::codec;
use crate::config::Judge0Config;
use crate::error::JudgeClientError;
use crate::models::{
    BatchFetchResponse, BatchSubmitRequest, FetchedStatus, JudgeReport, TestInput, WireSubmission,
};
use crate::traits::JudgeBackend;

pub struct Judge0Client {
    client: Client,
    batch_url: Url,
    callback_url: Option<String>,
    max_batch_size: usize,
}

impl std::fmt::Debug for Judge0Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Judge0Client")
            .field("batch_url", &self.batch_url.as_str())
            .field("callback_enabled", &self.callback_url.is_some())
            .field("max_batch_size", &self.max_batch_size)
            .finish()
    }
}

impl Judge0Client {
    pub fn new(config: &Judge0Config) -> Result<Self, JudgeClientError> {
        let batch_url = Url::parse(&format!(
            "{}/submissions/batch",
            config.base_url.trim_end_matches('/')
        ))
        .map_err(|e| {
            JudgeClientError::Config(format!("Invalid base URL '{}': {}", config.base_url, e))
        })?;

        let mut headers = HeaderMap::new();
        if let Some(token) = config.auth_token.as_deref().filter(|t| !t.is_empty()) {
            headers.insert(
                HeaderName::from_bytes(config.auth_header.as_bytes()).map_err(|e| {
                    JudgeClientError::Config(format!("Invalid auth header name: {}", e))
                })?,
                HeaderValue::from_str(token)
                    .map_err(|e| JudgeClientError::Config(format!("Invalid auth token: {}", e)))?,
            );
        }
        if let Some(host) = config.rapidapi_host.as_deref() {
            headers.insert(
                HeaderName::from_static("x-rapidapi-host"),
                HeaderValue::from_str(host)
                    .map_err(|e| JudgeClientError::Config(format!("Invalid RapidAPI host: {}", e)))?,
            );
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(format!("judge-client/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| JudgeClientError::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            batch_url = %batch_url,
            timeout_ms = config.timeout_ms,
            callbacks = config.callback_url.is_some(),
            "Created Judge0 client"
        );

        Ok(Self {
            client,
            batch_url,
            callback_url: config.callback_url.clone(),
            max_batch_size: config.max_batch_size.max(1),
        })
    }

    async fn submit_chunk(
        &self,
        language_id: i32,
        encoded_source: &str,
        inputs: &[TestInput],
    ) -> Result<Vec<String>, JudgeClientError> {
        let mut url = self.batch_url.clone();
        url.query_pairs_mut().append_pair("base64_encoded", "true");

        let body = BatchSubmitRequest {
            submissions: inputs
                .iter()
                .map(|input| WireSubmission {
                    language_id,
                    source_code: encoded_source.to_string(),
                    stdin: codec::encode(&input.stdin),
                    expected_output: codec::encode(&input.expected_output),
                    callback_url: self.callback_url.clone(),
                })
                .collect(),
        };

        debug!(url = %url, count = inputs.len(), "Dispatching batch");

        let response = self.client.post(url).json(&body).send().await?;
        let entries: Vec<serde_json::Value> = check_status(response).await?.json().await?;

        if entries.len() != inputs.len() {
            return Err(JudgeClientError::InvalidResponse(format!(
                "expected {} tokens, got {}",
                inputs.len(),
                entries.len()
            )));
        }

        entries
            .into_iter()
            .map(|entry| match entry.get("token").and_then(|t| t.as_str()) {
                Some(token) if !token.is_empty() => Ok(token.to_string()),
                _ => Err(JudgeClientError::Rejected {
                    status: 201,
                    body: entry.to_string(),
                }),
            })
            .collect()
    }

    async fn fetch_chunk(&self, tokens: &[String]) -> Result<Vec<FetchedStatus>, JudgeClientError> {
        let mut url = self.batch_url.clone();
        url.query_pairs_mut()
            .append_pair("tokens", &tokens.join(","))
            .append_pair("base64_encoded", "true")
            .append_pair("fields", "*");

        debug!(count = tokens.len(), "Fetching batch");

        let response = self.client.get(url).send().await?;
        let body: BatchFetchResponse = check_status(response).await?.json().await?;

        let mut by_token: HashMap<String, JudgeReport> = HashMap::with_capacity(tokens.len());
        for wire in body.submissions.into_iter().flatten() {
            let token = wire.token.clone();
            match JudgeReport::from_wire(wire) {
                Ok(report) => {
                    by_token.insert(report.token.clone(), report);
                }
                Err(e) => {
                    warn!(token = %token, error = %e, "Ignoring unusable judge result");
                }
            }
        }

        Ok(tokens
            .iter()
            .map(|token| match by_token.remove(token) {
                Some(report) => FetchedStatus::Known(report),
                None => FetchedStatus::Unrecognised(token.clone()),
            })
            .collect())
    }
}

/// Map non-2xx responses onto the client error taxonomy.
async fn check_status(response: Response) -> Result<Response, JudgeClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    if status.is_server_error() {
        Err(JudgeClientError::Unavailable(format!("{} - {}", status, body)))
    } else {
        Err(JudgeClientError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl JudgeBackend for Judge0Client {
    async fn dispatch_batch(
        &self,
        language_id: i32,
        source_code: &str,
        inputs: &[TestInput],
    ) -> Result<Vec<String>, JudgeClientError> {
        let encoded_source = codec::encode(source_code);
        let mut tokens = Vec::with_capacity(inputs.len());

        for chunk in inputs.chunks(self.max_batch_size) {
            tokens.extend(self.submit_chunk(language_id, &encoded_source, chunk).await?);
        }

        Ok(tokens)
    }

    async fn fetch_batch(&self, tokens: &[String]) -> Result<Vec<FetchedStatus>, JudgeClientError> {
        let mut statuses = Vec::with_capacity(tokens.len());

        for chunk in tokens.chunks(self.max_batch_size) {
            statuses.extend(self.fetch_chunk(chunk).await?);
        }

        Ok(statuses)
    }
}
