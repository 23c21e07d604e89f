//! Schema probe backed by an HTTP validation endpoint.
//!
//! The endpoint receives the command text and the placeholder values and is
//! expected to run it schema-only against the real database:
//!
//! ```json
//! {"sql": "SELECT * FROM Users WHERE id = @id", "parameters": {"id": 0}, "schema_only": true}
//! ```
//!
//! Any 2xx answer validates the command. Otherwise the `error` or `message`
//! field of a JSON body, or the raw body, is the failure message. Timeouts,
//! connection failures, 429 and 5xx answers are retried with exponential
//! backoff until the probe's time budget would run out, after which the last
//! failure is reported.

use std::time::Duration;

use indexmap::IndexMap;
use reqwest::StatusCode;
use serde::Serialize;
use tokio::time::{Instant, sleep};

use super::{ProbeOutcome, SchemaProbe};
use crate::{
    analysis::{DummyValue, ParamBinding},
    config::RetryConfig
};

/// HTTP client for the validation endpoint with retry support.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    url:          String,
    client:       reqwest::Client,
    retry_config: RetryConfig,
    /// Total time one probe may spend, retries included
    budget:       Duration
}

#[derive(Serialize)]
struct ProbeRequest<'a> {
    sql:         &'a str,
    parameters:  IndexMap<&'a str, Option<&'a DummyValue>>,
    schema_only: bool
}

enum Attempt {
    Done(ProbeOutcome),
    Retry(String)
}

impl HttpProbe {
    /// Create a probe that spends at most `budget` per command
    pub fn new(url: impl Into<String>, retry_config: RetryConfig, budget: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(budget)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            url: url.into(),
            client,
            retry_config,
            budget
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call_with_retry(&self, request: &ProbeRequest<'_>) -> ProbeOutcome {
        let deadline = Instant::now() + self.budget;
        let mut last_error = String::from("All retry attempts failed");
        let mut delay = self.retry_config.initial_delay_ms;
        for attempt in 0..=self.retry_config.max_retries {
            if attempt > 0 {
                if Instant::now() + Duration::from_millis(delay) >= deadline {
                    tracing::warn!(
                        attempt = attempt + 1,
                        delay_ms = delay,
                        "schema probe retry would outlast the timeout"
                    );
                    return ProbeOutcome::Failed(last_error);
                }
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts = self.retry_config.max_retries + 1,
                    delay_ms = delay,
                    "retrying schema probe request"
                );
                sleep(Duration::from_millis(delay)).await;
                delay = ((delay as f64 * self.retry_config.backoff_factor) as u64)
                    .min(self.retry_config.max_delay_ms);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.send(request, remaining).await {
                Attempt::Done(outcome) => return outcome,
                Attempt::Retry(message) => last_error = message
            }
        }
        ProbeOutcome::Failed(last_error)
    }

    async fn send(&self, request: &ProbeRequest<'_>, timeout: Duration) -> Attempt {
        let response = match self
            .client
            .post(&self.url)
            .timeout(timeout)
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() || e.is_connect() => {
                return Attempt::Retry(format!("Schema probe request failed: {}", e));
            }
            Err(e) => {
                return Attempt::Done(ProbeOutcome::Failed(format!(
                    "Schema probe request failed: {}",
                    e
                )));
            }
        };
        let status = response.status();
        if status.is_success() {
            return Attempt::Done(ProbeOutcome::Validated);
        }
        let body = response.text().await.unwrap_or_default();
        let message = failure_message(status, &body);
        if is_retryable_status(status) {
            Attempt::Retry(message)
        } else {
            Attempt::Done(ProbeOutcome::Failed(message))
        }
    }
}

impl SchemaProbe for HttpProbe {
    async fn probe(&self, sql: &str, bindings: &[ParamBinding]) -> ProbeOutcome {
        let mut parameters = IndexMap::new();
        for binding in bindings {
            if let Ok(name) = &binding.name {
                parameters
                    .entry(name.as_str())
                    .or_insert(binding.value.as_ref());
            }
        }
        let request = ProbeRequest {
            sql,
            parameters,
            schema_only: true
        };
        self.call_with_retry(&request).await
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn failure_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["error", "message"]
                .iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_string))
        });
    match from_json {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => format!("Schema probe endpoint returned {}", status)
    }
}
