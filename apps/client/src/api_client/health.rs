//! Health Prober — finds out whether, and where, a working backend answers.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::fallback::{try_in_order, FallbackError, Step};
use super::{looks_like_html, ApiClient};

/// Tried in this order; the first qualifying response wins.
pub const HEALTH_PATHS: [&str; 3] = ["/v1/resume/health", "/health", "/"];
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Produced once per probe and not retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResult {
    pub is_healthy: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResult {
    fn healthy(endpoint: &str, data: Value) -> Self {
        Self {
            is_healthy: true,
            message: "Backend is running".to_string(),
            endpoint: Some(endpoint.to_string()),
            data: Some(data),
            error: None,
        }
    }

    fn unhealthy(message: &str, error: Option<String>) -> Self {
        Self {
            is_healthy: false,
            message: message.to_string(),
            endpoint: None,
            data: None,
            error,
        }
    }
}

/// Decides whether a single health response qualifies.
///
/// Qualifies: 2xx, or 4xx other than 404; not an HTML page; a JSON object or
/// array body. Anything else returns the reason to move on.
pub fn classify_response(status: StatusCode, body: &str) -> Result<Value, String> {
    if status == StatusCode::NOT_FOUND {
        return Err("not found (404)".to_string());
    }
    if status.is_server_error() {
        return Err(format!("server error ({status})"));
    }
    if !(status.is_success() || status.is_client_error()) {
        return Err(format!("unexpected status ({status})"));
    }
    if looks_like_html(body) {
        return Err("HTML page instead of JSON".to_string());
    }
    match serde_json::from_str::<Value>(body) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Ok(value),
        Ok(_) => Err("body is not a structured JSON document".to_string()),
        Err(e) => Err(format!("body is not JSON: {e}")),
    }
}

impl ApiClient {
    pub async fn probe_health(&self) -> HealthResult {
        self.probe_candidates(&HEALTH_PATHS).await
    }

    /// Walks `candidates` sequentially. A connection failure ends the probe at
    /// once; 404s, HTML pages and unstructured bodies move on to the next path.
    pub async fn probe_candidates(&self, candidates: &[&str]) -> HealthResult {
        let outcome = try_in_order(candidates, |candidate| self.probe_one(candidate)).await;

        match outcome {
            Ok(accepted) => {
                info!(
                    "Backend healthy at {} ({} candidates skipped)",
                    accepted.candidate, accepted.index
                );
                HealthResult::healthy(accepted.candidate, accepted.value)
            }
            Err(FallbackError::Aborted(reason)) => {
                warn!("Health probe aborted: {reason}");
                HealthResult::unhealthy("Backend server is not running", Some(reason))
            }
            Err(FallbackError::Exhausted { last }) => {
                warn!("No health endpoint qualified (last: {last:?})");
                HealthResult::unhealthy("No working backend health endpoint found", last)
            }
        }
    }

    async fn probe_one(&self, candidate: &str) -> Step<Value, String> {
        let url = self.resolver.url(candidate);
        debug!("GET {url}");

        let response = match self.client.get(&url).timeout(HEALTH_TIMEOUT).send().await {
            Ok(r) => r,
            Err(e) if e.is_connect() => return Step::Abort(e.to_string()),
            Err(e) => return Step::Advance(format!("{url}: {e}")),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => return Step::Advance(format!("{url}: {e}")),
        };

        match classify_response(status, &body) {
            Ok(value) => Step::Accept(value),
            Err(reason) => {
                debug!("Health candidate {url} skipped: {reason}");
                Step::Advance(format!("{url}: {reason}"))
            }
        }
    }
}
