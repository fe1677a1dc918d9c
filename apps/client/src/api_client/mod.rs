//! API Client — the single point of entry for every call to the resume backend.
//!
//! No other module builds request URLs or talks HTTP. Handlers go through
//! `ApiClient` and get either a typed result or an `ApiError` they can turn
//! into a user-facing message.

use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::ResumeEnvelope;

pub mod endpoint;
pub mod fallback;
pub mod health;

use endpoint::EndpointResolver;
use fallback::{try_in_order, FallbackError, Step};

pub const GENERATE_PATH: &str = "/v1/resume/generate";
pub const GENERATE_TAILORED_PATH: &str = "/v1/resume/generate-tailored";
/// Primary spelling first, then the camel-case alias older backends expose.
pub const RELAY_PATHS: [&str; 2] = ["/v1/resume/send-whatsapp", "/v1/resume/sendWhatsApp"];

const RELAY_UNREACHABLE: &str =
    "Could not reach the messaging service. Please check your connection and try again.";
const RELAY_FAILED: &str =
    "Failed to send resume to WhatsApp. Please check your phone number or try again later.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Cannot connect to the server: {0}")]
    Connection(#[source] reqwest::Error),

    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("HTTP error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Server error (status {status}): {message}")]
    Server { status: u16, message: String },

    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("Endpoint returned an HTML page instead of JSON")]
    UnexpectedHtml,

    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            ApiError::Connection(e)
        } else if e.is_timeout() {
            ApiError::Timeout(e)
        } else {
            ApiError::Transport(e)
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    user_description: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateTailoredRequest<'a> {
    user_description: &'a str,
    job_description: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RelayRequest<'a> {
    phone_number: &'a str,
    resume_data: &'a str,
}

/// Envelope returned by the messaging relay. Server-side error envelopes are
/// handed to the caller exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_demo_mode: Option<bool>,
}

impl RelayResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            is_demo_mode: None,
        }
    }
}

/// Thin wrapper over the resume backend. Holds no response cache.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    resolver: EndpointResolver,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(ApiError::Build)?;

        let resolver = EndpointResolver::new(config);
        info!("API client targeting {}", resolver.url(""));

        Ok(Self { client, resolver })
    }

    pub fn resolver(&self) -> &EndpointResolver {
        &self.resolver
    }

    /// POST /v1/resume/generate — one attempt, no retry.
    pub async fn generate_resume(&self, description: &str) -> Result<ResumeEnvelope, ApiError> {
        let body = GenerateRequest {
            user_description: description,
        };
        self.post_json(GENERATE_PATH, &body)
            .await
            .map(ResumeEnvelope::new)
    }

    /// POST /v1/resume/generate-tailored — one attempt, no retry.
    pub async fn generate_tailored_resume(
        &self,
        profile: &str,
        job: &str,
    ) -> Result<ResumeEnvelope, ApiError> {
        let body = GenerateTailoredRequest {
            user_description: profile,
            job_description: job,
        };
        self.post_json(GENERATE_TAILORED_PATH, &body)
            .await
            .map(ResumeEnvelope::new)
    }

    /// Sends resume text to a phone number through the backend's messaging relay.
    ///
    /// The alternate path spelling is only tried when the primary path is
    /// missing (404 or an HTML page). Any JSON envelope the server returns,
    /// success or not, is passed through; transport failures become a
    /// synthesized `{success: false}` envelope. Never errors.
    pub async fn send_to_messaging_relay(&self, phone_number: &str, text: &str) -> RelayResponse {
        let body = RelayRequest {
            phone_number,
            resume_data: text,
        };

        match try_in_order(&RELAY_PATHS, |path| self.relay_attempt(path, &body)).await {
            Ok(accepted) => {
                if accepted.index > 0 {
                    info!("Messaging relay answered on alternate path {}", accepted.candidate);
                } else {
                    debug!("Messaging relay answered on {}", accepted.candidate);
                }
                accepted.value
            }
            Err(FallbackError::Aborted(response)) => response,
            Err(FallbackError::Exhausted { last }) => {
                last.unwrap_or_else(|| RelayResponse::failure(RELAY_FAILED))
            }
        }
    }

    async fn relay_attempt(
        &self,
        path: &str,
        body: &RelayRequest<'_>,
    ) -> Step<RelayResponse, RelayResponse> {
        let url = self.resolver.url(path);
        debug!("POST {url}");

        let response = match self.client.post(&url).json(body).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Messaging relay request to {url} failed: {e}");
                return Step::Abort(RelayResponse::failure(RELAY_UNREACHABLE));
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(t) => t,
            Err(e) => {
                warn!("Messaging relay body from {url} unreadable: {e}");
                return Step::Abort(RelayResponse::failure(RELAY_UNREACHABLE));
            }
        };

        if status == StatusCode::NOT_FOUND || looks_like_html(&text) {
            warn!("Messaging relay not found at {url} (status {status})");
            return Step::Advance(RelayResponse::failure(RELAY_FAILED));
        }

        match serde_json::from_str::<RelayResponse>(&text) {
            Ok(envelope) => Step::Accept(envelope),
            Err(e) => {
                warn!("Messaging relay at {url} returned status {status} with unreadable body: {e}");
                Step::Abort(RelayResponse::failure(RELAY_FAILED))
            }
        }
    }

    async fn post_json<B: Serialize>(&self, logical_path: &str, body: &B) -> Result<Value, ApiError> {
        let url = self.resolver.url(logical_path);
        debug!("POST {url}");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_server_error() {
            warn!("Backend returned {status} for {url}");
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        if looks_like_html(&text) {
            return Err(ApiError::UnexpectedHtml);
        }

        Ok(serde_json::from_str(&text)?)
    }
}

/// True when a body is an HTML page (a dev server or proxy answering instead of the API).
pub fn looks_like_html(body: &str) -> bool {
    let head: String = body.trim_start().chars().take(16).collect();
    let head = head.to_ascii_lowercase();
    head.starts_with("<!doctype") || head.starts_with("<html")
}

/// Pulls `message` (or `error.message`) out of a JSON error body. Empty when absent.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return String::new();
    };
    value
        .get("message")
        .or_else(|| value.get("error").and_then(|e| e.get("message")))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
