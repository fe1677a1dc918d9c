use std::time::{Duration, Instant};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{info, warn};

use crate::api_client::{ApiClient, RelayResponse};
use crate::export::whatsapp::compose_for_messaging_relay;
use crate::models::CanonicalResume;

// ────────────────────────────────────────────────────────────────────────────
// Relay seam
// ────────────────────────────────────────────────────────────────────────────

/// "Deliver this text to this phone number." Never errors: transport problems
/// come back as a `{success: false}` response.
#[async_trait]
pub trait MessagingRelay: Send + Sync {
    async fn send(&self, phone_number: &str, text: &str) -> RelayResponse;
}

#[async_trait]
impl MessagingRelay for ApiClient {
    async fn send(&self, phone_number: &str, text: &str) -> RelayResponse {
        self.send_to_messaging_relay(phone_number, text).await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[0-9]{8,}$").unwrap());

/// A leading `+` followed by at least 8 ASCII digits, nothing else.
pub fn is_valid_phone_number(phone_number: &str) -> bool {
    PHONE_RE.is_match(phone_number)
}

// ────────────────────────────────────────────────────────────────────────────
// State machine
// ────────────────────────────────────────────────────────────────────────────

/// How long a success stays visible before the flow resets itself.
pub const SUCCESS_RESET: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayState {
    Idle,
    Validating,
    Sending,
    Success { since: Instant },
    Failed { message: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelayFlowError {
    #[error("Please enter a valid phone number with country code (e.g., +14155552671)")]
    InvalidPhone,

    #[error("A message is already being sent")]
    Busy,

    #[error("Resume was just sent. Please wait a moment before sending again")]
    JustSent,

    #[error("The last send failed. Retry before sending again")]
    RetryRequired,

    #[error("{0}")]
    Rejected(String),
}

/// Drives one send at a time: `Idle → Validating → Sending → Success | Failed`.
#[derive(Debug)]
pub struct RelayFlow {
    state: RelayState,
}

impl Default for RelayFlow {
    fn default() -> Self {
        Self {
            state: RelayState::Idle,
        }
    }
}

impl RelayFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RelayState {
        &self.state
    }

    /// Validates `phone_number`, composes `resume` and sends it through `relay`.
    ///
    /// Only starts from `Idle`: a failure must be cleared with `retry` and a
    /// success must have reset. An invalid number returns to `Idle` without
    /// touching the relay.
    pub async fn submit(
        &mut self,
        relay: &dyn MessagingRelay,
        phone_number: &str,
        resume: &CanonicalResume,
    ) -> Result<RelayResponse, RelayFlowError> {
        self.tick(Instant::now());
        match self.state {
            RelayState::Idle => {}
            RelayState::Validating | RelayState::Sending => return Err(RelayFlowError::Busy),
            RelayState::Success { .. } => return Err(RelayFlowError::JustSent),
            RelayState::Failed { .. } => return Err(RelayFlowError::RetryRequired),
        }

        self.state = RelayState::Validating;
        let phone_number = phone_number.trim();
        if !is_valid_phone_number(phone_number) {
            self.state = RelayState::Idle;
            return Err(RelayFlowError::InvalidPhone);
        }

        self.state = RelayState::Sending;
        let text = compose_for_messaging_relay(resume);
        let response = relay.send(phone_number, &text).await;

        if response.success {
            info!(
                "Resume sent to {phone_number}{}",
                if response.is_demo_mode == Some(true) { " (demo mode)" } else { "" }
            );
            self.state = RelayState::Success {
                since: Instant::now(),
            };
            Ok(response)
        } else {
            warn!("Messaging relay rejected send: {}", response.message);
            self.state = RelayState::Failed {
                message: response.message.clone(),
            };
            Err(RelayFlowError::Rejected(response.message))
        }
    }

    /// Reverts a success to `Idle` once `SUCCESS_RESET` has passed.
    pub fn tick(&mut self, now: Instant) {
        if let RelayState::Success { since } = self.state {
            if now.saturating_duration_since(since) >= SUCCESS_RESET {
                self.state = RelayState::Idle;
            }
        }
    }

    /// Clears a failure so the user can try again. Only sessions that keep
    /// one flow across several sends call this.
    #[allow(dead_code)]
    pub fn retry(&mut self) {
        if matches!(self.state, RelayState::Failed { .. }) {
            self.state = RelayState::Idle;
        }
    }
}
