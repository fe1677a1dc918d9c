use thiserror::Error;

use crate::api_client::ApiError;
use crate::export::ExportError;
use crate::input::InputError;
use crate::relay_flow::RelayFlowError;

const GENERATION_FAILED: &str = "Failed to generate resume. Please try again.";
const SERVER_ERROR: &str =
    "Server error occurred. Please ensure the backend is available and try again.";
const CANNOT_CONNECT: &str =
    "Cannot connect to the server. Please check if the backend is running.";

/// Application-level error type.
/// Every variant maps to a notification via `user_message`; none are fatal.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Backend unhealthy: {0}")]
    Unhealthy(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Messaging error: {0}")]
    Relay(#[from] RelayFlowError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code, used with `--json`.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Input(_) => "VALIDATION_ERROR",
            AppError::Api(ApiError::Connection(_)) => "CONNECTION_ERROR",
            AppError::Api(ApiError::Server { .. }) => "SERVER_ERROR",
            AppError::Api(ApiError::UnexpectedHtml | ApiError::Decode(_)) => "MALFORMED_RESPONSE",
            AppError::Api(_) => "API_ERROR",
            AppError::Unhealthy(_) => "BACKEND_UNHEALTHY",
            AppError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            AppError::Export(_) => "EXPORT_ERROR",
            AppError::Relay(RelayFlowError::InvalidPhone) => "VALIDATION_ERROR",
            AppError::Relay(_) => "RELAY_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The notification shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Input(e) => e.to_string(),
            AppError::Api(e) => api_message(e),
            AppError::Unhealthy(msg) => format!("Backend error: {msg}"),
            AppError::MalformedResponse(msg) => {
                format!("The server returned a resume it could not read: {msg}")
            }
            AppError::Export(ExportError::Print(_)) => {
                "Could not open the print dialog. Please try again.".to_string()
            }
            AppError::Export(_) => "Error generating PDF. Please try again.".to_string(),
            AppError::Relay(e) => e.to_string(),
            AppError::Internal(_) => "An unexpected error occurred. Please try again.".to_string(),
        }
    }
}

fn api_message(e: &ApiError) -> String {
    match e {
        ApiError::Connection(_) => CANNOT_CONNECT.to_string(),
        ApiError::Server { .. } => SERVER_ERROR.to_string(),
        ApiError::Timeout(_) => "The request timed out. Please try again.".to_string(),
        ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
        _ => GENERATION_FAILED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_is_generic() {
        let err = AppError::from(ApiError::Server {
            status: 500,
            message: "stack trace".into(),
        });
        assert_eq!(err.user_message(), SERVER_ERROR);
        assert_eq!(err.code(), "SERVER_ERROR");
    }

    #[test]
    fn test_client_error_surfaces_server_message() {
        let err = AppError::from(ApiError::Status {
            status: 400,
            message: "User description is required".into(),
        });
        assert_eq!(err.user_message(), "User description is required");
    }

    #[test]
    fn test_client_error_without_message_is_generic() {
        let err = AppError::from(ApiError::Status {
            status: 422,
            message: String::new(),
        });
        assert_eq!(err.user_message(), GENERATION_FAILED);
    }

    #[test]
    fn test_html_response_is_malformed() {
        let err = AppError::from(ApiError::UnexpectedHtml);
        assert_eq!(err.code(), "MALFORMED_RESPONSE");
        assert_eq!(err.user_message(), GENERATION_FAILED);
    }

    #[test]
    fn test_unhealthy_prefix() {
        let err = AppError::Unhealthy("Backend server is not running".into());
        assert_eq!(err.user_message(), "Backend error: Backend server is not running");
    }

    #[test]
    fn test_invalid_phone_is_validation() {
        let err = AppError::from(RelayFlowError::InvalidPhone);
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(err.user_message().starts_with("Please enter a valid phone number"));
    }

    #[test]
    fn test_input_errors_pass_through() {
        let err = AppError::from(InputError::Missing("the job description"));
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.user_message(), "Please provide the job description");
    }
}
