use std::time::Duration;

use anyhow::{Context, Result};

/// Base URL used in development builds when `RESUME_API_URL` is not set.
pub const DEV_API_BASE: &str = "http://localhost:8080/api";
/// Base URL used in production builds when `RESUME_API_URL` is not set.
pub const PROD_API_BASE: &str = "/api";
/// Origin that relative bases are resolved against.
pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";

/// Which defaults the endpoint resolver applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    Development,
    Production,
}

impl BuildMode {
    /// Debug builds default to development, release builds to production.
    pub fn from_build() -> Self {
        if cfg!(debug_assertions) {
            BuildMode::Development
        } else {
            BuildMode::Production
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(BuildMode::Development),
            "production" | "prod" => Some(BuildMode::Production),
            _ => None,
        }
    }

    pub fn default_api_base(self) -> &'static str {
        match self {
            BuildMode::Development => DEV_API_BASE,
            BuildMode::Production => PROD_API_BASE,
        }
    }
}

/// Client configuration loaded once at startup and passed by reference to
/// everything that needs it.
/// Nothing here is required: unset values fall back to local defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Explicit backend base URL override (`RESUME_API_URL`).
    pub api_url: Option<String>,
    pub mode: BuildMode,
    /// Origin joined in front of relative bases (`RESUME_API_ORIGIN`).
    pub origin: String,
    pub request_timeout: Duration,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: None,
            mode: BuildMode::from_build(),
            origin: DEFAULT_ORIGIN.to_string(),
            request_timeout: Duration::from_secs(120),
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let mode = match optional_env("RESUME_BUILD_MODE") {
            Some(raw) => BuildMode::parse(&raw).with_context(|| {
                format!("RESUME_BUILD_MODE must be 'development' or 'production', got '{raw}'")
            })?,
            None => BuildMode::from_build(),
        };

        let request_timeout = match optional_env("RESUME_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .context("RESUME_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            None => Duration::from_secs(120),
        };

        Ok(Config {
            api_url: optional_env("RESUME_API_URL"),
            mode,
            origin: optional_env("RESUME_API_ORIGIN").unwrap_or_else(|| DEFAULT_ORIGIN.to_string()),
            request_timeout,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Config pointing straight at `base`.
    #[cfg(test)]
    pub fn with_api_url(base: impl Into<String>, mode: BuildMode) -> Self {
        Config {
            api_url: Some(base.into()),
            mode,
            ..Config::default()
        }
    }
}

/// Reads an env var, treating blank values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_mode_parse_accepts_short_names() {
        assert_eq!(BuildMode::parse("prod"), Some(BuildMode::Production));
        assert_eq!(BuildMode::parse(" Development "), Some(BuildMode::Development));
        assert_eq!(BuildMode::parse("staging"), None);
    }

    #[test]
    fn test_mode_defaults() {
        assert_eq!(BuildMode::Development.default_api_base(), DEV_API_BASE);
        assert_eq!(BuildMode::Production.default_api_base(), "/api");
    }

    #[test]
    fn test_with_api_url_keeps_other_defaults() {
        let config = Config::with_api_url("http://example.test/api", BuildMode::Production);
        assert_eq!(config.api_url.as_deref(), Some("http://example.test/api"));
        assert_eq!(config.origin, DEFAULT_ORIGIN);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
    }
}
