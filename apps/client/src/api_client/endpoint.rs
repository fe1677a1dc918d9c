//! Computes the literal request path from configuration.

use reqwest::Url;
use tracing::warn;

use crate::config::{BuildMode, Config, DEFAULT_ORIGIN, DEV_API_BASE};

const API_PREFIX: &str = "/api";

/// Where a single request goes: `base` + `path`.
/// `base` is empty when the `/api` prefix has been folded into `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub base: String,
    pub path: String,
}

#[derive(Debug, Clone)]
pub struct EndpointResolver {
    base: String,
    mode: BuildMode,
    origin: String,
}

impl EndpointResolver {
    pub fn new(config: &Config) -> Self {
        let configured = config
            .api_url
            .as_deref()
            .unwrap_or_else(|| config.mode.default_api_base());

        let base = if is_usable_base(configured) {
            configured.trim_end_matches('/').to_string()
        } else {
            warn!("Unusable API base '{configured}', falling back to {DEV_API_BASE}");
            DEV_API_BASE.to_string()
        };

        let origin = if Url::parse(&config.origin).is_ok() {
            config.origin.trim_end_matches('/').to_string()
        } else {
            warn!(
                "Unusable API origin '{}', falling back to {DEFAULT_ORIGIN}",
                config.origin
            );
            DEFAULT_ORIGIN.to_string()
        };

        Self {
            base,
            mode: config.mode,
            origin,
        }
    }

    /// Resolves a logical path such as `/v1/resume/health`.
    ///
    /// In production a base of exactly `/api` is folded into the path so the
    /// prefix is never sent twice. Development passes paths through unchanged.
    pub fn resolve(&self, logical_path: &str) -> ResolvedEndpoint {
        let logical_path = normalize_path(logical_path);

        if self.mode == BuildMode::Production && self.base == API_PREFIX {
            let path = if has_api_prefix(&logical_path) {
                logical_path
            } else {
                format!("{API_PREFIX}{logical_path}")
            };
            return ResolvedEndpoint {
                base: String::new(),
                path,
            };
        }

        ResolvedEndpoint {
            base: self.base.clone(),
            path: logical_path,
        }
    }

    /// Absolute URL for a logical path. Relative or empty bases are
    /// joined onto the configured origin.
    pub fn url(&self, logical_path: &str) -> String {
        let ResolvedEndpoint { base, path } = self.resolve(logical_path);
        if base.starts_with("http://") || base.starts_with("https://") {
            format!("{base}{path}")
        } else {
            format!("{}{base}{path}", self.origin)
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn has_api_prefix(path: &str) -> bool {
    path == API_PREFIX || path.starts_with("/api/")
}

/// Relative bases (`/api`, `/backend`) and parseable http(s) URLs are usable.
fn is_usable_base(base: &str) -> bool {
    let base = base.trim();
    if base.starts_with('/') {
        return !base.starts_with("//");
    }
    matches!(Url::parse(base), Ok(url) if matches!(url.scheme(), "http" | "https"))
}
