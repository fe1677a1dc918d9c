use std::sync::Arc;

use crate::api_client::{ApiClient, ApiError};
use crate::config::Config;
use crate::export::capture::SvgRasterizer;
use crate::export::pdf::A4Composer;
use crate::export::print::BrowserPrint;
use crate::export::Exporter;
use crate::relay_flow::MessagingRelay;

/// Shared application state handed to every command handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub client: ApiClient,
    /// Pluggable relay. Default: the backend's messaging endpoint via `client`.
    pub relay: Arc<dyn MessagingRelay>,
    /// Capture, compose and print collaborators for the export pipeline.
    pub exporter: Exporter,
}

impl AppState {
    /// Wires the production collaborators.
    pub fn from_config(config: Config) -> Result<Self, ApiError> {
        let client = ApiClient::new(&config)?;
        let relay = Arc::new(client.clone());
        let exporter = Exporter::new(
            Arc::new(SvgRasterizer::default()),
            Arc::new(A4Composer::default()),
            Arc::new(BrowserPrint),
        );
        Ok(Self {
            config,
            client,
            relay,
            exporter,
        })
    }
}
