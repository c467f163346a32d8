//! Shared application state for the HTTP server

use crate::chain::client::LedgerClient;
use crate::config::Config;
use crate::selection::HolderPicker;
use std::sync::Arc;

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub picker: HolderPicker,
    #[cfg(feature = "metrics")]
    pub metrics: crate::metrics::Metrics,
}

impl AppState {
    pub fn new(config: Arc<Config>, client: Arc<dyn LedgerClient>) -> anyhow::Result<Self> {
        Ok(Self {
            config,
            picker: HolderPicker::new(client),
            #[cfg(feature = "metrics")]
            metrics: crate::metrics::Metrics::new()?,
        })
    }

    pub fn client(&self) -> &dyn LedgerClient {
        self.picker.client().as_ref()
    }
}
