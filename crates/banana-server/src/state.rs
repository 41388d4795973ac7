use banana::providers::configs::RelayConfig;
use std::time::Duration;

use crate::configuration::Settings;

/// Shared application state; read-only, each request builds its own relay from it
#[derive(Debug, Clone)]
pub struct AppState {
    pub relay_config: RelayConfig,
    pub timeout: Duration,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            relay_config: settings.relay_config(),
            timeout: settings.relay.timeout(),
        }
    }
}
