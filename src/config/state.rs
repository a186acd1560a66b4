// Application state module
// Immutable state shared across all request handlers

use crate::catalog::Catalog;

use super::types::Config;

/// Application state
///
/// Both fields are fixed at startup: the configuration is read once and the
/// product catalog is defined as static data with no write path.
pub struct AppState {
    pub config: Config,
    pub catalog: Catalog,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            catalog: Catalog::builtin(),
        }
    }
}
