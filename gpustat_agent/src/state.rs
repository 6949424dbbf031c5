//! Shared agent state. Each request builds its own settings and host handles from this.

use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct AppState {
    // Settings file from --config; None walks the default search order per request
    pub config: Option<Arc<PathBuf>>,
}

impl AppState {
    pub fn new(config: Option<PathBuf>) -> Self {
        Self {
            config: config.map(Arc::new),
        }
    }
}
