//! Availability checks for vendor utilities.

use tracing::debug;

pub trait Probe {
    fn is_available(&self, utility: &str) -> bool;
}

/// Resolves utilities against `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathProbe;

impl Probe for PathProbe {
    fn is_available(&self, utility: &str) -> bool {
        match which::which(utility) {
            Ok(path) => {
                debug!("{utility} found at {}", path.display());
                true
            }
            Err(_) => {
                debug!("{utility} not found on PATH");
                false
            }
        }
    }
}
