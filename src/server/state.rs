//! Server shared state
//!
//! Holds configuration and the planning session behind the HTTP API.

use crate::config::Config;
use crate::error::Result;
use crate::location::ConfiguredSource;
use crate::planner::LiveSession;
use std::path::{Path, PathBuf};

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration
    pub config: Config,

    /// The one planning session served by this process
    pub session: LiveSession,

    /// Directory static assets are served from
    pub static_dir: PathBuf,
}

impl AppState {
    /// Create new application state from configuration
    ///
    /// Location observation is not started here; see [`crate::server::run`].
    pub fn new(config: Config) -> Result<Self> {
        let session = LiveSession::from_config(&config, ConfiguredSource::from_config(&config.location)?)?;
        let static_dir = resolve_static_dir(&config.server.static_dir);

        Ok(Self {
            config,
            session,
            static_dir,
        })
    }
}

/// Find the static directory: as configured relative to the working
/// directory, else next to the executable
fn resolve_static_dir(configured: &str) -> PathBuf {
    let configured = Path::new(configured);
    if configured.is_absolute() || configured.exists() {
        return configured.to_path_buf();
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(configured)))
        .filter(|path| path.exists())
        .unwrap_or_else(|| configured.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_static_dir_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_string_lossy().to_string();
        assert_eq!(resolve_static_dir(&path), dir.path());
    }

    #[test]
    fn test_resolve_static_dir_missing_keeps_configured() {
        assert_eq!(
            resolve_static_dir("no-such-dir-for-tests"),
            PathBuf::from("no-such-dir-for-tests")
        );
    }

    #[tokio::test]
    async fn test_state_from_default_config() {
        let mut config = Config::default();
        config.location.source = "none".to_string();

        let state = AppState::new(config).unwrap();
        let snapshot = state.session.state().await;
        assert_eq!(snapshot.start_label, "Lagos, Nigeria");
        assert_eq!(state.session.limits().max_alternatives, 3);
    }
}
