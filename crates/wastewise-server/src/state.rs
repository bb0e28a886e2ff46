use std::path::{Path, PathBuf};
use std::sync::Arc;

use wastewise_core::config::Config;
use wastewise_core::store::Store;

use crate::coach::CoachBackend;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub config: Arc<Config>,
    pub store: Arc<Store>,
    pub coach: Arc<CoachBackend>,
}

impl AppState {
    pub fn new(root: PathBuf, config: Config, store: Store, coach: CoachBackend) -> Self {
        Self {
            root,
            config: Arc::new(config),
            store: Arc::new(store),
            coach: Arc::new(coach),
        }
    }

    /// Load config and open the database of an initialized project.
    pub fn open(root: &Path) -> wastewise_core::Result<Self> {
        let config = Config::load(root)?;
        let store = Store::open_root(root)?;
        let coach = CoachBackend::from_config(&config.coach);
        tracing::debug!(backend = coach.name(), "coach backend ready");
        Ok(Self::new(root.to_path_buf(), config, store, coach))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wastewise_core::WasteError;

    #[test]
    fn open_requires_init() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            AppState::open(dir.path()),
            Err(WasteError::NotInitialized)
        ));
    }

    #[test]
    fn open_after_config_saved() {
        let dir = TempDir::new().unwrap();
        Config::default().save(dir.path()).unwrap();
        let state = AppState::open(dir.path()).unwrap();
        assert_eq!(state.root, dir.path());
        assert_eq!(state.coach.name(), "canned");
        assert_eq!(state.config.server.port, 3141);
    }
}
