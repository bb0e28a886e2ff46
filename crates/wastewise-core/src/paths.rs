use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const DATA_DIR: &str = ".wastewise";
pub const CONFIG_FILE: &str = ".wastewise/config.yaml";
pub const DATABASE_FILE: &str = ".wastewise/wastewise.redb";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn data_dir(root: &Path) -> PathBuf {
    root.join(DATA_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn database_path(root: &Path) -> PathBuf {
    root.join(DATABASE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_live_under_data_dir() {
        let root = Path::new("/srv/home");
        assert!(config_path(root).starts_with(data_dir(root)));
        assert!(database_path(root).starts_with(data_dir(root)));
        assert_eq!(
            database_path(root),
            PathBuf::from("/srv/home/.wastewise/wastewise.redb")
        );
    }
}
