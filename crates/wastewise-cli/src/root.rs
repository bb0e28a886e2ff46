use std::path::{Path, PathBuf};

use wastewise_core::paths::DATA_DIR;

/// Resolve the WasteWise root directory.
///
/// Priority:
/// 1. `--root` flag / `WASTEWISE_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.wastewise/`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_data_root(&cwd).unwrap_or(cwd)
}

fn find_data_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(DATA_DIR).is_dir())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn finds_data_dir_from_subdirectory() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(DATA_DIR)).unwrap();
        let subdir = dir.path().join("kitchen/logs");
        std::fs::create_dir_all(&subdir).unwrap();
        assert_eq!(find_data_root(&subdir), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn no_data_dir_means_none() {
        let dir = TempDir::new().unwrap();
        let subdir = dir.path().join("empty");
        std::fs::create_dir_all(&subdir).unwrap();
        assert!(find_data_root(&subdir)
            .map(|p| !p.starts_with(dir.path()))
            .unwrap_or(true));
    }
}
