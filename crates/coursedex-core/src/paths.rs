//! Common filesystem paths used by coursedex.

use std::path::PathBuf;

/// Base directory for coursedex state (config, index snapshot).
///
/// Defaults to `~/.coursedex`, but can be overridden via `COURSEDEX_DIR` for
/// testing or multi-instance setups.
pub fn coursedex_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("COURSEDEX_DIR") {
        return PathBuf::from(dir);
    }

    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".coursedex")
}

/// Path to the coursedex configuration file.
pub fn config_path() -> PathBuf {
    coursedex_dir().join("config.toml")
}

/// Default directory holding catalog JSON files.
pub fn default_catalog_dir() -> PathBuf {
    coursedex_dir().join("catalog")
}

/// Default directory holding the persisted index snapshot.
pub fn default_index_dir() -> PathBuf {
    coursedex_dir().join("index")
}

#[doc(hidden)]
pub fn test_env_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
