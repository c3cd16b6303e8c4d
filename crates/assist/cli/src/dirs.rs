//! Platform-specific directory utilities
//!
//! Provides consistent directory paths across different operating systems,
//! following platform conventions for cache and data directories.

use std::path::PathBuf;

const APP: &str = "target-assist";

/// Get the platform-specific log directory
///
/// - macOS: `~/Library/Caches/target-assist/logs`
/// - Linux: `~/.cache/target-assist/logs` (or `$XDG_CACHE_HOME/target-assist/logs`)
/// - Windows: `%LOCALAPPDATA%\target-assist\logs`
/// - Fallback: `/tmp/target-assist/logs`
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", APP)
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp").join(APP))
        .join("logs")
}

/// Get the directory holding saved targeting configs
///
/// `ASSIST_DATA_DIR` wins; otherwise the platform data directory, falling
/// back to `./assist_data`.
pub fn data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("ASSIST_DATA_DIR") {
        return PathBuf::from(dir);
    }

    directories::ProjectDirs::from("", "", APP)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./assist_data"))
}
