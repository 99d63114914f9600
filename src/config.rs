//! Runtime configuration
//!
//! Settings come from environment variables.

use std::path::{Path, PathBuf};

/// Environment variable overriding the database location
pub const DATABASE_PATH_ENV: &str = "BMITRACK_DATABASE_PATH";

/// Default log filter directive when RUST_LOG is unset
pub const DEFAULT_LOG_DIRECTIVE: &str = "bmitrack=info";

/// Resolve the database path from the environment, or default to
/// `<project root>/data/bmitrack.db`.
pub fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));
            default_database_path(&exe_dir)
        })
}

/// Default database path relative to the directory holding the executable.
///
/// Executables under `target/release` or `target/debug` resolve to the project root.
pub fn default_database_path(exe_dir: &Path) -> PathBuf {
    let mut path = exe_dir.to_path_buf();

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(Path::parent) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("bmitrack.db");
    path
}
