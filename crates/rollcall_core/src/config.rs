//! Runtime configuration resolved from the process environment.
//!
//! # Responsibility
//! - Locate the snapshot database and logging settings for host processes.
//!
//! # Invariants
//! - Blank environment values fall back to defaults.
//! - Resolution never fails; validation of the log level/dir happens in
//!   `init_logging`.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "ROLLCALL_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "ROLLCALL_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "ROLLCALL_LOG_DIR";
pub const DEFAULT_DB_FILE_NAME: &str = "rollcall.sqlite3";

/// Settings shared by the FFI and CLI hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// `None` disables file logging.
    pub log_dir: Option<String>,
}

impl RuntimeConfig {
    /// Reads `ROLLCALL_*` variables from the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: non_blank(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: non_blank(LOG_LEVEL_ENV)
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: non_blank(LOG_DIR_ENV),
        }
    }
}
