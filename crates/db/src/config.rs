//! Datastore configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Engine binary used when none is configured.
pub const DEFAULT_SQLITE_BIN: &str = "sqlite3";

/// How long an engine waits on a locked datastore before giving up.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the datastore lives and which engine binary reaches it.
///
/// The path is passed through to the engine untouched; the engine creates the
/// file on first write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub path: PathBuf,
    pub sqlite_bin: String,
    /// Every request runs its own engine process, so concurrent writers
    /// queue on the file lock for up to this long.
    pub busy_timeout: Duration,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sqlite_bin: DEFAULT_SQLITE_BIN.to_string(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    pub fn with_sqlite_bin(mut self, bin: impl Into<String>) -> Self {
        self.sqlite_bin = bin.into();
        self
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// The datastore path as the engine should receive it.
    ///
    /// A leading `-` would be read as an engine option, so such relative
    /// paths are anchored with `./`.
    pub fn engine_path(&self) -> String {
        let raw = self.path.to_string_lossy();
        if raw.starts_with('-') {
            Path::new(".").join(&self.path).to_string_lossy().into_owned()
        } else {
            raw.into_owned()
        }
    }
}
