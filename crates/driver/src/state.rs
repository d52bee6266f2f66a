//! Persisted availability status between runs.
use std::{
    fmt,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use eyre::{Context, Result};

/// Service availability as seen by the most recently completed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    /// The service answered with a usable reading.
    Up,
    /// Authentication or the fetch failed.
    Down,
}

impl ServiceStatus {
    /// Literal token written to the status store.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    /// Decode stored content. Only the literal `down` means down; anything
    /// else reads as up, matching how earlier runs may have written it.
    pub fn from_content(content: &str) -> Self {
        if content.trim() == "down" { Self::Down } else { Self::Up }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimal load/store interface for the one persisted status value, so the
/// file store can be swapped for any small persistent key-value store.
pub trait StatusStore: Send + Sync {
    /// Status left behind by the previous run, if any.
    fn load(&self) -> Result<Option<ServiceStatus>>;

    /// Overwrite the persisted status.
    fn store(&self, status: ServiceStatus) -> Result<()>;
}

/// Status store backed by a single small file.
#[derive(Debug, Clone)]
pub struct FileStatusStore {
    path: PathBuf,
}

impl FileStatusStore {
    /// Create a store reading and writing the given path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl StatusStore for FileStatusStore {
    fn load(&self) -> Result<Option<ServiceStatus>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(ServiceStatus::from_content(&content))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).wrap_err_with(|| {
                format!("failed to read status file {}", self.path.display())
            }),
        }
    }

    fn store(&self, status: ServiceStatus) -> Result<()> {
        std::fs::write(&self.path, status.as_str()).wrap_err_with(|| {
            format!("failed to write status file {}", self.path.display())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStatusStore::new(dir.path().join("prevstate.bin"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn roundtrips_both_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStatusStore::new(dir.path().join("prevstate.bin"));

        store.store(ServiceStatus::Down).unwrap();
        assert_eq!(store.load().unwrap(), Some(ServiceStatus::Down));

        store.store(ServiceStatus::Up).unwrap();
        assert_eq!(store.load().unwrap(), Some(ServiceStatus::Up));
    }

    #[test]
    fn unknown_content_reads_as_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prevstate.bin");
        std::fs::write(&path, "garbage").unwrap();
        let store = FileStatusStore::new(&path);
        assert_eq!(store.load().unwrap(), Some(ServiceStatus::Up));
    }

    #[test]
    fn stored_token_is_the_literal_word() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prevstate.bin");
        FileStatusStore::new(&path).store(ServiceStatus::Down).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "down");
    }
}
