//! Durable storage for the last notified signal state
//!
//! The detector only needs a single string between runs, so storage is a
//! get/set pair behind `StateStore`. The file backend is what the binary
//! uses; the in-memory one serves tests and embedding.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info};

use crate::error::{MonitorError, MonitorResult};

pub trait StateStore {
    /// `None` when nothing has been stored yet
    fn load(&self) -> MonitorResult<Option<String>>;

    /// Replace the stored value
    fn save(&self, state: &str) -> MonitorResult<()>;
}

/// Plain-text file rewritten whole on every save
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
    read_only: bool,
}

impl FileStateStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            read_only: false,
        }
    }

    /// Loads the stored state but discards saves (`--dry-run`)
    pub fn read_only<P: AsRef<Path>>(path: P) -> Self {
        Self {
            read_only: true,
            ..Self::new(path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> MonitorResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                debug!("📂 Loaded state from {}", self.path.display());
                Ok(Some(content.trim().to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MonitorError::StateRead(format!("{}: {}", self.path.display(), e))),
        }
    }

    fn save(&self, state: &str) -> MonitorResult<()> {
        if self.read_only {
            info!("📝 [dry-run] {} not written: {}", self.path.display(), state);
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| MonitorError::StateWrite(format!("{}: {}", parent.display(), e)))?;
        }

        fs::write(&self.path, state)
            .map_err(|e| MonitorError::StateWrite(format!("{}: {}", self.path.display(), e)))?;

        debug!("💾 Saved state to {}", self.path.display());
        Ok(())
    }
}

/// Keeps the state in memory and counts writes
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    value: Mutex<Option<String>>,
    writes: Mutex<usize>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(state.into())),
            writes: Mutex::new(0),
        }
    }

    pub fn current(&self) -> Option<String> {
        self.value.lock().ok().and_then(|v| v.clone())
    }

    pub fn writes(&self) -> usize {
        self.writes.lock().map(|w| *w).unwrap_or(0)
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> MonitorResult<Option<String>> {
        self.value
            .lock()
            .map(|v| v.clone())
            .map_err(|e| MonitorError::StateRead(e.to_string()))
    }

    fn save(&self, state: &str) -> MonitorResult<()> {
        let mut value = self
            .value
            .lock()
            .map_err(|e| MonitorError::StateWrite(e.to_string()))?;
        *value = Some(state.to_string());

        let mut writes = self
            .writes
            .lock()
            .map_err(|e| MonitorError::StateWrite(e.to_string()))?;
        *writes += 1;
        Ok(())
    }
}

impl<S: StateStore + ?Sized> StateStore for &S {
    fn load(&self) -> MonitorResult<Option<String>> {
        (**self).load()
    }

    fn save(&self, state: &str) -> MonitorResult<()> {
        (**self).save(state)
    }
}
