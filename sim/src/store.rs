//! Persistence for team decoration, keyed by region and seed.

use crate::Team;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::{fs, io};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Team store I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Team store data is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub trait TeamStore: Send {
    fn load_all(&self) -> Result<Vec<Team>, StoreError>;
    fn save_all(&mut self, teams: &[Team]) -> Result<(), StoreError>;
}

/// Store handle shared between request handlers.
pub type SharedStore = Arc<Mutex<Box<dyn TeamStore>>>;

pub fn shared(store: impl TeamStore + 'static) -> SharedStore {
    Arc::new(Mutex::new(Box::new(store)))
}

/// Keeps the last saved snapshot in memory for as long as the process lives.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    teams: Vec<Team>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TeamStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<Team>, StoreError> {
        Ok(self.teams.clone())
    }

    fn save_all(&mut self, teams: &[Team]) -> Result<(), StoreError> {
        self.teams = teams.to_vec();
        Ok(())
    }
}

/// JSON array of decorated teams on disk. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io { path: self.path.clone(), source }
    }
}

impl TeamStore for JsonFileStore {
    fn load_all(&self) -> Result<Vec<Team>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Only teams with a name or image are written.
    fn save_all(&mut self, teams: &[Team]) -> Result<(), StoreError> {
        let decorated: Vec<&Team> = teams.iter().filter(|t| t.is_decorated()).collect();
        let json = serde_json::to_string_pretty(&decorated)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}
