//! Persistence of the last-used inputs between runs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::{info, warn};
use thiserror::Error;

use crate::orifice::Inputs;
use crate::overlay::InputsPatch;

pub const STATE_FILE: &str = "inputs.v1.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not determine a data directory for calcgas")]
    NoDataDir,
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to encode inputs: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct InputStore {
    path: PathBuf,
}

impl InputStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        InputStore { path: path.into() }
    }

    /// Store in the platform data directory.
    pub fn default_location() -> Result<Self, StoreError> {
        ProjectDirs::from("com", "venoil", "calcgas")
            .map(|dirs| Self::new(dirs.data_dir().join(STATE_FILE)))
            .ok_or(StoreError::NoDataDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restores the saved inputs over the defaults.
    ///
    /// A missing file yields the defaults. A file that does not parse is
    /// logged and ignored.
    pub fn load(&self) -> Result<Inputs, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Inputs::default()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match InputsPatch::from_json(&text) {
            Ok(patch) => {
                info!(" [!] Restored inputs from {}", self.path.display());
                Ok(patch.apply(Inputs::default()))
            }
            Err(e) => {
                warn!("Ignoring saved inputs in {}: {}", self.path.display(), e);
                Ok(Inputs::default())
            }
        }
    }

    pub fn save(&self, inputs: &Inputs) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let text = serde_json::to_string_pretty(inputs)?;
        fs::write(&self.path, text).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
