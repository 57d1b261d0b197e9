//! JSON file storage backend.
//!
//! One state document plus a small preferences file under a base directory
//! the backend creates on construction. Single user, last-write-wins; no
//! locking or atomic rename is attempted.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::AppState;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::storage::traits::StateStorage;

const STATE_FILE: &str = "state.json";
const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Preferences {
    dark_mode: Option<bool>,
}

/// File-backed storage rooted at a base directory
pub struct JsonFileStorage {
    base_directory: PathBuf,
}

impl JsonFileStorage {
    /// Create a storage backend, creating the base directory if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_directory = base_directory.as_ref().to_path_buf();
        if !base_directory.exists() {
            fs::create_dir_all(&base_directory).with_context(|| {
                format!("creating data directory {}", base_directory.display())
            })?;
            info!("created data directory {}", base_directory.display());
        }
        Ok(Self { base_directory })
    }

    fn state_path(&self) -> PathBuf {
        self.base_directory.join(STATE_FILE)
    }

    fn preferences_path(&self) -> PathBuf {
        self.base_directory.join(PREFERENCES_FILE)
    }

    fn load_preferences(&self) -> Result<Preferences> {
        let path = self.preferences_path();
        if !path.exists() {
            return Ok(Preferences::default());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("parsing {}", path.display()))
    }
}

impl StateStorage for JsonFileStorage {
    fn load_state(&self) -> Result<Option<Value>> {
        let path = self.state_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let raw = serde_json::from_str(&contents)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(raw))
    }

    fn save_state(&self, state: &AppState) -> Result<()> {
        let contents = serde_json::to_string(state).context("serializing state")?;
        let path = self.state_path();
        fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))
    }

    fn load_dark_mode(&self) -> Result<Option<bool>> {
        Ok(self.load_preferences()?.dark_mode)
    }

    fn save_dark_mode(&self, enabled: bool) -> Result<()> {
        let preferences = Preferences { dark_mode: Some(enabled) };
        let contents =
            serde_json::to_string(&preferences).context("serializing preferences")?;
        let path = self.preferences_path();
        fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))
    }
}
