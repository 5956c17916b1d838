//! Saving and loading the diagram through a string key-value store.
//!
//! The diagram is stored as JSON under [`APP_STATE_KEY`]:
//!
//! ```text
//! {"rectsById": {"1": {"id": 1, "top": 10.0, "left": 20.0, "width": 100.0, "height": 80.0}}}
//! ```

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::PersistError;
use crate::model::DiagramState;

pub const APP_STATE_KEY: &str = "appState";

/// Minimal string store the diagram is persisted into.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), PersistError>;
}

/// Keeps one `<key>.json` file per key inside a directory.
#[derive(Clone, Debug)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(PersistError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), PersistError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, value)?;
        debug!(path:? = path; "Wrote key");
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

pub fn encode(state: &DiagramState) -> Result<String, PersistError> {
    Ok(serde_json::to_string(state)?)
}

/// Parses a persisted diagram. Entries are re-keyed by their own id, so a
/// map key that disagrees with the record it holds cannot shadow another
/// rectangle.
pub fn decode(text: &str) -> Result<DiagramState, PersistError> {
    let parsed: DiagramState = serde_json::from_str(text)?;
    Ok(parsed.rects_by_id.into_values().collect())
}

pub fn save_diagram(kv: &mut dyn KeyValueStore, state: &DiagramState) -> Result<(), PersistError> {
    let text = encode(state)?;
    kv.set(APP_STATE_KEY, text)?;
    info!(rects = state.len(); "Saved diagram");
    Ok(())
}

/// Loads the saved diagram, falling back to an empty one when nothing is
/// stored or the stored text cannot be read.
pub fn load_diagram(kv: &dyn KeyValueStore) -> DiagramState {
    let text = match kv.get(APP_STATE_KEY) {
        Ok(Some(text)) => text,
        Ok(None) => {
            debug!("No saved diagram, starting empty");
            return DiagramState::default();
        }
        Err(err) => {
            warn!(err:% = err; "Failed to read saved diagram, starting empty");
            return DiagramState::default();
        }
    };
    match decode(&text) {
        Ok(state) => {
            info!(rects = state.len(); "Loaded diagram");
            state
        }
        Err(err) => {
            warn!(err:% = err; "Saved diagram is malformed, starting empty");
            DiagramState::default()
        }
    }
}
