//! Persistence behind a string key-value store
//!
//! The projection never touches storage. Callers load inputs before a run
//! and save them afterwards through [`ScenarioLibrary`].

mod file;
mod library;
mod memory;

pub use file::FileStore;
pub use library::{ScenarioLibrary, ScenarioRecord, AUTOSAVE_KEY, SCENARIO_PREFIX};
pub use memory::MemoryStore;

use thiserror::Error;

use crate::inputs::InputError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt record `{key}`: {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize record: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("scenario name must not be empty")]
    MissingName,

    #[error("no saved scenario with id `{0}`")]
    NotFound(String),

    #[error("invalid storage key `{0}`")]
    InvalidKey(String),

    #[error("invalid scenario inputs: {0}")]
    InvalidInputs(#[from] InputError),
}

/// String key-value persistence
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key, returning whether it existed
    fn delete(&mut self, key: &str) -> Result<bool, StorageError>;

    /// All keys, sorted
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}
