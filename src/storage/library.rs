//! Named scenario snapshots on top of a key-value store

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{KeyValueStore, StorageError};
use crate::inputs::ProjectionInputs;

/// Key prefix of saved scenarios
pub const SCENARIO_PREFIX: &str = "scenario-";

/// Key of the unnamed working copy
pub const AUTOSAVE_KEY: &str = "autosave";

/// A saved input bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub notes: String,
    pub snapshot: ProjectionInputs,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct ScenarioLibrary<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ScenarioLibrary<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn key(id: &str) -> String {
        format!("{}{}", SCENARIO_PREFIX, id)
    }

    /// Millisecond timestamp, bumped until unused
    fn next_id(&self, now: DateTime<Utc>) -> Result<String, StorageError> {
        let mut candidate = now.timestamp_millis();
        while self.store.get(&Self::key(&candidate.to_string()))?.is_some() {
            candidate += 1;
        }
        Ok(candidate.to_string())
    }

    fn write(&mut self, record: &ScenarioRecord) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(record).map_err(StorageError::Serialize)?;
        self.store.set(&Self::key(&record.id), &json)
    }

    /// Save a new named snapshot; the inputs must pass validation
    pub fn save(
        &mut self,
        name: &str,
        notes: &str,
        inputs: &ProjectionInputs,
    ) -> Result<ScenarioRecord, StorageError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StorageError::MissingName);
        }
        inputs.validate()?;

        let now = Utc::now();
        let record = ScenarioRecord {
            id: self.next_id(now)?,
            name: name.to_string(),
            notes: notes.to_string(),
            snapshot: inputs.clone(),
            created_at: now,
            updated_at: now,
        };
        self.write(&record)?;
        debug!("saved scenario `{}` as {}", record.name, record.id);
        Ok(record)
    }

    /// Replace a saved snapshot, keeping its notes unless new ones are given
    pub fn update(
        &mut self,
        id: &str,
        notes: Option<&str>,
        inputs: &ProjectionInputs,
    ) -> Result<ScenarioRecord, StorageError> {
        inputs.validate()?;
        let mut record = self.load(id)?;
        if let Some(notes) = notes {
            record.notes = notes.to_string();
        }
        record.snapshot = inputs.clone();
        record.updated_at = Utc::now();
        self.write(&record)?;
        Ok(record)
    }

    pub fn load(&self, id: &str) -> Result<ScenarioRecord, StorageError> {
        let key = Self::key(id);
        let json = self
            .store
            .get(&key)?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        let record: ScenarioRecord =
            serde_json::from_str(&json).map_err(|source| StorageError::Parse { key, source })?;
        record.snapshot.validate()?;
        Ok(record)
    }

    /// Every readable record, oldest first; corrupt or invalid records are
    /// skipped
    pub fn list(&self) -> Result<Vec<ScenarioRecord>, StorageError> {
        let mut records = Vec::new();
        for key in self.store.keys()? {
            let Some(id) = key.strip_prefix(SCENARIO_PREFIX) else {
                continue;
            };
            match self.load(id) {
                Ok(record) => records.push(record),
                Err(StorageError::Parse { key, source }) => {
                    warn!("skipping corrupt scenario record `{}`: {}", key, source);
                }
                Err(StorageError::InvalidInputs(e)) => {
                    warn!("skipping invalid scenario record `{}`: {}", key, e);
                }
                Err(e) => return Err(e),
            }
        }
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(records)
    }

    pub fn delete(&mut self, id: &str) -> Result<(), StorageError> {
        if self.store.delete(&Self::key(id))? {
            Ok(())
        } else {
            Err(StorageError::NotFound(id.to_string()))
        }
    }

    /// Overwrite the working copy
    pub fn autosave(&mut self, inputs: &ProjectionInputs) -> Result<(), StorageError> {
        inputs.validate()?;
        let json = serde_json::to_string(inputs).map_err(StorageError::Serialize)?;
        self.store.set(AUTOSAVE_KEY, &json)
    }

    pub fn load_autosave(&self) -> Result<Option<ProjectionInputs>, StorageError> {
        let Some(json) = self.store.get(AUTOSAVE_KEY)? else {
            return Ok(None);
        };
        let inputs: ProjectionInputs =
            serde_json::from_str(&json).map_err(|source| StorageError::Parse {
                key: AUTOSAVE_KEY.to_string(),
                source,
            })?;
        inputs.validate()?;
        Ok(Some(inputs))
    }
}
