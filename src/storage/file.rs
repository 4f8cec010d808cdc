//! Directory-backed store: one `<key>.json` file per key

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;

use super::{KeyValueStore, StorageError};

const EXTENSION: &str = "json";

/// Keys map straight to file names, so only a safe character set is allowed
fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
}

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        debug!("opened file store at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if !is_valid_key(key) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{}.{}", key, EXTENSION)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.path_for(key)?, value)?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<bool, StorageError> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) if is_valid_key(stem) => keys.push(stem.to_string()),
                _ => debug!("ignoring foreign file {}", path.display()),
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_on_disk() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path().join("store")).unwrap();

        store.set("scenario-1", "{}").unwrap();
        store.set("autosave", "[]").unwrap();
        fs::write(store.root().join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.keys().unwrap(), vec!["autosave", "scenario-1"]);
        assert_eq!(store.get("scenario-1").unwrap().as_deref(), Some("{}"));
        assert_eq!(store.get("missing").unwrap(), None);

        // A second handle sees the same files
        let reopened = FileStore::open(store.root()).unwrap();
        assert_eq!(reopened.get("autosave").unwrap().as_deref(), Some("[]"));

        assert!(store.delete("autosave").unwrap());
        assert!(!store.delete("autosave").unwrap());
    }

    #[test]
    fn test_foreign_json_files_are_not_keys() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        store.set("scenario-1", "{}").unwrap();
        fs::write(dir.path().join("scenario-copy (1).json"), "{}").unwrap();

        let keys = store.keys().unwrap();
        assert_eq!(keys, vec!["scenario-1"]);
        for key in &keys {
            assert!(store.get(key).is_ok());
        }
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();

        assert!(matches!(
            store.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(store.get(""), Err(StorageError::InvalidKey(_))));
    }
}
