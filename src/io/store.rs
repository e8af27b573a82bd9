use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::io::recovery::atomic_write;

/// Collection key for projects
pub const PROJECTS_KEY: &str = "projects";
/// Collection key for debt items
pub const DEBTS_KEY: &str = "debts";

/// Error type for collection store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {key}: {source}")]
    Read {
        key: String,
        source: std::io::Error,
    },
    #[error("could not write {key}: {source}")]
    Write {
        key: String,
        source: std::io::Error,
    },
    #[error("could not serialize {key}: {source}")]
    Serialize {
        key: String,
        source: serde_json::Error,
    },
}

/// Durable key-value storage for serialized collections.
///
/// Implementations deal in raw payloads; typed access goes through
/// [`load`] and [`save`]. A `write` replaces the whole payload for a key and
/// must never leave a partially written payload observable.
pub trait CollectionStore {
    /// The stored payload for `key`, or `None` if it was never written.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the payload for `key`.
    fn write(&self, key: &str, payload: &str) -> Result<(), StoreError>;

    /// Set aside an unparseable payload so the next write doesn't destroy it.
    /// Returns a description of where it went, if anywhere.
    fn quarantine(&self, _key: &str) -> Option<String> {
        None
    }

    /// Directory for the recovery log, if this store lives on disk.
    fn recovery_dir(&self) -> Option<&Path> {
        None
    }
}

/// Load a collection, failing closed.
///
/// A missing, unreadable, or unparseable payload yields an empty collection.
/// The second value describes what went wrong, for the caller to surface.
pub fn load<T: DeserializeOwned>(
    store: &impl CollectionStore,
    key: &str,
) -> (Vec<T>, Option<String>) {
    let payload = match store.read(key) {
        Ok(Some(p)) => p,
        Ok(None) => return (Vec::new(), None),
        Err(e) => return (Vec::new(), Some(e.to_string())),
    };
    match serde_json::from_str(&payload) {
        Ok(items) => (items, None),
        Err(e) => {
            let kept = match store.quarantine(key) {
                Some(place) => format!(" (backed up as {})", place),
                None => String::new(),
            };
            (
                Vec::new(),
                Some(format!("could not parse {}{}: {}", key, kept, e)),
            )
        }
    }
}

/// Serialize a collection to its stored payload form
pub fn to_payload<T: Serialize>(key: &str, items: &[T]) -> Result<String, StoreError> {
    serde_json::to_string_pretty(items).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })
}

/// Serialize and write a whole collection.
pub fn save<T: Serialize>(
    store: &impl CollectionStore,
    key: &str,
    items: &[T],
) -> Result<(), StoreError> {
    let payload = to_payload(key, items)?;
    store.write(key, &payload)
}

impl<S: CollectionStore + ?Sized> CollectionStore for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, payload: &str) -> Result<(), StoreError> {
        (**self).write(key, payload)
    }

    fn quarantine(&self, key: &str) -> Option<String> {
        (**self).quarantine(key)
    }

    fn recovery_dir(&self) -> Option<&Path> {
        (**self).recovery_dir()
    }
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// One `<key>.json` file per collection inside the data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl CollectionStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| StoreError::Read {
                key: key.to_string(),
                source,
            })
    }

    fn write(&self, key: &str, payload: &str) -> Result<(), StoreError> {
        let to_err = |source| StoreError::Write {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(to_err)?;
        atomic_write(&self.path_for(key), payload.as_bytes()).map_err(to_err)
    }

    fn quarantine(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        let bak = path.with_extension("json.bak");
        fs::copy(&path, &bak).ok()?;
        Some(bak.display().to_string())
    }

    fn recovery_dir(&self) -> Option<&Path> {
        Some(&self.dir)
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Process-local store. Writes can be switched to fail, to exercise the
/// unsaved-change path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    payloads: RefCell<HashMap<String, String>>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw payload
    pub fn with_payload(self, key: &str, payload: &str) -> Self {
        self.payloads
            .borrow_mut()
            .insert(key.to_string(), payload.to_string());
        self
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Current raw payload for `key`
    pub fn payload(&self, key: &str) -> Option<String> {
        self.payloads.borrow().get(key).cloned()
    }
}

impl CollectionStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.payload(key))
    }

    fn write(&self, key: &str, payload: &str) -> Result<(), StoreError> {
        if self.fail_writes.get() {
            return Err(StoreError::Write {
                key: key.to_string(),
                source: std::io::Error::other("store unavailable"),
            });
        }
        self.payloads
            .borrow_mut()
            .insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Project;
    use tempfile::TempDir;

    fn sample_projects() -> Vec<Project> {
        vec![
            Project {
                id: "web".into(),
                name: "Main Website".into(),
                description: Some("Marketing site".into()),
                created_at: None,
            },
            Project {
                id: "app".into(),
                name: "Mobile App".into(),
                description: None,
                created_at: None,
            },
        ]
    }

    #[test]
    fn never_written_loads_empty() {
        let store = MemoryStore::new();
        let (items, warning) = load::<Project>(&store, PROJECTS_KEY);
        assert!(items.is_empty());
        assert!(warning.is_none());
    }

    #[test]
    fn save_then_load_preserves_order() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());
        save(&store, PROJECTS_KEY, &sample_projects()).unwrap();

        assert!(tmp.path().join("projects.json").exists());
        let (items, warning) = load::<Project>(&store, PROJECTS_KEY);
        assert!(warning.is_none());
        assert_eq!(items, sample_projects());
    }

    #[test]
    fn corrupt_payload_fails_closed_and_is_backed_up() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());
        fs::write(store.path_for(DEBTS_KEY), "not json {{{").unwrap();

        let (items, warning) = load::<Project>(&store, DEBTS_KEY);
        assert!(items.is_empty());
        let warning = warning.unwrap();
        assert!(warning.contains("could not parse debts"));
        assert!(warning.contains("debts.json.bak"));
        assert_eq!(
            fs::read_to_string(tmp.path().join("debts.json.bak")).unwrap(),
            "not json {{{"
        );
    }

    #[test]
    fn memory_store_corrupt_payload_fails_closed() {
        let store = MemoryStore::new().with_payload(PROJECTS_KEY, "{\"not\":\"a list\"}");
        let (items, warning) = load::<Project>(&store, PROJECTS_KEY);
        assert!(items.is_empty());
        assert!(warning.is_some());
    }

    #[test]
    fn failed_write_leaves_previous_payload() {
        let store = MemoryStore::new();
        save(&store, PROJECTS_KEY, &sample_projects()).unwrap();
        let before = store.payload(PROJECTS_KEY);

        store.set_fail_writes(true);
        let err = save(&store, PROJECTS_KEY, &sample_projects()[..1]).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert_eq!(store.payload(PROJECTS_KEY), before);
    }

    #[test]
    fn file_store_writes_into_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("nested"));
        save(&store, DEBTS_KEY, &Vec::<Project>::new()).unwrap();
        assert_eq!(
            fs::read_to_string(store.path_for(DEBTS_KEY)).unwrap(),
            "[]"
        );
    }
}
