//! Per-user collection persistence.
//!
//! The store is an async map from username to the full ordered sequence of
//! collected entries. There is no partial-update API: callers read, modify
//! and write the whole sequence. Backed by an embedded redb database, with an
//! in-memory fallback when the database cannot be opened so the session keeps
//! working without persistence.

use crate::shared::error::{AppError, AppResult};
use crate::shared::types::CollectedEntry;
use async_trait::async_trait;
use directories::ProjectDirs;
use redb::{Database, TableDefinition};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Key: username, value: JSON-serialized sequence of entries.
const COLLECTIONS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("collections");

/// Async boundary to the per-user collection store.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// The user's entries, oldest first. Unknown users get an empty sequence.
    async fn get(&self, username: &str) -> AppResult<Vec<CollectedEntry>>;
    /// Replace the user's whole entry sequence.
    async fn set(&self, username: &str, entries: &[CollectedEntry]) -> AppResult<()>;
}

/// redb-backed store.
pub struct RedbCollectionStore {
    db: Arc<Mutex<Database>>,
}

impl RedbCollectionStore {
    /// Open (or create) the database at the default data directory.
    pub fn open_default() -> AppResult<Self> {
        let proj_dirs = ProjectDirs::from("com", "wordvault", "wordvault")
            .ok_or_else(|| AppError::Io("Failed to get project directories".to_string()))?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .map_err(|e| AppError::Io(format!("Failed to create data directory: {}", e)))?;

        Self::open(&data_dir.join("collections.redb"))
    }

    /// Open (or create) the database at an explicit path.
    pub fn open(path: &Path) -> AppResult<Self> {
        let db = Database::create(path)
            .map_err(|e| AppError::Store(format!("Failed to open database: {}", e)))?;

        // Make sure the table exists so reads never fail on a fresh file.
        {
            let write_txn = db
                .begin_write()
                .map_err(|e| AppError::Store(format!("Failed to begin write: {}", e)))?;
            {
                let _table = write_txn
                    .open_table(COLLECTIONS_TABLE)
                    .map_err(|e| AppError::Store(format!("Failed to open table: {}", e)))?;
            }
            write_txn
                .commit()
                .map_err(|e| AppError::Store(format!("Failed to commit: {}", e)))?;
        }

        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    fn read_entries(&self, username: &str) -> AppResult<Vec<CollectedEntry>> {
        let db = self
            .db
            .lock()
            .map_err(|e| AppError::Store(format!("Mutex poisoned: {}", e)))?;

        let read_txn = db
            .begin_read()
            .map_err(|e| AppError::Store(format!("Failed to begin read: {}", e)))?;
        let table = read_txn
            .open_table(COLLECTIONS_TABLE)
            .map_err(|e| AppError::Store(format!("Failed to open table: {}", e)))?;

        match table
            .get(username)
            .map_err(|e| AppError::Store(format!("Failed to read entries: {}", e)))?
        {
            Some(guard) => serde_json::from_str(guard.value())
                .map_err(|e| AppError::Store(format!("Corrupt entry sequence: {}", e))),
            None => Ok(Vec::new()),
        }
    }

    fn write_entries(&self, username: &str, entries: &[CollectedEntry]) -> AppResult<()> {
        let serialized = serde_json::to_string(entries)
            .map_err(|e| AppError::Store(format!("Serialization error: {}", e)))?;

        let db = self
            .db
            .lock()
            .map_err(|e| AppError::Store(format!("Mutex poisoned: {}", e)))?;

        let write_txn = db
            .begin_write()
            .map_err(|e| AppError::Store(format!("Failed to begin write: {}", e)))?;
        {
            let mut table = write_txn
                .open_table(COLLECTIONS_TABLE)
                .map_err(|e| AppError::Store(format!("Failed to open table: {}", e)))?;
            table
                .insert(username, serialized.as_str())
                .map_err(|e| AppError::Store(format!("Failed to insert: {}", e)))?;
        }
        write_txn
            .commit()
            .map_err(|e| AppError::Store(format!("Failed to commit: {}", e)))
    }
}

#[async_trait]
impl CollectionStore for RedbCollectionStore {
    async fn get(&self, username: &str) -> AppResult<Vec<CollectedEntry>> {
        self.read_entries(username)
    }

    async fn set(&self, username: &str, entries: &[CollectedEntry]) -> AppResult<()> {
        self.write_entries(username, entries)
    }
}

/// In-memory store, used as fallback and in tests.
pub struct InMemoryCollectionStore {
    entries: Mutex<HashMap<String, Vec<CollectedEntry>>>,
}

impl InMemoryCollectionStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryCollectionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CollectionStore for InMemoryCollectionStore {
    async fn get(&self, username: &str) -> AppResult<Vec<CollectedEntry>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| AppError::Store(format!("Mutex poisoned: {}", e)))?;
        Ok(entries.get(username).cloned().unwrap_or_default())
    }

    async fn set(&self, username: &str, entries_in: &[CollectedEntry]) -> AppResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| AppError::Store(format!("Mutex poisoned: {}", e)))?;
        entries.insert(username.to_string(), entries_in.to_vec());
        Ok(())
    }
}

/// Open the default store, falling back to memory when the database is
/// unavailable so the session still works for its lifetime.
pub fn open_store() -> Arc<dyn CollectionStore> {
    match RedbCollectionStore::open_default() {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!(
                "[CollectionStore] Failed to open database: {}, using in-memory fallback",
                e
            );
            Arc::new(InMemoryCollectionStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lookup::mock_word_data;
    use crate::shared::types::WordKey;
    use chrono::Utc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn entry(word: &str) -> CollectedEntry {
        CollectedEntry {
            word: WordKey::new(word).unwrap(),
            data: mock_word_data(word),
            collected_at: Utc::now(),
        }
    }

    fn temp_db_path() -> std::path::PathBuf {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "wordvault-test-{}-{}.redb",
            std::process::id(),
            n
        ))
    }

    #[tokio::test]
    async fn test_in_memory_round_trip() {
        let store = InMemoryCollectionStore::new();
        assert!(store.get("evan").await.unwrap().is_empty());

        let entries = vec![entry("apple"), entry("banana")];
        store.set("evan", &entries).await.unwrap();

        let loaded = store.get("evan").await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].word.as_str(), "apple");

        // Other users are isolated.
        assert!(store.get("someone-else").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_redb_round_trip() {
        let path = temp_db_path();
        let store = RedbCollectionStore::open(&path).unwrap();

        assert!(store.get("evan").await.unwrap().is_empty());

        let entries = vec![entry("apple")];
        store.set("evan", &entries).await.unwrap();

        let loaded = store.get("evan").await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].word.as_str(), "apple");
        assert_eq!(loaded[0].data.definitions.len(), 1);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_redb_whole_sequence_overwrite() {
        let path = temp_db_path();
        let store = RedbCollectionStore::open(&path).unwrap();

        store.set("evan", &[entry("apple"), entry("pear")]).await.unwrap();
        store.set("evan", &[entry("pear")]).await.unwrap();

        let loaded = store.get("evan").await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].word.as_str(), "pear");

        let _ = std::fs::remove_file(&path);
    }
}
