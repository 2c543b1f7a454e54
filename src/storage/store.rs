// EngineStore - Persistent key-value storage using sled
//
// Provides typed access for storing:
// - Engine snapshots (campaigns, votes, ledger)
// - Local account keypairs by label

use crate::engine::{Engine, EngineConfig, EngineError, EngineSnapshot};
use crate::identity::Keypair;
use std::path::Path;
use thiserror::Error;

/// Key prefixes for organizing data
mod keys {
    pub const ENGINE_SNAPSHOT: &[u8] = b"engine:snapshot";
    pub const ACCOUNT_PREFIX: &[u8] = b"account:keypair:";
}

/// Errors from storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open database: {0}")]
    OpenFailed(String),

    #[error("Database operation failed: {0}")]
    DatabaseError(String),

    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Flush failed: {0}")]
    FlushFailed(String),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::DatabaseError(err.to_string())
    }
}

/// Persistent store for engine state and local accounts
///
/// Uses sled for crash-safe, embedded storage.
/// All writes are atomic and durable after flush.
pub struct EngineStore {
    db: sled::Db,
}

impl EngineStore {
    /// Open or create a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(|e| StoreError::OpenFailed(e.to_string()))?;
        Ok(Self { db })
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::FlushFailed(e.to_string()))?;
        Ok(())
    }

    fn put_raw(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.db.insert(key, value)?;
        Ok(())
    }

    fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.db.get(key)?.map(|v| v.to_vec()))
    }

    // ========================================================================
    // ENGINE PERSISTENCE
    // ========================================================================

    /// Save a consistent snapshot of the engine
    pub fn save_engine(&self, engine: &Engine) -> Result<(), StoreError> {
        let bytes = engine.snapshot().to_bytes()?;
        self.put_raw(keys::ENGINE_SNAPSHOT, &bytes)
    }

    /// Load the engine, `None` if nothing was saved yet
    pub fn load_engine(&self) -> Result<Option<Engine>, StoreError> {
        match self.get_raw(keys::ENGINE_SNAPSHOT)? {
            Some(bytes) => {
                let snapshot = EngineSnapshot::from_bytes(&bytes)
                    .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?;
                Ok(Some(Engine::restore(snapshot)?))
            }
            None => Ok(None),
        }
    }

    /// Load the saved engine or create and save a fresh one with `config`
    ///
    /// `config` is ignored when an engine already exists.
    pub fn load_or_init_engine(&self, config: EngineConfig) -> Result<Engine, StoreError> {
        if let Some(engine) = self.load_engine()? {
            return Ok(engine);
        }

        let engine = Engine::new(config)?;
        self.save_engine(&engine)?;
        Ok(engine)
    }

    // ========================================================================
    // ACCOUNT PERSISTENCE
    // ========================================================================

    fn account_key(label: &str) -> Vec<u8> {
        [keys::ACCOUNT_PREFIX, label.as_bytes()].concat()
    }

    /// Save a keypair with a label
    pub fn save_keypair_with_label(&self, keypair: &Keypair, label: &str) -> Result<(), StoreError> {
        self.put_raw(&Self::account_key(label), &keypair.to_bytes())
    }

    /// Load a keypair by label
    pub fn load_keypair_with_label(&self, label: &str) -> Result<Option<Keypair>, StoreError> {
        match self.get_raw(&Self::account_key(label))? {
            Some(bytes) => {
                let keypair = Keypair::from_bytes(&bytes)
                    .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?;
                Ok(Some(keypair))
            }
            None => Ok(None),
        }
    }

    /// Labels of all saved accounts, sorted
    pub fn list_account_labels(&self) -> Result<Vec<String>, StoreError> {
        let mut labels = Vec::new();
        for result in self.db.scan_prefix(keys::ACCOUNT_PREFIX) {
            let (key, _) = result?;
            let label = String::from_utf8_lossy(&key[keys::ACCOUNT_PREFIX.len()..]).into_owned();
            labels.push(label);
        }
        Ok(labels)
    }
}
