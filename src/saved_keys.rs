//! Favourite keys a user can pick instead of typing them again
//!
//! The codec never reads from here, callers look a key up and pass it to the encoder

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use mestre_macros::impl_default_for;
use mestre_util::result_ext::ResultExt as _;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{key::PixKey, merchant::MerchantInfo};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyStoreError {
    #[error("no saved key named {0:?}")]
    NotFound(String),

    #[error("label must not be empty")]
    EmptyLabel,

    #[error("unable to read key store: {0}")]
    Read(String),

    #[error("unable to write key store: {0}")]
    Write(String),

    #[error("key store is corrupted: {0}")]
    Corrupted(String),
}

type Result<T, E = KeyStoreError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedKey {
    pub label: String,
    pub key: PixKey,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<MerchantInfo>,
}

impl SavedKey {
    pub fn new(label: impl Into<String>, key: PixKey) -> Self {
        Self { label: label.into(), key, merchant: None }
    }

    pub fn with_merchant(mut self, merchant: MerchantInfo) -> Self {
        self.merchant = Some(merchant);
        self
    }

    fn with_trimmed_label(self) -> Result<Self> {
        let label = self.label.trim().to_string();
        if label.is_empty() {
            return Err(KeyStoreError::EmptyLabel);
        }

        Ok(Self { label, ..self })
    }
}

pub trait KeyStore {
    /// Every saved key, ordered by label
    fn list(&self) -> Result<Vec<SavedKey>>;

    fn get(&self, label: &str) -> Result<SavedKey>;

    /// Inserts or replaces the key with the same label
    fn save(&self, key: SavedKey) -> Result<()>;

    fn remove(&self, label: &str) -> Result<SavedKey>;
}

#[derive(Debug)]
pub struct MemoryKeyStore {
    keys: RwLock<BTreeMap<String, SavedKey>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self { keys: RwLock::new(BTreeMap::new()) }
    }
}

impl_default_for!(MemoryKeyStore);

impl KeyStore for MemoryKeyStore {
    fn list(&self) -> Result<Vec<SavedKey>> {
        Ok(self.keys.read().values().cloned().collect())
    }

    fn get(&self, label: &str) -> Result<SavedKey> {
        self.keys.read().get(label).cloned().ok_or_else(|| KeyStoreError::NotFound(label.into()))
    }

    fn save(&self, key: SavedKey) -> Result<()> {
        let key = key.with_trimmed_label()?;
        self.keys.write().insert(key.label.clone(), key);
        Ok(())
    }

    fn remove(&self, label: &str) -> Result<SavedKey> {
        self.keys.write().remove(label).ok_or_else(|| KeyStoreError::NotFound(label.into()))
    }
}

/// Keys kept as a JSON array in a single file, rewritten on every change
#[derive(Debug)]
pub struct JsonFileKeyStore {
    path: PathBuf,
    cache: MemoryKeyStore,
}

impl JsonFileKeyStore {
    /// Opens the store, a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cache = MemoryKeyStore::new();

        if path.exists() {
            let json = std::fs::read_to_string(&path).map_err_path(&path, KeyStoreError::Read)?;
            let keys: Vec<SavedKey> =
                serde_json::from_str(&json).map_err_str(KeyStoreError::Corrupted)?;

            debug!("loaded {} saved keys from {}", keys.len(), path.display());
            for key in keys {
                cache.save(key)?;
            }
        }

        Ok(Self { path, cache })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `keys` to the file, the cache is only swapped once this succeeded
    fn persist(&self, keys: &BTreeMap<String, SavedKey>) -> Result<()> {
        let keys: Vec<&SavedKey> = keys.values().collect();
        let json = serde_json::to_string_pretty(&keys).map_err_str(KeyStoreError::Write)?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err_str(KeyStoreError::Write)?;
        }

        std::fs::write(&self.path, json).map_err_path(&self.path, KeyStoreError::Write)
    }
}

impl KeyStore for JsonFileKeyStore {
    fn list(&self) -> Result<Vec<SavedKey>> {
        self.cache.list()
    }

    fn get(&self, label: &str) -> Result<SavedKey> {
        self.cache.get(label)
    }

    fn save(&self, key: SavedKey) -> Result<()> {
        let key = key.with_trimmed_label()?;

        let mut keys = self.cache.keys.write();
        let mut staged = keys.clone();
        staged.insert(key.label.clone(), key);

        self.persist(&staged)?;
        *keys = staged;

        Ok(())
    }

    fn remove(&self, label: &str) -> Result<SavedKey> {
        let mut keys = self.cache.keys.write();
        let mut staged = keys.clone();
        let removed =
            staged.remove(label).ok_or_else(|| KeyStoreError::NotFound(label.into()))?;

        self.persist(&staged)?;
        *keys = staged;

        Ok(removed)
    }
}
