//! Object storage behind a narrow trait.
//!
//! The pipeline only ever lists by prefix, moves whole objects between the
//! bucket and the local staging directories, and asks whether an object
//! exists. `GcsStore` talks to the Google Cloud Storage JSON API;
//! `MemoryStore` backs the test suites.

pub mod gcs;

use crate::error::{PolyvoxError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

pub use gcs::GcsStore;

/// Trait for bucket-style object storage.
///
/// Object names are bucket-relative and use `/` separators, mirroring the
/// local staging layout (`text_prompts/input-1.txt`).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List object names under a prefix, in storage order.
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Download an object to a local path, creating parent directories.
    async fn download(&self, object: &str, dest: &Path) -> Result<()>;

    /// Upload a local file to an object name, overwriting any existing object.
    async fn upload(&self, src: &Path, object: &str) -> Result<()>;

    /// Whether an object exists.
    async fn exists(&self, object: &str) -> Result<bool>;
}

/// In-memory object store for testing.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or replace an object directly.
    pub fn put(&self, object: &str, bytes: &[u8]) {
        self.lock().insert(object.to_string(), bytes.to_vec());
    }

    /// Read an object's bytes, if present.
    pub fn get(&self, object: &str) -> Option<Vec<u8>> {
        self.lock().get(object).cloned()
    }

    /// All object names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.objects
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .lock()
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn download(&self, object: &str, dest: &Path) -> Result<()> {
        let bytes = self
            .get(object)
            .ok_or_else(|| PolyvoxError::Storage {
                message: format!("object not found: {object}"),
            })?;
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(dest, bytes)?;
        Ok(())
    }

    async fn upload(&self, src: &Path, object: &str) -> Result<()> {
        let bytes = std::fs::read(src)?;
        self.lock().insert(object.to_string(), bytes);
        Ok(())
    }

    async fn exists(&self, object: &str) -> Result<bool> {
        Ok(self.lock().contains_key(object))
    }
}
