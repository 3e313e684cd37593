//! Process-wide table cache keyed by source identity.
//!
//! A source is either a data directory path or the content hash of an
//! uploaded byte stream. Entries are never partially invalidated: a new
//! upload gets a new key, and everything else lives until process exit.
//! Values are shared as `Arc<Tables>` so concurrent readers never observe
//! mutation.

use crate::domain::error::RegimescopeError;
use crate::domain::table::Tables;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKey {
    Path(PathBuf),
    Upload(String),
}

/// Content identity for uploaded bytes: hex-encoded SHA-256. Identical
/// uploads share one cache entry.
pub fn upload_key(bytes: &[u8]) -> SourceKey {
    SourceKey::Upload(hex::encode(Sha256::digest(bytes)))
}

#[derive(Default)]
pub struct TableCache {
    inner: Mutex<HashMap<SourceKey, Arc<Tables>>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached tables for `key`, running `load` on first access.
    /// A failed load caches nothing, so a later retry can succeed.
    pub fn get_or_load<F>(&self, key: &SourceKey, load: F) -> Result<Arc<Tables>, RegimescopeError>
    where
        F: FnOnce() -> Result<Tables, RegimescopeError>,
    {
        {
            let guard = self.inner.lock().unwrap_or_else(|p| p.into_inner());
            if let Some(tables) = guard.get(key) {
                return Ok(Arc::clone(tables));
            }
        }

        // Load outside the lock; slow disk reads must not block readers of
        // other keys.
        let tables = Arc::new(load()?);

        let mut guard = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        let entry = guard.entry(key.clone()).or_insert_with(|| Arc::clone(&tables));
        Ok(Arc::clone(entry))
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
