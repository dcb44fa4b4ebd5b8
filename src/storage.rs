//! Storage layer for taskdesk
//!
//! Each collection is a whole-file JSON array that is read and rewritten in
//! full on every mutation.
//!
//! # Directory Structure
//!
//! ```text
//! <data_dir>/
//!   categories.json         # Category collection
//!   categories.json.lock    # Mutual-exclusion region for categories
//!   tasks.json              # Task collection
//!   tasks.json.lock         # Mutual-exclusion region for tasks
//! ```
//!
//! Listing reads never fail: a missing or unparsable collection is logged and
//! read as empty. Mutations read through `read_for_update`, which refuses an
//! existing collection it cannot decode so that a rewrite never drops records.
//! Writes are atomic and their failures are returned.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};

/// The two persisted record collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Categories,
    Tasks,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Categories => "categories",
            Collection::Tasks => "tasks",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.json", self.name())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Held while a collection's read-modify-write cycle runs.
///
/// Dropping the guard releases the region.
pub struct CollectionGuard {
    _inner: GuardInner,
}

enum GuardInner {
    File(#[allow(dead_code)] FileLock),
    Memory(#[allow(dead_code)] RegionHold),
}

/// Whole-collection record storage.
///
/// Callers that mutate a collection take `lock` first, then `read_for_update`,
/// then `write_all`. When two collections are involved the order is
/// categories before tasks.
pub trait Backend {
    /// Read every record of a collection; empty when absent or unreadable.
    fn read_all<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        self.read_for_update(collection).unwrap_or_else(|err| {
            warn!(%collection, error = %err, "unreadable collection, reading as empty");
            Vec::new()
        })
    }

    /// Read a collection that is about to be rewritten.
    ///
    /// Absent means empty; present but undecodable is a `StorageFailure`.
    fn read_for_update<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>>;

    /// Replace a collection with `records`.
    fn write_all<T: Serialize>(&self, collection: Collection, records: &[T]) -> Result<()>;

    /// Enter the collection's mutual-exclusion region.
    fn lock(&self, collection: Collection) -> Result<CollectionGuard>;
}

impl<B: Backend + ?Sized> Backend for Arc<B> {
    fn read_all<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        (**self).read_all(collection)
    }

    fn read_for_update<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
        (**self).read_for_update(collection)
    }

    fn write_all<T: Serialize>(&self, collection: Collection, records: &[T]) -> Result<()> {
        (**self).write_all(collection, records)
    }

    fn lock(&self, collection: Collection) -> Result<CollectionGuard> {
        (**self).lock(collection)
    }
}

/// JSON files under a data directory
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    data_dir: PathBuf,
    lock_timeout_ms: u64,
    pretty: bool,
}

impl JsonFileBackend {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
            pretty: true,
        }
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of a collection's data file
    pub fn collection_file(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }

    /// Path of a collection's lock file
    pub fn lock_file(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(format!("{}.lock", collection.file_name()))
    }

    /// Create the data directory if missing
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

impl Backend for JsonFileBackend {
    fn read_for_update<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
        let path = self.collection_file(collection);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(%collection, path = %path.display(), "collection file absent");
                return Ok(Vec::new());
            }
            Err(err) => return Err(Error::Io(err)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|err| {
            Error::StorageFailure(format!(
                "{collection} collection at {} cannot be decoded: {err}",
                path.display()
            ))
        })
    }

    fn write_all<T: Serialize>(&self, collection: Collection, records: &[T]) -> Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(records)?
        } else {
            serde_json::to_string(records)?
        };
        let path = self.collection_file(collection);
        lock::write_atomic(&path, json.as_bytes()).map_err(|err| {
            warn!(%collection, path = %path.display(), error = %err, "failed to write collection");
            err
        })?;
        debug!(%collection, records = records.len(), "collection written");
        Ok(())
    }

    fn lock(&self, collection: Collection) -> Result<CollectionGuard> {
        let lock = FileLock::acquire(self.lock_file(collection), self.lock_timeout_ms)?;
        Ok(CollectionGuard {
            _inner: GuardInner::File(lock),
        })
    }
}

/// In-process storage holding each collection as a JSON value.
///
/// Writes to selected collections can be made to fail, which lets callers
/// observe how partial failures are handled.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    collections: Mutex<HashMap<Collection, serde_json::Value>>,
    failing: Mutex<HashSet<Collection>>,
    regions: MemoryRegions,
}

#[derive(Debug, Default)]
struct MemoryRegions {
    categories: Arc<Region>,
    tasks: Arc<Region>,
}

#[derive(Debug, Default)]
struct Region {
    held: Mutex<bool>,
    released: Condvar,
}

impl Region {
    fn enter(self: Arc<Self>) -> RegionHold {
        let mut held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        while *held {
            held = self
                .released
                .wait(held)
                .unwrap_or_else(|e| e.into_inner());
        }
        *held = true;
        drop(held);
        RegionHold { region: self }
    }
}

struct RegionHold {
    region: Arc<Region>,
}

impl Drop for RegionHold {
    fn drop(&mut self) {
        let mut held = self.region.held.lock().unwrap_or_else(|e| e.into_inner());
        *held = false;
        self.region.released.notify_one();
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later write to `collection` fail (or succeed again).
    pub fn fail_writes(&self, collection: Collection, fail: bool) {
        let mut failing = self.failing.lock().unwrap_or_else(|e| e.into_inner());
        if fail {
            failing.insert(collection);
        } else {
            failing.remove(&collection);
        }
    }

    /// Store raw JSON for a collection, bypassing serialization.
    pub fn put_raw(&self, collection: Collection, value: serde_json::Value) {
        self.collections
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(collection, value);
    }
}

impl Backend for MemoryBackend {
    fn read_for_update<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
        let collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        let Some(value) = collections.get(&collection) else {
            return Ok(Vec::new());
        };
        serde_json::from_value(value.clone()).map_err(|err| {
            Error::StorageFailure(format!("{collection} collection cannot be decoded: {err}"))
        })
    }

    fn write_all<T: Serialize>(&self, collection: Collection, records: &[T]) -> Result<()> {
        if self
            .failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&collection)
        {
            return Err(Error::StorageFailure(format!(
                "write to {collection} rejected"
            )));
        }
        let value = serde_json::to_value(records)?;
        self.collections
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(collection, value);
        Ok(())
    }

    fn lock(&self, collection: Collection) -> Result<CollectionGuard> {
        let region = match collection {
            Collection::Categories => Arc::clone(&self.regions.categories),
            Collection::Tasks => Arc::clone(&self.regions.tasks),
        };
        Ok(CollectionGuard {
            _inner: GuardInner::Memory(region.enter()),
        })
    }
}
