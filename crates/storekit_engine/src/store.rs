//! Physical store state and file persistence.
//!
//! A store is a single CBOR document on disk:
//!
//! ```text
//! { store_uuid, sequence, metadata, next_ordinals, collections }
//! ```
//!
//! The document is rewritten atomically (temp file + rename) under an
//! advisory exclusive lock on the backing file. In-memory stores skip
//! persistence entirely.

use crate::config::StoreLocation;
use crate::error::{EngineError, EngineResult};
use crate::record_id::RecordId;
use fs2::FileExt;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Format version written into fresh store metadata.
const STORE_FORMAT_VERSION: i64 = 1;

/// Metadata key holding the store's own identifier.
pub const META_STORE_IDENTIFIER: &str = "store_identifier";
/// Metadata key holding the store format version.
pub const META_FORMAT_VERSION: &str = "format_version";

/// Kind of physical store.
///
/// Only document stores exist today; the kind is part of the destroy
/// contract so that a coordinator holding mixed store types can refuse
/// a mismatched destroy request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreKind {
    /// A CBOR document store.
    Document,
}

/// A value in a store's metadata map.
///
/// Metadata is attached to the physical store file, outside any record
/// collection. The engine itself keeps typed entries here (format
/// version, store identity); callers usually only care about text
/// entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetadataValue {
    /// A UTF-8 string value.
    Text(String),
    /// A signed integer value.
    Integer(i64),
    /// A boolean value.
    Boolean(bool),
}

impl MetadataValue {
    /// Returns the contained text, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A stored record: identifier plus encoded payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RawRecord {
    /// The record's persistent identifier.
    pub id: RecordId,
    /// Canonical CBOR payload.
    pub payload: Vec<u8>,
}

/// Mutable store state guarded by the store's lock.
#[derive(Debug)]
struct StoreInner {
    sequence: u64,
    metadata: BTreeMap<String, MetadataValue>,
    next_ordinals: BTreeMap<String, u64>,
    collections: BTreeMap<String, Vec<RawRecord>>,
    destroyed: bool,
}

/// On-disk shape of a store.
#[derive(Serialize, Deserialize)]
struct StoreDocument {
    store_uuid: Uuid,
    sequence: u64,
    metadata: BTreeMap<String, MetadataValue>,
    next_ordinals: BTreeMap<String, u64>,
    collections: BTreeMap<String, Vec<RawRecord>>,
}

/// A physical store registered with a coordinator.
///
/// The store owns the one truly shared mutable resource: the backing
/// file. All commits, bulk erases, and metadata writes funnel through
/// its lock, which makes the store the serialization point for
/// concurrent destructive operations.
#[derive(Debug)]
pub struct PersistentStore {
    uuid: Uuid,
    location: StoreLocation,
    kind: StoreKind,
    inner: RwLock<StoreInner>,
}

impl PersistentStore {
    /// Opens or creates a store at the given location.
    ///
    /// A fresh on-disk store writes its backing file immediately, so
    /// the file exists as soon as the store does.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing file exists but cannot be read
    /// or does not contain a valid store document.
    pub(crate) fn open(location: StoreLocation, kind: StoreKind) -> EngineResult<Self> {
        let loaded = match location.path() {
            Some(path) if path.exists() => Some(Self::load_document(path)?),
            _ => None,
        };

        let store = match loaded {
            Some(doc) => Self {
                uuid: doc.store_uuid,
                location,
                kind,
                inner: RwLock::new(StoreInner {
                    sequence: doc.sequence,
                    metadata: doc.metadata,
                    next_ordinals: doc.next_ordinals,
                    collections: doc.collections,
                    destroyed: false,
                }),
            },
            None => {
                let uuid = Uuid::new_v4();
                let mut metadata = BTreeMap::new();
                metadata.insert(
                    META_STORE_IDENTIFIER.to_string(),
                    MetadataValue::Text(uuid.to_string()),
                );
                metadata.insert(
                    META_FORMAT_VERSION.to_string(),
                    MetadataValue::Integer(STORE_FORMAT_VERSION),
                );
                let store = Self {
                    uuid,
                    location,
                    kind,
                    inner: RwLock::new(StoreInner {
                        sequence: 0,
                        metadata,
                        next_ordinals: BTreeMap::new(),
                        collections: BTreeMap::new(),
                        destroyed: false,
                    }),
                };
                store.persist(&store.inner.read())?;
                store
            }
        };

        tracing::debug!(store = %store.uuid, "opened store");
        Ok(store)
    }

    /// Returns the store's UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Returns the store's kind.
    #[must_use]
    pub fn kind(&self) -> StoreKind {
        self.kind
    }

    /// Returns the backing file path, if the store is file-backed.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.location.path()
    }

    /// Returns the store's commit sequence.
    ///
    /// The sequence advances on every persisted mutation, including a
    /// save with nothing staged.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.inner.read().sequence
    }

    /// Returns true if the store has been destroyed.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.inner.read().destroyed
    }

    /// Reserves the next 1-based ordinal for a collection.
    pub(crate) fn reserve_ordinal(&self, model: &str) -> u64 {
        let mut inner = self.inner.write();
        let next = inner.next_ordinals.entry(model.to_string()).or_insert(1);
        let ordinal = *next;
        *next += 1;
        ordinal
    }

    /// Returns a snapshot of a collection's committed records.
    pub(crate) fn rows(&self, model: &str) -> Vec<RawRecord> {
        self.inner
            .read()
            .collections
            .get(model)
            .cloned()
            .unwrap_or_default()
    }

    /// Applies staged operations and persists the store.
    ///
    /// The sequence advances and the file is rewritten even when `ops`
    /// is empty; that is the engine-level side effect of an
    /// unconditional save.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StoreDestroyed`] after destruction, or an
    /// I/O error if the rewrite fails. On persist failure the in-memory
    /// state keeps the applied operations; the file catches up on the
    /// next successful save.
    pub(crate) fn commit(&self, ops: &[CommitOp]) -> EngineResult<u64> {
        let mut inner = self.inner.write();
        self.ensure_alive(&inner)?;
        for op in ops {
            match op {
                CommitOp::Insert { id, payload } => {
                    inner
                        .collections
                        .entry(id.model().to_string())
                        .or_default()
                        .push(RawRecord {
                            id: id.clone(),
                            payload: payload.clone(),
                        });
                }
                CommitOp::Delete { id } => {
                    if let Some(rows) = inner.collections.get_mut(id.model()) {
                        rows.retain(|row| row.id != *id);
                    }
                }
            }
        }
        inner.sequence += 1;
        self.persist(&inner)?;
        Ok(inner.sequence)
    }

    /// Removes every record of one collection and persists.
    ///
    /// This is the engine's bulk-delete primitive; it bypasses context
    /// staging entirely.
    pub(crate) fn delete_all(&self, model: &str) -> EngineResult<()> {
        let mut inner = self.inner.write();
        self.ensure_alive(&inner)?;
        inner.collections.remove(model);
        inner.sequence += 1;
        self.persist(&inner)?;
        Ok(())
    }

    /// Removes every record of every collection and persists.
    ///
    /// Metadata survives an erase; only destroying the store removes it.
    pub(crate) fn erase_all(&self) -> EngineResult<()> {
        let mut inner = self.inner.write();
        self.ensure_alive(&inner)?;
        inner.collections.clear();
        inner.sequence += 1;
        self.persist(&inner)?;
        Ok(())
    }

    /// Returns a copy of the store's metadata map.
    pub(crate) fn metadata(&self) -> BTreeMap<String, MetadataValue> {
        self.inner.read().metadata.clone()
    }

    /// Replaces the store's metadata map in memory.
    ///
    /// The replacement is not persisted here; it reaches the file with
    /// the next context save. The two steps are deliberately not
    /// transactional with each other.
    pub(crate) fn set_metadata(
        &self,
        metadata: BTreeMap<String, MetadataValue>,
    ) -> EngineResult<()> {
        let mut inner = self.inner.write();
        self.ensure_alive(&inner)?;
        inner.metadata = metadata;
        Ok(())
    }

    /// Destroys the store: clears all state and deletes the backing file.
    ///
    /// Reads against a destroyed store answer empty; writes fail with
    /// [`EngineError::StoreDestroyed`].
    pub(crate) fn destroy(&self) -> EngineResult<()> {
        let mut inner = self.inner.write();
        inner.collections.clear();
        inner.metadata.clear();
        inner.destroyed = true;
        if let Some(path) = self.location.path() {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        tracing::debug!(store = %self.uuid, "destroyed store");
        Ok(())
    }

    fn ensure_alive(&self, inner: &StoreInner) -> EngineResult<()> {
        if inner.destroyed {
            return Err(EngineError::StoreDestroyed {
                path: self
                    .location
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_default(),
            });
        }
        Ok(())
    }

    /// Reads and decodes a store document from disk.
    fn load_document(path: &Path) -> EngineResult<StoreDocument> {
        let file = File::open(path)?;
        ciborium::from_reader(file)
            .map_err(|err| EngineError::invalid_store_file(err.to_string()))
    }

    /// Rewrites the backing file atomically under an exclusive lock.
    fn persist(&self, inner: &StoreInner) -> EngineResult<()> {
        let Some(path) = self.location.path() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Exclusive advisory lock on the target for the rewrite window.
        let lock = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        lock.lock_exclusive()?;

        let document = StoreDocument {
            store_uuid: self.uuid,
            sequence: inner.sequence,
            metadata: inner.metadata.clone(),
            next_ordinals: inner.next_ordinals.clone(),
            collections: inner.collections.clone(),
        };
        let temp_path = temp_path_for(path);
        let temp = File::create(&temp_path)?;
        ciborium::into_writer(&document, &temp).map_err(EngineError::codec)?;
        temp.sync_all()?;
        fs::rename(&temp_path, path)?;

        lock.unlock()?;
        Ok(())
    }
}

/// An operation applied at commit time.
#[derive(Debug, Clone)]
pub(crate) enum CommitOp {
    /// Append a record.
    Insert {
        /// Identifier reserved at staging time.
        id: RecordId,
        /// Encoded payload.
        payload: Vec<u8>,
    },
    /// Remove a record by identifier.
    Delete {
        /// Identifier of the record to remove.
        id: RecordId,
    },
}

/// Sibling temp path used for atomic rewrites.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(ToOwned::to_owned).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Encodes a value as canonical CBOR.
pub(crate) fn encode_payload<T: Serialize>(value: &T) -> EngineResult<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).map_err(EngineError::codec)?;
    Ok(buf)
}

/// Decodes a value from canonical CBOR.
pub(crate) fn decode_payload<T: DeserializeOwned>(bytes: &[u8]) -> EngineResult<T> {
    ciborium::from_reader(bytes).map_err(|err| EngineError::codec(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn fresh_store_writes_backing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.store");
        let store =
            PersistentStore::open(StoreLocation::OnDisk(path.clone()), StoreKind::Document)
                .unwrap();
        assert!(path.exists());
        assert_eq!(store.sequence(), 0);
    }

    #[test]
    fn reopen_preserves_identity_and_sequence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.store");
        let first =
            PersistentStore::open(StoreLocation::OnDisk(path.clone()), StoreKind::Document)
                .unwrap();
        first.commit(&[]).unwrap();
        let uuid = first.uuid();
        drop(first);

        let second =
            PersistentStore::open(StoreLocation::OnDisk(path), StoreKind::Document).unwrap();
        assert_eq!(second.uuid(), uuid);
        assert_eq!(second.sequence(), 1);
    }

    #[test]
    fn empty_commit_still_advances_sequence() {
        let store = PersistentStore::open(StoreLocation::InMemory, StoreKind::Document).unwrap();
        assert_eq!(store.sequence(), 0);
        store.commit(&[]).unwrap();
        store.commit(&[]).unwrap();
        assert_eq!(store.sequence(), 2);
    }

    #[test]
    fn fresh_metadata_is_seeded() {
        let store = PersistentStore::open(StoreLocation::InMemory, StoreKind::Document).unwrap();
        let metadata = store.metadata();
        assert!(metadata.contains_key(META_STORE_IDENTIFIER));
        assert_eq!(
            metadata.get(META_FORMAT_VERSION),
            Some(&MetadataValue::Integer(STORE_FORMAT_VERSION))
        );
    }

    #[test]
    fn destroyed_store_rejects_writes_and_reads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.store");
        let store =
            PersistentStore::open(StoreLocation::OnDisk(path.clone()), StoreKind::Document)
                .unwrap();
        store.destroy().unwrap();
        assert!(!path.exists());
        assert!(store.metadata().is_empty());
        assert!(matches!(
            store.commit(&[]),
            Err(EngineError::StoreDestroyed { .. })
        ));
    }
}
