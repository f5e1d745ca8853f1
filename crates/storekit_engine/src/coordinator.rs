//! Store coordinator.

use crate::error::{EngineError, EngineResult};
use crate::store::{MetadataValue, PersistentStore, StoreKind};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Coordinates the physical stores behind one container.
///
/// The coordinator is the official access path for everything below the
/// record API: store enumeration, store-file metadata, and physical
/// destruction. Containers expose it directly; no introspection of
/// session internals is ever needed.
#[derive(Debug, Default)]
pub struct Coordinator {
    stores: RwLock<Vec<Arc<PersistentStore>>>,
}

impl Coordinator {
    /// Creates a coordinator over the given stores.
    pub(crate) fn new(stores: Vec<Arc<PersistentStore>>) -> Self {
        Self {
            stores: RwLock::new(stores),
        }
    }

    /// Returns every store currently registered.
    #[must_use]
    pub fn persistent_stores(&self) -> Vec<Arc<PersistentStore>> {
        self.stores.read().clone()
    }

    /// Looks up a file-backed store by its path.
    ///
    /// Returns `None` for unknown paths and for in-memory stores, which
    /// have no path to address them by.
    #[must_use]
    pub fn store_for_path(&self, path: &Path) -> Option<Arc<PersistentStore>> {
        self.stores
            .read()
            .iter()
            .find(|store| store.path() == Some(path))
            .cloned()
    }

    /// Reads a store's metadata map.
    #[must_use]
    pub fn metadata(&self, store: &PersistentStore) -> BTreeMap<String, MetadataValue> {
        store.metadata()
    }

    /// Replaces a store's metadata map.
    ///
    /// The whole map is replaced; callers wanting to keep existing keys
    /// must carry them over themselves. The change takes effect in
    /// memory immediately and reaches the file with the next save.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StoreDestroyed`] if the store has been
    /// destroyed.
    pub fn set_metadata(
        &self,
        store: &PersistentStore,
        metadata: BTreeMap<String, MetadataValue>,
    ) -> EngineResult<()> {
        store.set_metadata(metadata)
    }

    /// Destroys the store at the given path.
    ///
    /// The store is deregistered, its state cleared, and its backing
    /// file deleted. Live handles to the store keep answering reads as
    /// empty but refuse writes.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StoreNotFound`] if no registered store of
    /// the given kind matches the path.
    pub fn destroy_store(&self, path: &Path, kind: StoreKind) -> EngineResult<()> {
        let store = {
            let mut stores = self.stores.write();
            let position = stores
                .iter()
                .position(|store| store.path() == Some(path) && store.kind() == kind)
                .ok_or_else(|| EngineError::StoreNotFound {
                    path: path.to_path_buf(),
                })?;
            stores.remove(position)
        };
        store.destroy()
    }
}
