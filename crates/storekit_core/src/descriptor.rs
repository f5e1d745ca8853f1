//! Caller-implemented database descriptors.

use crate::error::{UtilError, UtilResult};
use parking_lot::Mutex;
use std::sync::Arc;
use storekit_engine::{Container, Schema, StoreConfig, StoreLocation};

/// A caller-supplied bundle of model set, schema, configuration, and
/// container accessor.
///
/// Descriptors are used as `Arc<dyn StoreDescriptor>`: the container
/// cache lives inside the descriptor instance, so the trait needs
/// reference semantics. A value-semantic descriptor would mint a fresh
/// container per copy and silently break the one-container-per-database
/// invariant.
///
/// There is no ambient default descriptor anywhere in this crate; every
/// operation takes its descriptor (or a context derived from one) as an
/// explicit argument.
///
/// The provided `schema` and `config` defaults derive both from
/// [`model_names`](Self::model_names), which keeps them consistent by
/// construction. Implementations overriding either must still derive
/// both from the same model set on every call.
///
/// # Example
///
/// ```rust,ignore
/// struct AppStore {
///     path: PathBuf,
///     cell: ContainerCell,
/// }
///
/// impl StoreDescriptor for AppStore {
///     fn model_names(&self) -> &[&'static str] {
///         &["Credential"]
///     }
///
///     fn location(&self) -> StoreLocation {
///         StoreLocation::OnDisk(self.path.clone())
///     }
///
///     fn container(&self) -> UtilResult<Arc<Container>> {
///         self.cell.get_or_open(|| self.config())
///     }
/// }
/// ```
pub trait StoreDescriptor: Send + Sync {
    /// The model names this database persists.
    fn model_names(&self) -> &[&'static str];

    /// Where the database's primary store lives.
    fn location(&self) -> StoreLocation;

    /// The schema derived from the model set.
    fn schema(&self) -> Schema {
        Schema::new(self.model_names())
    }

    /// The storage configuration: location plus schema.
    fn config(&self) -> StoreConfig {
        StoreConfig::new(self.location(), self.schema())
    }

    /// Returns the descriptor's container, building it on first use.
    ///
    /// Implementations should cache through a [`ContainerCell`] so that
    /// repeated calls return the same container.
    ///
    /// # Errors
    ///
    /// Returns [`UtilError::StorageUnavailable`] if the container
    /// cannot be initialized (bad schema, bad path, permissions).
    fn container(&self) -> UtilResult<Arc<Container>>;
}

/// Lazy, per-descriptor container cache.
///
/// Embed one in each descriptor and route [`StoreDescriptor::container`]
/// through it. A failed open is not cached, so a descriptor whose path
/// becomes available later recovers on the next call.
#[derive(Debug, Default)]
pub struct ContainerCell {
    slot: Mutex<Option<Arc<Container>>>,
}

impl ContainerCell {
    /// Creates an empty cell.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached container, opening one if the cell is empty.
    ///
    /// # Errors
    ///
    /// Returns [`UtilError::StorageUnavailable`] if the open fails.
    pub fn get_or_open(
        &self,
        config: impl FnOnce() -> StoreConfig,
    ) -> UtilResult<Arc<Container>> {
        let mut slot = self.slot.lock();
        if let Some(container) = slot.as_ref() {
            return Ok(Arc::clone(container));
        }
        let container = Container::open(config()).map_err(UtilError::storage_unavailable)?;
        *slot = Some(Arc::clone(&container));
        Ok(container)
    }
}
