//! Container: schema bound to physical stores.

use crate::config::StoreConfig;
use crate::context::Context;
use crate::coordinator::Coordinator;
use crate::error::EngineResult;
use crate::schema::Schema;
use crate::store::{PersistentStore, StoreKind};
use std::sync::Arc;

/// The runtime object binding a schema to one or more physical stores.
///
/// Containers are cheap to share (`Arc`) and safe to use from multiple
/// threads; the contexts created from one are not. A container created
/// from a configuration owns one primary document store, registered
/// with the container's [`Coordinator`].
#[derive(Debug)]
pub struct Container {
    schema: Schema,
    config: StoreConfig,
    coordinator: Arc<Coordinator>,
    primary: Arc<PersistentStore>,
}

impl Container {
    /// Opens a container for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema is invalid or the backing store
    /// file cannot be opened or created.
    pub fn open(config: StoreConfig) -> EngineResult<Arc<Self>> {
        config.schema.validate()?;
        let primary = Arc::new(PersistentStore::open(
            config.location.clone(),
            StoreKind::Document,
        )?);
        let coordinator = Arc::new(Coordinator::new(vec![primary.clone()]));
        Ok(Arc::new(Self {
            schema: config.schema.clone(),
            config,
            coordinator,
            primary,
        }))
    }

    /// Returns the container's schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the configuration the container was opened with.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the coordinator owning the container's physical stores.
    #[must_use]
    pub fn coordinator(&self) -> &Arc<Coordinator> {
        &self.coordinator
    }

    /// Returns the container's primary store.
    #[must_use]
    pub fn primary_store(&self) -> &Arc<PersistentStore> {
        &self.primary
    }

    /// Creates a fresh context over this container.
    ///
    /// Autosave is enabled by default, matching the engine's native
    /// behavior; callers that want explicit commit control must turn
    /// it off.
    #[must_use]
    pub fn new_context(self: &Arc<Self>) -> Context {
        Context::new(Arc::clone(self))
    }

    /// Deletes every record of every collection in the primary store.
    ///
    /// This is the engine-native full erase, independent of any
    /// per-collection delete. Store metadata survives; destroying the
    /// store is the only way to remove it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is destroyed or the rewrite fails.
    pub fn erase_all_data(&self) -> EngineResult<()> {
        self.primary.erase_all()
    }

    /// Returns the primary store's commit sequence.
    ///
    /// Useful as a mutation counter in tests: every save advances it
    /// exactly once.
    #[must_use]
    pub fn commit_sequence(&self) -> u64 {
        self.primary.sequence()
    }
}
