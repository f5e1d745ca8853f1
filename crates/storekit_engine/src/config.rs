//! Store configuration.

use crate::schema::Schema;
use std::path::{Path, PathBuf};

/// Physical location of a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// A file-backed store at the given path.
    OnDisk(PathBuf),
    /// An ephemeral store that lives only in memory.
    InMemory,
}

impl StoreLocation {
    /// Returns the backing file path, if the store is file-backed.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::OnDisk(path) => Some(path),
            Self::InMemory => None,
        }
    }
}

/// Configuration for opening a container.
///
/// A configuration binds a schema to a physical location. The schema
/// here must match the schema the container is opened with; mixing
/// configurations derived from different model sets is a caller error.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Where the store's data lives.
    pub location: StoreLocation,
    /// The model set the store persists.
    pub schema: Schema,
}

impl StoreConfig {
    /// Creates a configuration for the given location and schema.
    #[must_use]
    pub fn new(location: StoreLocation, schema: Schema) -> Self {
        Self { location, schema }
    }

    /// Creates a file-backed configuration.
    #[must_use]
    pub fn on_disk(path: impl Into<PathBuf>, schema: Schema) -> Self {
        Self::new(StoreLocation::OnDisk(path.into()), schema)
    }

    /// Creates an in-memory configuration.
    #[must_use]
    pub fn in_memory(schema: Schema) -> Self {
        Self::new(StoreLocation::InMemory, schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_disk_exposes_path() {
        let config = StoreConfig::on_disk("/tmp/app.store", Schema::new(&["Credential"]));
        assert_eq!(
            config.location.path(),
            Some(Path::new("/tmp/app.store"))
        );
    }

    #[test]
    fn in_memory_has_no_path() {
        let config = StoreConfig::in_memory(Schema::new(&["Credential"]));
        assert_eq!(config.location.path(), None);
    }
}
