//! Test fixtures: models and descriptors with automatic cleanup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use storekit_core::descriptor::{ContainerCell, StoreDescriptor};
use storekit_core::UtilResult;
use storekit_engine::{Container, Model, StoreLocation};
use tempfile::TempDir;

/// A login credential, the canonical small test record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Account user name.
    pub user_name: String,
    /// Account password.
    pub password: String,
}

impl Credential {
    /// Creates a credential.
    #[must_use]
    pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            password: password.into(),
        }
    }
}

impl Model for Credential {
    const MODEL_NAME: &'static str = "Credential";
}

/// A free-form note, the second model for multi-model scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Note body.
    pub body: String,
    /// Monotonic edit counter.
    pub revision: u64,
}

impl Note {
    /// Creates a note at revision 0.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            revision: 0,
        }
    }
}

impl Model for Note {
    const MODEL_NAME: &'static str = "Note";
}

/// Model names every test store declares.
pub const TEST_MODELS: &[&str] = &[Credential::MODEL_NAME, Note::MODEL_NAME];

/// A test database descriptor with automatic cleanup.
///
/// The on-disk variant keeps its [`TempDir`] alive for the fixture's
/// lifetime, so the backing file disappears with the fixture.
pub struct TestStore {
    location: StoreLocation,
    cell: ContainerCell,
    _temp_dir: Option<TempDir>,
}

impl TestStore {
    /// Creates a file-backed test store in a fresh temp directory.
    #[must_use]
    pub fn on_disk() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp directory");
        let path = temp_dir.path().join("test.store");
        Self {
            location: StoreLocation::OnDisk(path),
            cell: ContainerCell::new(),
            _temp_dir: Some(temp_dir),
        }
    }

    /// Creates an in-memory test store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::InMemory,
            cell: ContainerCell::new(),
            _temp_dir: None,
        }
    }

    /// Creates a test store over an explicit path the caller owns.
    ///
    /// No cleanup happens on drop; reopening the same path later sees
    /// whatever the previous store persisted.
    #[must_use]
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::OnDisk(path.into()),
            cell: ContainerCell::new(),
            _temp_dir: None,
        }
    }

    /// Returns the backing file path, if file-backed.
    #[must_use]
    pub fn store_path(&self) -> Option<PathBuf> {
        self.location.path().map(PathBuf::from)
    }
}

impl StoreDescriptor for TestStore {
    fn model_names(&self) -> &[&'static str] {
        TEST_MODELS
    }

    fn location(&self) -> StoreLocation {
        self.location.clone()
    }

    fn container(&self) -> UtilResult<Arc<Container>> {
        self.cell.get_or_open(|| self.config())
    }
}

/// Runs a test against a fresh file-backed store.
///
/// # Example
///
/// ```rust,ignore
/// with_test_store(|db| {
///     let mut ctx = session::open_context(db)?;
///     // ... test operations
/// });
/// ```
pub fn with_test_store<F, R>(f: F) -> R
where
    F: FnOnce(&TestStore) -> R,
{
    let store = TestStore::on_disk();
    f(&store)
}
