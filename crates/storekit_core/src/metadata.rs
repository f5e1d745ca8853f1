//! Key/value metadata attached to physical store files.
//!
//! Metadata lives outside the record-transaction system: it is attached
//! to the store file through the engine's coordinator, not the record
//! API, so it survives schema changes to the record model. That makes
//! it the natural home for cross-process bookkeeping such as the last
//! applied change id per remote peer in a synchronization scheme.
//!
//! Reads are advisory and never fail: any lookup problem yields an
//! empty map plus a log entry. Writes are surfaced.

use crate::descriptor::StoreDescriptor;
use crate::error::{UtilError, UtilResult};
use crate::session::open_context;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storekit_engine::{Context, Coordinator, MetadataValue, PersistentStore};

/// Reads the string-valued metadata of the store at `store_path`.
///
/// Entries with non-string values belong to the engine and are dropped.
/// An unknown path yields an empty map; metadata is not critical-path
/// and its read failures stay invisible to callers.
#[must_use]
pub fn metadata(context: &Context, store_path: &Path) -> BTreeMap<String, String> {
    let coordinator = context.container().coordinator();
    let Some(store) = coordinator.store_for_path(store_path) else {
        tracing::warn!(path = %store_path.display(), "metadata read: store not found");
        return BTreeMap::new();
    };
    text_entries(coordinator.metadata(&store))
}

/// Replaces the metadata of the store at `store_path` with `map`.
///
/// Full-replace semantics, not merge: keys absent from `map` are gone
/// afterwards, including any engine-internal entries. Callers wanting
/// to keep existing keys must read and carry them over first.
///
/// After the coordinator-level replace, the context is saved
/// unconditionally: metadata changes do not set the context's dirty
/// bit, and [`crate::session::commit_if_dirty`] would skip the save.
///
/// # Errors
///
/// Returns [`UtilError::MetadataWrite`] if the store cannot be located
/// or refuses the replace, and [`UtilError::CommitFailed`] if the save
/// afterwards fails. A failed save does not roll back the
/// coordinator-level replace; the two steps are not transactional with
/// each other.
pub fn set_metadata(
    context: &mut Context,
    store_path: &Path,
    map: BTreeMap<String, String>,
) -> UtilResult<()> {
    let coordinator = Arc::clone(context.container().coordinator());
    let store = locate_store(&coordinator, store_path)?;
    let typed = map
        .into_iter()
        .map(|(key, value)| (key, MetadataValue::Text(value)))
        .collect();
    coordinator
        .set_metadata(&store, typed)
        .map_err(UtilError::metadata_write)?;
    context.save().map_err(UtilError::commit_failed)?;
    Ok(())
}

/// Reads the metadata of the descriptor's primary store.
///
/// Convenience over [`metadata`]: opens a fresh context and resolves
/// the primary store's path. Any failure along the way (container
/// unavailable, in-memory store with no path) yields an empty map.
#[must_use]
pub fn descriptor_metadata(descriptor: &dyn StoreDescriptor) -> BTreeMap<String, String> {
    let Ok(context) = open_context(descriptor) else {
        tracing::warn!("metadata read: container unavailable");
        return BTreeMap::new();
    };
    let Some(path) = primary_store_path(&context) else {
        tracing::warn!("metadata read: primary store has no path");
        return BTreeMap::new();
    };
    metadata(&context, &path)
}

/// Replaces the metadata of the descriptor's primary store.
///
/// # Errors
///
/// Returns [`UtilError::StorageUnavailable`] if the container cannot be
/// built, [`UtilError::MetadataWrite`] if the primary store has no
/// path, and otherwise the failure modes of [`set_metadata`].
pub fn set_descriptor_metadata(
    descriptor: &dyn StoreDescriptor,
    map: BTreeMap<String, String>,
) -> UtilResult<()> {
    let mut context = open_context(descriptor)?;
    let path = primary_store_path(&context)
        .ok_or_else(|| UtilError::metadata_write("primary store has no path"))?;
    set_metadata(&mut context, &path, map)
}

fn locate_store(
    coordinator: &Coordinator,
    store_path: &Path,
) -> UtilResult<Arc<PersistentStore>> {
    coordinator.store_for_path(store_path).ok_or_else(|| {
        UtilError::metadata_write(format!("no store at {}", store_path.display()))
    })
}

fn primary_store_path(context: &Context) -> Option<PathBuf> {
    context
        .container()
        .primary_store()
        .path()
        .map(Path::to_path_buf)
}

fn text_entries(map: BTreeMap<String, MetadataValue>) -> BTreeMap<String, String> {
    map.into_iter()
        .filter_map(|(key, value)| value.as_text().map(|text| (key, text.to_string())))
        .collect()
}
