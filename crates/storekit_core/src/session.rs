//! Session lifecycle and the commit-if-dirty discipline.
//!
//! A context is created per logical operation, used from one thread of
//! control, and discarded after use. Mutations follow a two-step
//! protocol: stage the change, then conditionally flush through
//! [`commit_if_dirty`]. Batch callers stage N changes with
//! `should_commit = false` and flush once at the end; single-call
//! callers get correctness by default.

use crate::descriptor::StoreDescriptor;
use crate::error::{UtilError, UtilResult};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use storekit_engine::{Context, Model, RecordId, Stored};

/// Opens a fresh context for the descriptor's container.
///
/// The container is built (or reused from the descriptor's cache) and
/// autosave is disabled on the new context: an engine-level save with
/// nothing staged still rewrites the store file, so saves must go
/// through [`commit_if_dirty`] instead.
///
/// # Errors
///
/// Returns [`UtilError::StorageUnavailable`] if the container cannot be
/// initialized.
pub fn open_context(descriptor: &dyn StoreDescriptor) -> UtilResult<Context> {
    let container = descriptor.container()?;
    let mut context = container.new_context();
    context.set_autosave(false);
    Ok(context)
}

/// Saves the context's staged changes, if any.
///
/// With a clear dirty bit this is a no-op and no engine save happens at
/// all. This is the only sanctioned way mutations are persisted;
/// calling the engine's save unconditionally is disallowed by
/// convention because an empty save has engine-level side effects.
///
/// Calling this twice in a row without an intervening mutation performs
/// exactly one underlying commit.
///
/// # Errors
///
/// Returns [`UtilError::CommitFailed`] if the engine rejects the save.
pub fn commit_if_dirty(context: &mut Context) -> UtilResult<()> {
    if !context.has_changes() {
        return Ok(());
    }
    context.save().map_err(UtilError::commit_failed)?;
    Ok(())
}

/// Stages a record insert, then conditionally flushes.
///
/// Returns the identifier the engine reserved for the record.
///
/// # Errors
///
/// Returns the engine's staging error, or [`UtilError::CommitFailed`]
/// if `should_commit` is set and the flush fails.
pub fn insert<T: Model>(
    context: &mut Context,
    record: &T,
    should_commit: bool,
) -> UtilResult<RecordId> {
    let id = context.stage_insert(record)?;
    if should_commit {
        commit_if_dirty(context)?;
    }
    Ok(id)
}

/// Stages the deletion of a fetched record, then conditionally flushes.
///
/// The record must have been fetched through this context; a handle
/// fetched through another context refers to the same stored record but
/// staging its deletion here is only correct after a fresh fetch.
///
/// # Errors
///
/// Returns the engine's staging error, or [`UtilError::CommitFailed`]
/// if `should_commit` is set and the flush fails.
pub fn delete<T: Model>(
    context: &mut Context,
    record: &Stored<T>,
    should_commit: bool,
) -> UtilResult<()> {
    context.stage_delete(record)?;
    if should_commit {
        commit_if_dirty(context)?;
    }
    Ok(())
}

/// Runs a closure on a background thread with its own fresh context.
///
/// Fire and forget: the dispatch is not awaited, not cancellable, and
/// not ordered relative to other operations. The closure receives the
/// result of opening the context, so container failures surface inside
/// the closure rather than being lost.
pub fn with_background_context<F>(descriptor: Arc<dyn StoreDescriptor>, f: F)
where
    F: FnOnce(UtilResult<Context>) + Send + 'static,
{
    thread::spawn(move || {
        f(open_context(descriptor.as_ref()));
    });
}

/// Returns true if the descriptor's primary store file exists on disk.
///
/// An in-memory descriptor, or one whose container cannot be built,
/// reports `false` (with a log entry for the latter).
#[must_use]
pub fn has_persistent_file(descriptor: &dyn StoreDescriptor) -> bool {
    let container = match descriptor.container() {
        Ok(container) => container,
        Err(err) => {
            tracing::warn!(error = %err, "container unavailable while checking store file");
            return false;
        }
    };
    container
        .primary_store()
        .path()
        .is_some_and(|path| path.exists())
}

/// Removes a store file at the given path, if it exists.
///
/// Returns true if a file was removed. Failures are logged and reported
/// as `false`; resetting a live database should go through the reset
/// coordinator instead, which also clears engine state.
pub fn remove_store_file(path: &Path) -> bool {
    if !path.exists() {
        return false;
    }
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to remove store file");
            false
        }
    }
}
