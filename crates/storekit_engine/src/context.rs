//! Mutable session over a container.

use crate::container::Container;
use crate::error::{EngineError, EngineResult};
use crate::fetch::FetchRequest;
use crate::model::Model;
use crate::record_id::RecordId;
use crate::store::{decode_payload, encode_payload, CommitOp};
use std::collections::HashSet;
use std::ops::Deref;
use std::sync::Arc;

/// A record fetched from a store, paired with its persistent identifier.
///
/// `Stored<T>` dereferences to the record itself, so field access reads
/// naturally; the identifier is what delete and identifier-derived
/// operations need.
#[derive(Debug, Clone)]
pub struct Stored<T> {
    id: RecordId,
    value: T,
}

impl<T> Stored<T> {
    /// Returns the record's persistent identifier.
    #[must_use]
    pub fn record_id(&self) -> &RecordId {
        &self.id
    }

    /// Consumes the handle and returns the record.
    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T> Deref for Stored<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

/// A staged, not-yet-committed operation.
#[derive(Debug, Clone)]
enum StagedOp {
    Insert { id: RecordId, payload: Vec<u8> },
    Delete { id: RecordId },
}

impl StagedOp {
    fn id(&self) -> &RecordId {
        match self {
            Self::Insert { id, .. } | Self::Delete { id } => id,
        }
    }
}

/// A mutable session bound to exactly one container.
///
/// A context stages changes and flushes them with [`Context::save`].
/// The pending-change set is the context's dirty bit: a context with an
/// empty staging area reports no changes.
///
/// Contexts are not reentrant and must never be used from two threads
/// of control at once. Two contexts over the same container are safe on
/// different threads, but changes committed through one are only seen
/// by the other on a fresh fetch.
///
/// A save with nothing staged still advances the store's commit
/// sequence and rewrites the backing file; callers who want to avoid
/// that side effect must check [`Context::has_changes`] first.
pub struct Context {
    container: Arc<Container>,
    autosave: bool,
    staged: Vec<StagedOp>,
}

impl Context {
    /// Creates a context over the container. Autosave starts enabled.
    pub(crate) fn new(container: Arc<Container>) -> Self {
        Self {
            container,
            autosave: true,
            staged: Vec::new(),
        }
    }

    /// Returns the container this context is bound to.
    #[must_use]
    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    /// Returns whether autosave is enabled.
    #[must_use]
    pub fn autosave(&self) -> bool {
        self.autosave
    }

    /// Enables or disables autosave.
    ///
    /// With autosave on, every staged operation saves immediately.
    pub fn set_autosave(&mut self, enabled: bool) {
        self.autosave = enabled;
    }

    /// Returns true if the context has staged, unsaved changes.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.staged.is_empty()
    }

    /// Stages an insert and returns the identifier reserved for it.
    ///
    /// The identifier's ordinal is reserved immediately; discarding the
    /// context without saving leaves a gap in the collection's
    /// ordinals, which is fine; ordinals are engine-internal.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SchemaViolation`] if the model is not in
    /// the container's schema, a codec error if the record cannot be
    /// encoded, or a save error when autosave is on.
    pub fn stage_insert<T: Model>(&mut self, record: &T) -> EngineResult<RecordId> {
        self.ensure_in_schema(T::MODEL_NAME)?;
        let payload = encode_payload(record)?;
        let store = self.container.primary_store();
        let ordinal = store.reserve_ordinal(T::MODEL_NAME);
        let id = RecordId::new(store.uuid(), T::MODEL_NAME, ordinal);
        self.staged.push(StagedOp::Insert {
            id: id.clone(),
            payload,
        });
        if self.autosave {
            self.save()?;
        }
        Ok(id)
    }

    /// Stages the deletion of a fetched record.
    ///
    /// Deleting a record that was staged in this context simply drops
    /// the staged insert.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SchemaViolation`] if the model is not in
    /// the container's schema, or a save error when autosave is on.
    pub fn stage_delete<T: Model>(&mut self, record: &Stored<T>) -> EngineResult<()> {
        self.ensure_in_schema(T::MODEL_NAME)?;
        let id = record.record_id().clone();
        let before = self.staged.len();
        self.staged
            .retain(|op| !matches!(op, StagedOp::Insert { id: staged, .. } if *staged == id));
        if self.staged.len() == before {
            self.staged.push(StagedOp::Delete { id });
        }
        if self.autosave {
            self.save()?;
        }
        Ok(())
    }

    /// Saves all staged changes to the container's primary store.
    ///
    /// Returns the store's new commit sequence. Saving with nothing
    /// staged is a real engine-level save: the sequence advances and
    /// the file is rewritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is destroyed or the rewrite fails.
    /// Staged changes are kept on failure so a later save can retry.
    pub fn save(&mut self) -> EngineResult<u64> {
        let ops: Vec<CommitOp> = self
            .staged
            .iter()
            .map(|op| match op {
                StagedOp::Insert { id, payload } => CommitOp::Insert {
                    id: id.clone(),
                    payload: payload.clone(),
                },
                StagedOp::Delete { id } => CommitOp::Delete { id: id.clone() },
            })
            .collect();
        let sequence = self.container.primary_store().commit(&ops)?;
        self.staged.clear();
        Ok(sequence)
    }

    /// Fetches records matching the request.
    ///
    /// Committed records come first, in insertion order, followed by
    /// this context's staged inserts; staged deletes are invisible.
    /// Sorting (if requested) is applied before the fetch limit.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SchemaViolation`] if the model is not in
    /// the container's schema, or a codec error if a stored payload no
    /// longer decodes as `T`.
    pub fn fetch<T: Model>(&self, request: &FetchRequest<T>) -> EngineResult<Vec<Stored<T>>> {
        let mut results = self.visible_records(request)?;
        if let Some(comparator) = request.comparator() {
            results.sort_by(|a, b| comparator(&a.value, &b.value));
        }
        if let Some(limit) = request.fetch_limit() {
            results.truncate(limit);
        }
        Ok(results)
    }

    /// Counts records matching the request without materializing them.
    ///
    /// The count honors the predicate but ignores any fetch limit.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Context::fetch`].
    pub fn fetch_count<T: Model>(&self, request: &FetchRequest<T>) -> EngineResult<usize> {
        Ok(self.visible_records(request)?.len())
    }

    /// Deletes every record of the given model, bypassing staging.
    ///
    /// This is the engine's bulk-delete primitive. Staged operations
    /// touching the model are dropped as well.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SchemaViolation`] for models outside the
    /// schema, or the store's error if the erase fails.
    pub fn delete_all(&mut self, model: &str) -> EngineResult<()> {
        self.ensure_in_schema(model)?;
        self.staged.retain(|op| op.id().model() != model);
        self.container.primary_store().delete_all(model)
    }

    /// Decodes the records visible to this context that match `request`.
    fn visible_records<T: Model>(
        &self,
        request: &FetchRequest<T>,
    ) -> EngineResult<Vec<Stored<T>>> {
        self.ensure_in_schema(T::MODEL_NAME)?;

        let staged_deletes: HashSet<&RecordId> = self
            .staged
            .iter()
            .filter_map(|op| match op {
                StagedOp::Delete { id } => Some(id),
                StagedOp::Insert { .. } => None,
            })
            .collect();

        let mut results = Vec::new();
        for row in self.container.primary_store().rows(T::MODEL_NAME) {
            if staged_deletes.contains(&row.id) {
                continue;
            }
            let value: T = decode_payload(&row.payload)?;
            if request.matches(&value) {
                results.push(Stored { id: row.id, value });
            }
        }
        for op in &self.staged {
            if let StagedOp::Insert { id, payload } = op {
                if id.model() != T::MODEL_NAME {
                    continue;
                }
                let value: T = decode_payload(payload)?;
                if request.matches(&value) {
                    results.push(Stored {
                        id: id.clone(),
                        value,
                    });
                }
            }
        }
        Ok(results)
    }

    fn ensure_in_schema(&self, model: &str) -> EngineResult<()> {
        if !self.container.schema().contains(model) {
            return Err(EngineError::schema_violation(model));
        }
        Ok(())
    }
}
