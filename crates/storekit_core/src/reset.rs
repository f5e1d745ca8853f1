//! Best-effort destructive reset of a database.
//!
//! A reset runs three independent stages: wipe every declared model's
//! records, run the container's own full erase, then physically destroy
//! each resolvable store. No stage depends on the success of the
//! previous one, and there is no rollback: this is a one-way operation
//! meant for test teardown and local-development schema resets, never
//! for production migration. Running a reset concurrently with ordinary
//! reads or writes against the same store is undefined behavior.
//!
//! Every stage's outcome lands in a [`ResetReport`] so callers (and
//! tests) can assert on exactly what happened instead of scraping logs.

use crate::descriptor::StoreDescriptor;
use std::sync::Arc;
use storekit_engine::{Container, StoreKind};

/// Outcome of a single reset stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage completed.
    Ok,
    /// The stage did not apply and was skipped.
    Skipped {
        /// Why the stage was skipped.
        reason: String,
    },
    /// The stage was attempted and failed.
    Failed {
        /// Why the stage failed.
        reason: String,
    },
}

impl StageOutcome {
    /// Returns true if the stage completed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Returns true if the stage was attempted and failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    fn failed(reason: impl std::fmt::Display) -> Self {
        Self::Failed {
            reason: reason.to_string(),
        }
    }

    fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }
}

/// Terminal state of a reset.
///
/// There is no rollback transition; both variants are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetState {
    /// No container could be obtained; nothing was attempted.
    Abandoned,
    /// All stages ran. `partial` is true if any stage failed.
    StoresDestroyed {
        /// Whether any stage reported a failure.
        partial: bool,
    },
}

/// Per-model outcome of the record-wipe stage.
#[derive(Debug, Clone)]
pub struct ModelWipe {
    /// The model whose records were wiped.
    pub model: String,
    /// The wipe outcome.
    pub outcome: StageOutcome,
}

/// Per-store outcome of the destruction stage.
#[derive(Debug, Clone)]
pub struct StoreDestruction {
    /// Display label of the store (path, or its UUID when in-memory).
    pub store: String,
    /// The destruction outcome.
    pub outcome: StageOutcome,
}

/// Structured report of one reset run.
#[derive(Debug, Clone)]
pub struct ResetReport {
    /// Outcome of obtaining the container.
    pub container: StageOutcome,
    /// Stage 1: per-model record wipes, in declaration order.
    pub record_wipe: Vec<ModelWipe>,
    /// Stage 2: the container-native full erase.
    pub container_erase: StageOutcome,
    /// Stage 3: per-store physical destruction.
    pub store_destruction: Vec<StoreDestruction>,
    /// Terminal state the reset ended in.
    pub state: ResetState,
}

impl ResetReport {
    /// Returns true if every attempted stage completed.
    ///
    /// Stores skipped for lack of a backing path do not count against
    /// completeness; they have nothing on disk to destroy.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.state, ResetState::StoresDestroyed { partial: false })
    }

    fn abandoned(reason: impl std::fmt::Display) -> Self {
        Self {
            container: StageOutcome::failed(reason),
            record_wipe: Vec::new(),
            container_erase: StageOutcome::skipped("reset abandoned"),
            store_destruction: Vec::new(),
            state: ResetState::Abandoned,
        }
    }
}

/// Resets a database: wipe records, erase the container, destroy stores.
///
/// Best-effort and not atomic. Per-stage failures are captured in the
/// report and logged; sibling stages still run. The only short-circuit
/// is failing to obtain a container at all, which abandons the whole
/// operation.
pub fn reset_store(descriptor: &dyn StoreDescriptor) -> ResetReport {
    let container = match descriptor.container() {
        Ok(container) => container,
        Err(err) => {
            tracing::warn!(error = %err, "reset abandoned: container unavailable");
            return ResetReport::abandoned(err);
        }
    };

    // Stage 1: one fresh context per model type, never shared.
    let mut record_wipe = Vec::new();
    for model in descriptor.model_names() {
        let outcome = match wipe_model(&container, model) {
            Ok(()) => StageOutcome::Ok,
            Err(err) => {
                tracing::warn!(model, error = %err, "record wipe failed");
                StageOutcome::failed(err)
            }
        };
        record_wipe.push(ModelWipe {
            model: (*model).to_string(),
            outcome,
        });
    }

    // Stage 2: engine-native full erase. Deliberately redundant with
    // stage 1; the per-model and full-erase primitives can leave
    // different residual state behind.
    let container_erase = match container.erase_all_data() {
        Ok(()) => StageOutcome::Ok,
        Err(err) => {
            tracing::warn!(error = %err, "container erase failed");
            StageOutcome::failed(err)
        }
    };

    // Stage 3: destroy every store with a resolvable backing path.
    let coordinator = container.coordinator();
    let mut store_destruction = Vec::new();
    for store in coordinator.persistent_stores() {
        let (label, outcome) = match store.path() {
            None => {
                tracing::warn!(store = %store.uuid(), "store has no backing path, skipping");
                (
                    store.uuid().to_string(),
                    StageOutcome::skipped("no backing path"),
                )
            }
            Some(path) => {
                let label = path.display().to_string();
                let outcome = match coordinator.destroy_store(path, StoreKind::Document) {
                    Ok(()) => StageOutcome::Ok,
                    Err(err) => {
                        tracing::warn!(store = %label, error = %err, "store destruction failed");
                        StageOutcome::failed(err)
                    }
                };
                (label, outcome)
            }
        };
        store_destruction.push(StoreDestruction {
            store: label,
            outcome,
        });
    }

    let partial = record_wipe.iter().any(|wipe| wipe.outcome.is_failed())
        || container_erase.is_failed()
        || store_destruction
            .iter()
            .any(|destruction| destruction.outcome.is_failed());

    ResetReport {
        container: StageOutcome::Ok,
        record_wipe,
        container_erase,
        store_destruction,
        state: ResetState::StoresDestroyed { partial },
    }
}

/// Resets several databases in order.
///
/// A plain sequential fold: no parallelism, and no transactionality
/// across descriptors; each report stands alone.
pub fn reset_stores(descriptors: &[Arc<dyn StoreDescriptor>]) -> Vec<ResetReport> {
    descriptors
        .iter()
        .map(|descriptor| reset_store(descriptor.as_ref()))
        .collect()
}

/// Wipes one model's records on a context of its own.
fn wipe_model(container: &Arc<Container>, model: &str) -> Result<(), storekit_engine::EngineError> {
    let mut context = container.new_context();
    context.set_autosave(false);
    context.delete_all(model)
}
