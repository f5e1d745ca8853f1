//! # storekit
//!
//! A safety and ergonomics layer over an embedded, transactional
//! document store. Three operationally dangerous areas get a safe,
//! explicit surface:
//!
//! - **Sessions** ([`session`]): one context per logical operation,
//!   autosave off, and a single idempotent commit-if-dirty that all
//!   mutations funnel through.
//! - **Ordinal indices** ([`index`]): best-effort translation of an
//!   opaque persistent identifier into a zero-based position inside its
//!   collection, by decoding the identifier's internal URI encoding.
//! - **Store-file metadata** ([`metadata`]): string key/value state
//!   attached to the physical store file, outside the record
//!   transaction system and the natural hook for sync bookkeeping.
//! - **Reset** ([`reset`]): a best-effort, multi-stage, irreversible
//!   wipe of records, container, and backing files, reported as a
//!   structured per-stage outcome.
//!
//! Databases are described by a caller-implemented
//! [`StoreDescriptor`](descriptor::StoreDescriptor); every operation
//! takes its descriptor or context explicitly; there is no ambient
//! default database.
//!
//! ## Example
//!
//! ```rust,ignore
//! let db: Arc<dyn StoreDescriptor> = Arc::new(AppStore::new(path));
//!
//! let mut ctx = session::open_context(db.as_ref())?;
//! session::insert(&mut ctx, &credential, true)?;
//!
//! let found = index::first_match(
//!     &ctx,
//!     &FetchRequest::<Credential>::new().filter(|c| c.user_name == "John"),
//! )?;
//!
//! let report = reset::reset_store(db.as_ref());
//! assert!(report.is_complete());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod descriptor;
pub mod error;
pub mod index;
pub mod metadata;
pub mod paths;
pub mod reset;
pub mod session;

pub use descriptor::{ContainerCell, StoreDescriptor};
pub use error::{UtilError, UtilResult};
pub use reset::{ModelWipe, ResetReport, ResetState, StageOutcome, StoreDestruction};

// The engine surface callers need alongside this crate.
pub use storekit_engine::{
    Container, Context, FetchRequest, Model, RecordId, Schema, StoreConfig, StoreLocation, Stored,
};
