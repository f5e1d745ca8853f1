//! # storekit engine
//!
//! Embedded transactional document store consumed by `storekit_core`.
//!
//! This crate provides:
//! - Typed record collections encoded as canonical CBOR
//! - Predicate-based fetches with count and fetch-limit support
//! - A staging [`Context`] with an explicit save and a dirty bit
//! - A [`Coordinator`] owning physical stores: enumeration, store-file
//!   metadata, and destruction
//! - Persistent [`RecordId`]s carrying an engine-internal URI encoding
//!
//! ## Querying
//!
//! There is no query DSL. Fetches take host-language closures:
//!
//! ```rust,ignore
//! let request = FetchRequest::<Credential>::new()
//!     .filter(|c| c.user_name == "John");
//! let matches = context.fetch(&request)?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod container;
mod context;
mod coordinator;
mod error;
mod fetch;
mod model;
mod record_id;
mod schema;
mod store;

pub use config::{StoreConfig, StoreLocation};
pub use container::Container;
pub use context::{Context, Stored};
pub use coordinator::Coordinator;
pub use error::{EngineError, EngineResult};
pub use fetch::{Comparator, FetchRequest, Predicate};
pub use model::Model;
pub use record_id::RecordId;
pub use schema::Schema;
pub use store::{
    MetadataValue, PersistentStore, StoreKind, META_FORMAT_VERSION, META_STORE_IDENTIFIER,
};
