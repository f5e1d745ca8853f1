//! # storekit testkit
//!
//! Test utilities for storekit:
//! - Fixture models and descriptors with automatic cleanup
//! - Property-based generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storekit_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_store() {
//!     with_test_store(|db| {
//!         // ... test operations
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::init_test_logging;
}

pub use fixtures::*;
pub use generators::*;

/// Installs a test-friendly tracing subscriber.
///
/// Safe to call from every test; only the first call installs. Filter
/// with `RUST_LOG` as usual, e.g. `RUST_LOG=storekit_core=debug`.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
