//! Record model trait.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Trait for types that can be persisted as records.
///
/// A model is a plain serde-serializable struct plus a stable collection
/// name. The engine stores one collection per model name and encodes
/// record payloads as canonical CBOR.
///
/// # Example
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use storekit_engine::Model;
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct Credential {
///     user_name: String,
///     password: String,
/// }
///
/// impl Model for Credential {
///     const MODEL_NAME: &'static str = "Credential";
/// }
/// ```
pub trait Model: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Stable name of the model's collection.
    ///
    /// This name must appear in the schema of every container that
    /// persists the model, and must not change once data exists.
    const MODEL_NAME: &'static str;
}
