//! Persistent record identifiers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// URI scheme used by the identifier wire form.
const URI_SCHEME: &str = "x-store://";

/// An opaque, per-record identifier issued by the engine.
///
/// A `RecordId` binds a record to the physical store that holds it. Its
/// textual form is a URI, `x-store://<store-uuid>/<Model>/p<N>`, where
/// `<N>` is the record's 1-based insertion ordinal within its
/// collection. The URI layout is an engine-internal contract: it is not
/// guaranteed stable across engine versions, and callers must not treat
/// it as a primary key.
///
/// On the wire (and in the store file) the identifier serializes as a
/// nested document, `{"implementation": {"uri_representation": ...}}`,
/// mirroring how the engine's own session book-keeping stores it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId {
    store_uuid: Uuid,
    model: String,
    ordinal: u64,
}

impl RecordId {
    /// Creates an identifier for the given store, model, and ordinal.
    ///
    /// Ordinals are 1-based; issuing an ordinal of 0 is an engine bug.
    #[must_use]
    pub(crate) fn new(store_uuid: Uuid, model: impl Into<String>, ordinal: u64) -> Self {
        debug_assert!(ordinal >= 1, "record ordinals are 1-based");
        Self {
            store_uuid,
            model: model.into(),
            ordinal,
        }
    }

    /// Returns the UUID of the store that issued this identifier.
    #[must_use]
    pub fn store_uuid(&self) -> Uuid {
        self.store_uuid
    }

    /// Returns the model name the identifier belongs to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the engine-internal URI form of the identifier.
    #[must_use]
    pub fn uri_representation(&self) -> String {
        format!(
            "{URI_SCHEME}{}/{}/p{}",
            self.store_uuid, self.model, self.ordinal
        )
    }

    /// Parses an identifier back from its URI form.
    ///
    /// Returns `None` if the string does not match the current layout.
    #[must_use]
    pub(crate) fn from_uri(uri: &str) -> Option<Self> {
        let rest = uri.strip_prefix(URI_SCHEME)?;
        let mut parts = rest.splitn(3, '/');
        let store_uuid = Uuid::parse_str(parts.next()?).ok()?;
        let model = parts.next()?;
        let ordinal = parts.next()?.strip_prefix('p')?.parse::<u64>().ok()?;
        if model.is_empty() || ordinal == 0 {
            return None;
        }
        Some(Self::new(store_uuid, model, ordinal))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri_representation())
    }
}

/// Wire shape of the identifier's inner document.
#[derive(Serialize, Deserialize)]
struct IdImplementation {
    uri_representation: String,
}

/// Wire shape of the identifier.
#[derive(Serialize, Deserialize)]
struct IdEncoding {
    implementation: IdImplementation,
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        IdEncoding {
            implementation: IdImplementation {
                uri_representation: self.uri_representation(),
            },
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoding = IdEncoding::deserialize(deserializer)?;
        Self::from_uri(&encoding.implementation.uri_representation).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "unrecognized identifier encoding: {}",
                encoding.implementation.uri_representation
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_roundtrip() {
        let id = RecordId::new(Uuid::new_v4(), "Credential", 7);
        let parsed = RecordId::from_uri(&id.uri_representation()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn rejects_foreign_uri() {
        assert!(RecordId::from_uri("x-other://abc/Credential/p1").is_none());
        assert!(RecordId::from_uri("x-store://not-a-uuid/Credential/p1").is_none());
    }

    #[test]
    fn serializes_as_nested_document() {
        let id = RecordId::new(Uuid::nil(), "Credential", 3);
        let value = serde_json::to_value(&id).unwrap();
        let uri = value["implementation"]["uri_representation"]
            .as_str()
            .unwrap();
        assert!(uri.ends_with("/Credential/p3"));
        let back: RecordId = serde_json::from_value(value).unwrap();
        assert_eq!(back, id);
    }
}
