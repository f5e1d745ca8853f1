//! Ordinal-index derivation from persistent identifiers.
//!
//! The engine's identifiers carry their collection position inside an
//! internal URI-shaped encoding. Deriving an index from it is
//! best-effort telemetry: useful for diagnostics and ordering checks,
//! never a stable primary key. Every missing-data step yields `None`;
//! only a position marker that is present but fails to parse as a
//! number is a hard error, because that distinguishes "no data" from
//! "the identifier encoding changed under us".

use crate::error::{UtilError, UtilResult};
use storekit_engine::{Context, FetchRequest, Model, Stored};

/// Field holding the identifier's inner document.
const IMPLEMENTATION_FIELD: &str = "implementation";
/// Field holding the URI form inside the inner document.
const URI_FIELD: &str = "uri_representation";
/// Separator preceding the 1-based position in the URI path.
const POSITION_MARKER: &str = "/p";

/// Fetches the first record matching the request.
///
/// The request's fetch limit is forced to 1 regardless of what the
/// caller configured, so existence checks never materialize large
/// result sets.
///
/// # Errors
///
/// Returns the engine's fetch error.
pub fn first_match<T: Model>(
    context: &Context,
    request: &FetchRequest<T>,
) -> UtilResult<Option<Stored<T>>> {
    let limited = request.clone().limit(1);
    Ok(context.fetch(&limited)?.into_iter().next())
}

/// Derives the zero-based ordinal of the first record matching the
/// request.
///
/// The derivation walks the identifier's engine-internal encoding:
/// serialize the identifier to its tree form, read the URI at
/// `implementation.uri_representation`, take the numeric suffix after
/// the final `/p` marker, and convert the engine's 1-based position to
/// zero-based.
///
/// Returns `None` when there is no matching record or when any part of
/// the encoding is simply absent.
///
/// # Errors
///
/// Returns [`UtilError::IdentifierDecode`] when the position marker is
/// present but its suffix is not a valid position, the signal that the
/// engine's identifier contract changed.
pub fn first_match_index<T: Model>(
    context: &Context,
    request: &FetchRequest<T>,
) -> UtilResult<Option<u64>> {
    let Some(record) = first_match(context, request)? else {
        return Ok(None);
    };
    let Ok(encoded) = serde_json::to_value(record.record_id()) else {
        return Ok(None);
    };
    derive_ordinal(&encoded)
}

/// Extracts the zero-based ordinal from an identifier's tree encoding.
pub(crate) fn derive_ordinal(encoded: &serde_json::Value) -> UtilResult<Option<u64>> {
    let Some(uri) = encoded
        .get(IMPLEMENTATION_FIELD)
        .and_then(|inner| inner.get(URI_FIELD))
        .and_then(|uri| uri.as_str())
    else {
        return Ok(None);
    };
    let Some((_, suffix)) = uri.rsplit_once(POSITION_MARKER) else {
        return Ok(None);
    };
    let position: u64 = suffix
        .parse()
        .map_err(|_| UtilError::identifier_decode(uri))?;
    // Positions are 1-based; 0 can only mean the contract changed.
    position
        .checked_sub(1)
        .map(Some)
        .ok_or_else(|| UtilError::identifier_decode(uri))
}

/// Fetches every record matching the request.
///
/// # Errors
///
/// Returns the engine's fetch error.
pub fn fetch_all<T: Model>(
    context: &Context,
    request: &FetchRequest<T>,
) -> UtilResult<Vec<Stored<T>>> {
    Ok(context.fetch(request)?)
}

/// Counts records matching the request without fetching them.
///
/// # Errors
///
/// Returns the engine's fetch error.
pub fn fetch_count<T: Model>(context: &Context, request: &FetchRequest<T>) -> UtilResult<usize> {
    Ok(context.fetch_count(request)?)
}

/// Fetches the record with the greatest value of `key`.
///
/// Useful for "latest change" checks: sort descending by the key and
/// take the single first record.
///
/// # Errors
///
/// Returns the engine's fetch error.
pub fn last_by<T, K, F>(context: &Context, key: F) -> UtilResult<Option<Stored<T>>>
where
    T: Model,
    K: Ord,
    F: Fn(&T) -> K + Send + Sync + 'static,
{
    let request = FetchRequest::<T>::new()
        .sort_by(move |a, b| key(b).cmp(&key(a)))
        .limit(1);
    Ok(context.fetch(&request)?.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn derives_zero_based_ordinal() {
        let encoded = json!({
            "implementation": {
                "uri_representation": "x-store://0000/Credential/p1"
            }
        });
        assert_eq!(derive_ordinal(&encoded).unwrap(), Some(0));
    }

    #[test]
    fn missing_marker_is_absent_data() {
        let encoded = json!({
            "implementation": {
                "uri_representation": "x-store://0000/Credential"
            }
        });
        assert_eq!(derive_ordinal(&encoded).unwrap(), None);
    }

    #[test]
    fn missing_uri_field_is_absent_data() {
        let encoded = json!({ "implementation": {} });
        assert_eq!(derive_ordinal(&encoded).unwrap(), None);
    }

    #[test]
    fn malformed_suffix_is_a_hard_error() {
        let encoded = json!({
            "implementation": {
                "uri_representation": "x-store://0000/Credential/pXYZ"
            }
        });
        assert!(matches!(
            derive_ordinal(&encoded),
            Err(UtilError::IdentifierDecode { .. })
        ));
    }

    #[test]
    fn zero_position_is_a_hard_error() {
        let encoded = json!({
            "implementation": {
                "uri_representation": "x-store://0000/Credential/p0"
            }
        });
        assert!(matches!(
            derive_ordinal(&encoded),
            Err(UtilError::IdentifierDecode { .. })
        ));
    }
}
