//! Property-based test generators.

use crate::fixtures::Credential;
use proptest::prelude::*;

/// Strategy producing a single credential.
pub fn credential_strategy() -> impl Strategy<Value = Credential> {
    ("[a-z]{1,12}", "[a-zA-Z0-9]{4,16}")
        .prop_map(|(user_name, password)| Credential::new(user_name, password))
}

/// Strategy producing a batch of up to `max` credentials.
pub fn credential_batch(max: usize) -> impl Strategy<Value = Vec<Credential>> {
    prop::collection::vec(credential_strategy(), 0..=max)
}
