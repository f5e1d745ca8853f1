//! Ordinal-index derivation and fetch helpers.

use proptest::prelude::*;
use storekit_core::{index, session, FetchRequest};
use storekit_testkit::prelude::*;

#[test]
fn first_match_returns_at_most_one_record() {
    with_test_store(|db| {
        let mut ctx = session::open_context(db).unwrap();
        for i in 0..4 {
            let record = Credential::new("shared", format!("pw{i}"));
            session::insert(&mut ctx, &record, false).unwrap();
        }
        session::commit_if_dirty(&mut ctx).unwrap();

        let request = FetchRequest::<Credential>::new().filter(|c| c.user_name == "shared");
        // Four records satisfy the predicate; first-match must cap at one,
        // even though the caller asked for a larger limit.
        let generous = request.clone().limit(10);
        assert!(index::first_match(&ctx, &generous).unwrap().is_some());
        assert_eq!(ctx.fetch(&request).unwrap().len(), 4);
        assert_eq!(ctx.fetch(&generous).unwrap().len(), 4);

        let matched = index::first_match(&ctx, &generous).unwrap().unwrap();
        assert_eq!(matched.password, "pw0");
    });
}

#[test]
fn first_match_empty_when_nothing_matches() {
    with_test_store(|db| {
        let ctx = session::open_context(db).unwrap();
        let request = FetchRequest::<Credential>::new().filter(|c| c.user_name == "ghost");
        assert!(index::first_match(&ctx, &request).unwrap().is_none());
        assert!(index::first_match_index(&ctx, &request).unwrap().is_none());
    });
}

#[test]
fn first_record_derives_index_zero() {
    with_test_store(|db| {
        let mut ctx = session::open_context(db).unwrap();
        session::insert(&mut ctx, &Credential::new("first", "pw"), true).unwrap();

        let request = FetchRequest::<Credential>::new().filter(|c| c.user_name == "first");
        assert_eq!(index::first_match_index(&ctx, &request).unwrap(), Some(0));
    });
}

#[test]
fn distinct_records_derive_distinct_increasing_indices() {
    with_test_store(|db| {
        let mut ctx = session::open_context(db).unwrap();
        let mut indices = Vec::new();
        for name in ["a", "b", "c", "d"] {
            session::insert(&mut ctx, &Credential::new(name, "pw"), true).unwrap();
            let request =
                FetchRequest::<Credential>::new().filter(move |c| c.user_name == name);
            indices.push(index::first_match_index(&ctx, &request).unwrap().unwrap());
        }

        assert_eq!(indices[0], 0);
        let mut sorted = indices.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted, indices, "indices must be distinct and increasing");
    });
}

#[test]
fn count_matches_fetch_for_fixed_sizes() {
    for n in [0usize, 1, 7] {
        with_test_store(|db| {
            let mut ctx = session::open_context(db).unwrap();
            for i in 0..n {
                let record = Credential::new(format!("user{i}"), "pw");
                session::insert(&mut ctx, &record, false).unwrap();
            }
            session::commit_if_dirty(&mut ctx).unwrap();

            let all = FetchRequest::<Credential>::new();
            assert_eq!(
                index::fetch_count(&ctx, &all).unwrap(),
                index::fetch_all(&ctx, &all).unwrap().len()
            );
            assert_eq!(index::fetch_count(&ctx, &all).unwrap(), n);
        });
    }
}

#[test]
fn last_by_returns_greatest_key() {
    with_test_store(|db| {
        let mut ctx = session::open_context(db).unwrap();
        for revision in [1u64, 5, 3] {
            let note = Note {
                body: format!("rev {revision}"),
                revision,
            };
            session::insert(&mut ctx, &note, false).unwrap();
        }
        session::commit_if_dirty(&mut ctx).unwrap();

        let last = index::last_by(&ctx, |note: &Note| note.revision)
            .unwrap()
            .unwrap();
        assert_eq!(last.revision, 5);
    });
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn count_matches_fetch_for_any_batch(batch in credential_batch(12)) {
        with_test_store(|db| {
            let mut ctx = session::open_context(db).unwrap();
            for record in &batch {
                session::insert(&mut ctx, record, false).unwrap();
            }
            session::commit_if_dirty(&mut ctx).unwrap();

            let all = FetchRequest::<Credential>::new();
            prop_assert_eq!(
                index::fetch_count(&ctx, &all).unwrap(),
                index::fetch_all(&ctx, &all).unwrap().len()
            );

            let filtered = FetchRequest::<Credential>::new()
                .filter(|c| c.user_name.starts_with('a'));
            prop_assert_eq!(
                index::fetch_count(&ctx, &filtered).unwrap(),
                index::fetch_all(&ctx, &filtered).unwrap().len()
            );
            Ok(())
        })?;
    }
}
