//! Session lifecycle and commit discipline.

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;
use storekit_core::{session, FetchRequest, StoreDescriptor};
use storekit_testkit::prelude::*;

fn john() -> Credential {
    Credential::new("John", "abc123")
}

#[test]
fn commit_if_dirty_is_idempotent() {
    with_test_store(|db| {
        let container = db.container().unwrap();
        let mut ctx = session::open_context(db).unwrap();

        session::insert(&mut ctx, &john(), false).unwrap();
        let before = container.commit_sequence();
        session::commit_if_dirty(&mut ctx).unwrap();
        assert_eq!(container.commit_sequence(), before + 1);

        // No intervening mutation: the second call must not commit.
        session::commit_if_dirty(&mut ctx).unwrap();
        assert_eq!(container.commit_sequence(), before + 1);
    });
}

#[test]
fn commit_if_dirty_on_clean_context_is_a_no_op() {
    with_test_store(|db| {
        let container = db.container().unwrap();
        let mut ctx = session::open_context(db).unwrap();
        let before = container.commit_sequence();
        session::commit_if_dirty(&mut ctx).unwrap();
        session::commit_if_dirty(&mut ctx).unwrap();
        assert_eq!(container.commit_sequence(), before);
    });
}

#[test]
fn insert_then_query_round_trip() {
    with_test_store(|db| {
        let mut ctx = session::open_context(db).unwrap();
        session::insert(&mut ctx, &john(), true).unwrap();

        let request = FetchRequest::<Credential>::new().filter(|c| c.user_name == "John");
        let results = ctx.fetch(&request).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].password, "abc123");
    });
}

#[test]
fn delete_round_trip() {
    with_test_store(|db| {
        let mut ctx = session::open_context(db).unwrap();
        session::insert(&mut ctx, &john(), true).unwrap();

        let all = FetchRequest::<Credential>::new();
        let fetched = ctx.fetch(&all).unwrap();
        session::delete(&mut ctx, &fetched[0], true).unwrap();
        assert_eq!(ctx.fetch_count(&all).unwrap(), 0);
    });
}

#[test]
fn batched_inserts_flush_once() {
    with_test_store(|db| {
        let container = db.container().unwrap();
        let mut ctx = session::open_context(db).unwrap();

        for i in 0..3 {
            let record = Credential::new(format!("user{i}"), "pw");
            session::insert(&mut ctx, &record, false).unwrap();
        }

        // Nothing visible to a sibling context before the flush.
        let reader = session::open_context(db).unwrap();
        let all = FetchRequest::<Credential>::new();
        assert_eq!(reader.fetch_count(&all).unwrap(), 0);

        let before = container.commit_sequence();
        session::commit_if_dirty(&mut ctx).unwrap();
        assert_eq!(container.commit_sequence(), before + 1);
        assert_eq!(reader.fetch_count(&all).unwrap(), 3);
    });
}

#[test]
fn persistent_file_tracking() {
    let db = TestStore::on_disk();
    assert!(session::has_persistent_file(&db));

    let path = db.store_path().unwrap();
    assert!(session::remove_store_file(&path));
    assert!(!session::has_persistent_file(&db));
    // Second removal has nothing left to do.
    assert!(!session::remove_store_file(&path));
}

#[test]
fn in_memory_store_has_no_persistent_file() {
    let db = TestStore::in_memory();
    assert!(!session::has_persistent_file(&db));
}

#[test]
fn background_context_sees_committed_data() {
    let db: Arc<TestStore> = Arc::new(TestStore::on_disk());
    {
        let mut ctx = session::open_context(db.as_ref()).unwrap();
        session::insert(&mut ctx, &john(), true).unwrap();
    }

    let (tx, rx) = mpsc::channel();
    session::with_background_context(db.clone(), move |ctx| {
        let count = ctx
            .and_then(|ctx| Ok(ctx.fetch_count(&FetchRequest::<Credential>::new())?))
            .unwrap_or(usize::MAX);
        tx.send(count).unwrap();
    });

    let count = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(count, 1);
}
