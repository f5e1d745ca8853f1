//! Store-file metadata behavior.

use std::collections::BTreeMap;
use std::path::Path;
use storekit_core::{metadata, session, FetchRequest, UtilError};
use storekit_engine::META_STORE_IDENTIFIER;
use storekit_testkit::prelude::*;
use tempfile::TempDir;

fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn fresh_store_exposes_only_string_entries() {
    with_test_store(|db| {
        let read = metadata::descriptor_metadata(db);
        // The engine seeds the store identifier (a string) and the
        // format version (an integer); only the string survives the
        // advisory read.
        assert!(read.contains_key(META_STORE_IDENTIFIER));
        assert!(!read.contains_key("format_version"));
    });
}

#[test]
fn metadata_write_does_not_touch_records() {
    with_test_store(|db| {
        let mut ctx = session::open_context(db).unwrap();
        session::insert(&mut ctx, &Credential::new("John", "abc123"), false).unwrap();
        session::insert(&mut ctx, &Note::new("unrelated"), false).unwrap();
        session::commit_if_dirty(&mut ctx).unwrap();

        metadata::set_descriptor_metadata(db, map(&[("sync_peer", "peer-1")])).unwrap();

        let ctx = session::open_context(db).unwrap();
        assert_eq!(ctx.fetch_count(&FetchRequest::<Credential>::new()).unwrap(), 1);
        assert_eq!(ctx.fetch_count(&FetchRequest::<Note>::new()).unwrap(), 1);
        assert_eq!(
            metadata::descriptor_metadata(db).get("sync_peer").map(String::as_str),
            Some("peer-1")
        );
    });
}

#[test]
fn second_write_replaces_the_whole_map() {
    with_test_store(|db| {
        metadata::set_descriptor_metadata(db, map(&[("a", "1"), ("b", "2")])).unwrap();
        metadata::set_descriptor_metadata(db, map(&[("b", "3")])).unwrap();

        let read = metadata::descriptor_metadata(db);
        assert_eq!(read.get("b").map(String::as_str), Some("3"));
        // "a" was not carried over by the caller, so it is gone.
        assert!(!read.contains_key("a"));
        // Even the engine-seeded entries are replaced; carrying keys
        // forward is entirely the caller's job.
        assert!(!read.contains_key(META_STORE_IDENTIFIER));
    });
}

#[test]
fn metadata_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shared.store");

    let writer = TestStore::at_path(&path);
    metadata::set_descriptor_metadata(&writer, map(&[("last_change", "c-42")])).unwrap();
    drop(writer);

    let reader = TestStore::at_path(&path);
    assert_eq!(
        metadata::descriptor_metadata(&reader)
            .get("last_change")
            .map(String::as_str),
        Some("c-42")
    );
}

#[test]
fn read_of_unknown_store_is_empty_not_an_error() {
    with_test_store(|db| {
        let ctx = session::open_context(db).unwrap();
        let read = metadata::metadata(&ctx, Path::new("/nowhere/missing.store"));
        assert!(read.is_empty());
    });
}

#[test]
fn write_to_unknown_store_is_surfaced() {
    with_test_store(|db| {
        let mut ctx = session::open_context(db).unwrap();
        let result = metadata::set_metadata(
            &mut ctx,
            Path::new("/nowhere/missing.store"),
            map(&[("k", "v")]),
        );
        assert!(matches!(result, Err(UtilError::MetadataWrite { .. })));
    });
}

#[test]
fn in_memory_store_reads_empty_and_rejects_writes() {
    let db = TestStore::in_memory();
    assert!(metadata::descriptor_metadata(&db).is_empty());
    assert!(matches!(
        metadata::set_descriptor_metadata(&db, map(&[("k", "v")])),
        Err(UtilError::MetadataWrite { .. })
    ));
}
