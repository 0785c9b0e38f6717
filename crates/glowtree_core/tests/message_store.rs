use chrono::{TimeZone, Utc};
use glowtree_core::db::open_db;
use glowtree_core::repo::message_store::MESSAGES_KEY;
use glowtree_core::{
    KeyValueStorage, MemoryStorage, Message, MessageStore, SqliteStorage, StorageError,
    StoreError,
};

fn message(id: &str, year: i32, month: u32, day: u32, h: u32, m: u32, s: u32) -> Message {
    let created_at = Utc.with_ymd_and_hms(year, month, day, h, m, s).unwrap();
    Message::with_id(id, "Alice", format!("note {id}"), created_at).unwrap()
}

#[test]
fn append_and_lookup_roundtrip() {
    let storage = MemoryStorage::new();
    let store = MessageStore::new(&storage);

    let original = message("m1", 2025, 6, 1, 12, 0, 0);
    store.append(&original).unwrap();

    assert_eq!(store.count(), 1);
    assert_eq!(store.by_id("m1"), Some(original));
    assert_eq!(store.by_id("missing"), None);
}

#[test]
fn all_preserves_insertion_order() {
    let storage = MemoryStorage::new();
    let store = MessageStore::new(&storage);
    for id in ["c", "a", "b"] {
        store.append(&message(id, 2025, 1, 1, 0, 0, 0)).unwrap();
    }

    let ids: Vec<String> = store.all().iter().map(|m| m.id().to_string()).collect();
    assert_eq!(ids, ["c", "a", "b"]);
}

#[test]
fn empty_store_reads_as_empty() {
    let storage = MemoryStorage::new();
    let store = MessageStore::new(&storage);
    assert!(store.all().is_empty());
    assert_eq!(store.count(), 0);
}

#[test]
fn duplicate_id_is_rejected() {
    let storage = MemoryStorage::new();
    let store = MessageStore::new(&storage);
    store.append(&message("m1", 2025, 1, 1, 0, 0, 0)).unwrap();

    let err = store.append(&message("m1", 2025, 2, 2, 0, 0, 0)).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateId(ref id) if id == "m1"));
    assert_eq!(store.count(), 1);
}

#[test]
fn by_year_splits_on_new_year_boundary() {
    let storage = MemoryStorage::new();
    let store = MessageStore::new(&storage);
    let last_second = message("eve", 2024, 12, 31, 23, 59, 59);
    let first_second = message("day", 2025, 1, 1, 0, 0, 0);
    let later = message("mid", 2025, 7, 4, 10, 30, 0);
    for m in [&last_second, &first_second, &later] {
        store.append(m).unwrap();
    }

    assert_eq!(store.by_year(2024), vec![last_second]);
    assert_eq!(store.by_year(2025), vec![first_second, later]);
    assert!(store.by_year(2023).is_empty());
}

#[test]
fn quota_failure_reports_error_and_keeps_previous_contents() {
    let storage = MemoryStorage::with_quota(900);
    let store = MessageStore::new(&storage);
    store.append(&message("m1", 2025, 1, 1, 0, 0, 0)).unwrap();

    let mut failure = None;
    for index in 2..50 {
        let before = storage.raw(MESSAGES_KEY);
        let count_before = store.count();
        if let Err(err) = store.append(&message(&format!("m{index}"), 2025, 1, 1, 0, 0, 0)) {
            failure = Some((err, before, count_before));
            break;
        }
    }

    let (err, before, count_before) = failure.expect("quota should eventually reject a write");
    assert!(matches!(
        err,
        StoreError::Storage(StorageError::QuotaExceeded { .. })
    ));
    assert_eq!(storage.raw(MESSAGES_KEY), before);
    assert_eq!(store.count(), count_before);
    assert!(count_before >= 1);
}

#[test]
fn corrupt_blob_reads_empty_but_is_never_overwritten() {
    let storage = MemoryStorage::new();
    storage.set(MESSAGES_KEY, "{not json").unwrap();
    let store = MessageStore::new(&storage);

    assert!(store.all().is_empty());
    assert_eq!(store.by_id("m1"), None);

    let err = store
        .append(&message("m1", 2025, 1, 1, 0, 0, 0))
        .unwrap_err();
    assert!(matches!(err, StoreError::CorruptBlob(_)));
    assert_eq!(storage.raw(MESSAGES_KEY).as_deref(), Some("{not json"));
}

#[test]
fn invalid_record_degrades_to_empty_store() {
    let storage = MemoryStorage::new();
    let blob = r#"[{"id":"m1","author":"","text":"hi","created_at":"2025-01-01T00:00:00Z"}]"#;
    storage.set(MESSAGES_KEY, blob).unwrap();
    let store = MessageStore::new(&storage);
    assert_eq!(store.count(), 0);

    assert!(store.append(&message("m2", 2025, 1, 1, 0, 0, 0)).is_err());
    assert_eq!(storage.raw(MESSAGES_KEY).as_deref(), Some(blob));
}

#[test]
fn records_over_submission_limits_survive_append() {
    let storage = MemoryStorage::new();
    let long_text = "x".repeat(250);
    let long_author = "a".repeat(40);
    let blob = serde_json::json!([
        {"id": "old1", "author": "Alice", "text": "hi", "created_at": "2024-01-01T00:00:00Z"},
        {"id": "old2", "author": long_author, "text": long_text, "created_at": "2024-02-01T00:00:00Z"},
    ]);
    storage.set(MESSAGES_KEY, &blob.to_string()).unwrap();
    let store = MessageStore::new(&storage);
    assert_eq!(store.count(), 2);

    store.append(&message("new", 2025, 1, 1, 0, 0, 0)).unwrap();

    let stored = store.all();
    let ids: Vec<&str> = stored.iter().map(|m| m.id()).collect();
    assert_eq!(ids, ["old1", "old2", "new"]);
    assert_eq!(stored[1].text(), long_text);
    assert_eq!(stored[1].author(), long_author);
}

#[test]
fn clear_empties_the_store() {
    let storage = MemoryStorage::new();
    let store = MessageStore::new(&storage);
    store.append(&message("m1", 2025, 1, 1, 0, 0, 0)).unwrap();

    store.clear().unwrap();
    assert_eq!(store.count(), 0);
    assert_eq!(storage.raw(MESSAGES_KEY), None);
}

#[test]
fn sqlite_storage_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("glowtree.sqlite3");
    let original = message("m1", 2025, 5, 5, 5, 5, 5);

    {
        let conn = open_db(&path).unwrap();
        let storage = SqliteStorage::new(&conn);
        MessageStore::new(&storage).append(&original).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let storage = SqliteStorage::new(&conn);
    let store = MessageStore::new(&storage);
    assert_eq!(store.all(), vec![original]);
}
