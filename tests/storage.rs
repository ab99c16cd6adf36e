use drawer_search::error::StorageError;
use drawer_search::storage::{FileStorage, KeyValueStorage, MemoryStorage};

#[test]
fn memory_storage_enforces_quota_per_total_size() {
    let storage = MemoryStorage::with_quota(16);
    storage.set_item("a", "0123456789").expect("fits");
    assert_eq!(
        storage.set_item("b", "0123456789"),
        Err(StorageError::QuotaExceeded)
    );
    // Overwriting a key only counts its new size.
    storage
        .set_item("a", "012345678901234")
        .expect("replacement fits");
}

#[test]
fn unavailable_memory_storage_rejects_everything() {
    let storage = MemoryStorage::unavailable();
    assert_eq!(storage.get_item("k"), Err(StorageError::Unavailable));
    assert_eq!(storage.set_item("k", "v"), Err(StorageError::Unavailable));
    assert_eq!(storage.remove_item("k"), Err(StorageError::Unavailable));

    storage.set_available(true);
    assert_eq!(storage.get_item("k"), Ok(None));
}

#[test]
fn file_storage_round_trips_and_removes() {
    let dir = std::env::temp_dir().join(format!("drawer-search-{}", uuid::Uuid::new_v4()));
    let storage = FileStorage::open(&dir).expect("open dir");

    assert_eq!(storage.get_item("drawer_search_cache").expect("read"), None);
    storage
        .set_item("drawer_search_cache", "{\"data\":{}}")
        .expect("write");
    assert_eq!(
        storage.get_item("drawer_search_cache").expect("read"),
        Some("{\"data\":{}}".to_string())
    );
    storage.remove_item("drawer_search_cache").expect("remove");
    storage
        .remove_item("drawer_search_cache")
        .expect("remove twice");
    assert_eq!(storage.get_item("drawer_search_cache").expect("read"), None);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn file_storage_keeps_unsafe_keys_inside_its_directory() {
    let dir = std::env::temp_dir().join(format!("drawer-search-{}", uuid::Uuid::new_v4()));
    let storage = FileStorage::open(&dir).expect("open dir");

    storage.set_item("../escape/key", "v").expect("write");
    assert_eq!(
        storage.get_item("../escape/key").expect("read"),
        Some("v".to_string())
    );
    assert!(dir.join("___escape_key.json").exists());

    let _ = std::fs::remove_dir_all(dir);
}
