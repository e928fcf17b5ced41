use std::collections::BTreeMap;

use fixture_block_sync::mapping::Mapping;
use fixture_block_sync::SyncError;

#[test]
fn missing_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mapping = Mapping::load(dir.path().join("ids.json")).expect("load failed");
    assert!(mapping.is_empty());
}

#[test]
fn flush_keeps_every_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ids.json");
    std::fs::write(&path, r#"{"436181": "1001", "436200": "1002"}"#).unwrap();

    let mut mapping = Mapping::load(&path).expect("load failed");
    mapping.insert("497411", "1003");
    mapping.flush().expect("flush failed");

    let on_disk: BTreeMap<String, String> =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk.len(), 3);
    assert_eq!(on_disk["436181"], "1001");
    assert_eq!(on_disk["436200"], "1002");
    assert_eq!(on_disk["497411"], "1003");

    let reloaded = Mapping::load(&path).expect("reload failed");
    assert_eq!(reloaded.get("497411"), Some("1003"));
    assert!(!dir.path().join("ids.json.tmp").exists());
}

#[test]
fn numeric_block_ids_are_read_as_strings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ids.json");
    std::fs::write(&path, r#"{"436181": 1001}"#).unwrap();

    let mapping = Mapping::load(&path).expect("load failed");
    assert_eq!(mapping.get("436181"), Some("1001"));
}

#[test]
fn corrupt_file_is_a_mapping_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ids.json");
    std::fs::write(&path, "{\"436181\": ").unwrap();

    let err = Mapping::load(&path).unwrap_err();
    assert!(matches!(err, SyncError::Mapping(_)), "got {:?}", err);
}

#[test]
fn flush_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut mapping = Mapping::empty(dir.path().join("nope").join("ids.json"));
    mapping.insert("1", "2");
    assert!(matches!(mapping.flush(), Err(SyncError::Mapping(_))));
}

#[test]
fn writable_check_accepts_existing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mapping = Mapping::empty(dir.path().join("ids.json"));
    mapping.check_writable().expect("directory should be writable");
    assert!(!dir.path().join("ids.json.tmp").exists());
    assert!(!dir.path().join("ids.json").exists());
}

#[test]
fn writable_check_rejects_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mapping = Mapping::load(dir.path().join("typo").join("ids.json")).expect("missing file loads empty");
    assert!(matches!(mapping.check_writable(), Err(SyncError::Mapping(_))));
}
