mod common;

use common::{TestConfigurationObject, LOAD_TEST_YAML};
use fibre_config::{Binder, ConfigurationStore, Error, Value, Values};
use fibre_config_stores::{FileStore, StoreError};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn store_with(dir: &TempDir, contents: &str) -> FileStore {
  let path = dir.path().join("settings.yaml");
  fs::write(&path, contents).unwrap();
  FileStore::open(path).unwrap()
}

#[test]
fn test_load_from_yaml_file() {
  let dir = TempDir::new().unwrap();
  let binder = Binder::new(store_with(&dir, LOAD_TEST_YAML));

  let mut target = TestConfigurationObject {
    test_string: String::new(),
    test_int: 0,
    test_nullable_int: Some(1),
  };
  binder.load_into(&mut target).unwrap();

  assert_eq!(target.test_string, "default");
  assert_eq!(target.test_int, 10);
  assert_eq!(target.test_nullable_int, None);
}

#[test]
fn test_save_then_load_through_file() {
  let dir = TempDir::new().unwrap();
  let binder = Binder::new(store_with(&dir, LOAD_TEST_YAML));
  let saved = TestConfigurationObject {
    test_string: "SaveTest".to_string(),
    test_int: -1,
    test_nullable_int: None,
  };

  binder.save(&saved).unwrap();

  // A second store over the same file sees the write.
  let reopened = Binder::new(FileStore::open(binder.store().path()).unwrap());
  let loaded: TestConfigurationObject = reopened.load().unwrap();
  assert_eq!(loaded, saved);

  let raw = reopened.store().get_values("TestConfigurationObject").unwrap();
  assert_eq!(raw["TestNullableInt"], Value::Null);
  assert_eq!(raw["TestInt"], Value::from("-1"));
}

#[test]
fn test_missing_section_reads_empty() {
  let dir = TempDir::new().unwrap();
  let store = store_with(&dir, LOAD_TEST_YAML);

  assert!(store.get_values("Unknown").unwrap().is_empty());
}

#[test]
fn test_missing_file_is_an_error_by_default() {
  let dir = TempDir::new().unwrap();
  let store = FileStore::open(dir.path().join("absent.yaml")).unwrap();

  let err = store.get_values("TestConfigurationObject").unwrap_err();

  match err {
    Error::Store { section, source } => {
      assert_eq!(section, "TestConfigurationObject");
      assert!(matches!(
        source.downcast_ref::<StoreError>(),
        Some(StoreError::FileNotFound(_))
      ));
    }
    other => panic!("unexpected error: {other:?}"),
  }
}

#[test]
fn test_missing_file_is_created_on_write_when_allowed() {
  let dir = TempDir::new().unwrap();
  let path = dir.path().join("nested").join("fresh.yaml");
  let store = FileStore::builder()
    .path(&path)
    .create_if_missing(true)
    .build()
    .unwrap();
  assert!(store.get_values("TestConfigurationObject").unwrap().is_empty());

  let binder = Binder::new(store);
  binder.save(&TestConfigurationObject::default()).unwrap();

  assert!(path.exists());
  let loaded: TestConfigurationObject = binder.load().unwrap();
  assert_eq!(loaded, TestConfigurationObject::default());
}

#[test]
fn test_write_merges_case_insensitively_and_keeps_other_sections() {
  let dir = TempDir::new().unwrap();
  let store = store_with(
    &dir,
    "\
Other:
  Keep: me
App:
  testint: '1'
  Extra: x
",
  );

  let mut values = Values::new();
  values.insert("TestInt".to_string(), Value::from("2"));
  values.insert("Added".to_string(), Value::Null);
  store.set_values("App", &values).unwrap();

  let text = fs::read_to_string(store.path()).unwrap();
  let document: serde_yaml::Mapping = serde_yaml::from_str(&text).unwrap();
  let keys: Vec<&str> = document.keys().filter_map(|k| k.as_str()).collect();
  assert_eq!(keys, ["Other", "App"]);

  let app = document["App"].as_mapping().unwrap();
  let app_keys: Vec<&str> = app.keys().filter_map(|k| k.as_str()).collect();
  assert_eq!(app_keys, ["testint", "Extra", "Added"]);
  assert_eq!(app["testint"].as_str(), Some("2"));
  assert!(app["Added"].is_null());
  assert_eq!(document["Other"]["Keep"].as_str(), Some("me"));
}

#[test]
fn test_non_mapping_section_is_rejected() {
  let dir = TempDir::new().unwrap();
  let store = store_with(&dir, "App:\n  - one\n  - two\n");

  let err = store.get_values("App").unwrap_err();

  match err {
    Error::Store { source, .. } => assert!(matches!(
      source.downcast_ref::<StoreError>(),
      Some(StoreError::UnsupportedSection { found: "sequence", .. })
    )),
    other => panic!("unexpected error: {other:?}"),
  }
}

#[test]
fn test_nested_entry_is_rejected() {
  let dir = TempDir::new().unwrap();
  let store = store_with(&dir, "App:
  Plain: x
  Nested:
    Inner: y
");

  let err = store.get_values("App").unwrap_err();

  match err {
    Error::Store { section, source } => {
      assert_eq!(section, "App");
      assert!(matches!(
        source.downcast_ref::<StoreError>(),
        Some(StoreError::UnsupportedValue { key, found: "mapping", .. }) if key == "Nested"
      ));
    }
    other => panic!("unexpected error: {other:?}"),
  }
}

#[test]
fn test_new_section_is_written_in_declaration_order() {
  let dir = TempDir::new().unwrap();
  let binder = Binder::new(store_with(&dir, ""));

  binder.save(&TestConfigurationObject::default()).unwrap();

  let text = fs::read_to_string(binder.store().path()).unwrap();
  let document: serde_yaml::Mapping = serde_yaml::from_str(&text).unwrap();
  let section = document["TestConfigurationObject"].as_mapping().unwrap();
  let keys: Vec<&str> = section.keys().filter_map(|k| k.as_str()).collect();
  assert_eq!(keys, ["TestString", "TestInt", "TestNullableInt"]);
}

#[test]
fn test_empty_section_name_is_rejected() {
  let dir = TempDir::new().unwrap();
  let store = store_with(&dir, LOAD_TEST_YAML);

  assert!(matches!(
    store.get_values(""),
    Err(Error::Argument { name: "section", .. })
  ));
  assert!(matches!(
    store.set_values("", &Values::new()),
    Err(Error::Argument { name: "section", .. })
  ));
}

#[test]
fn test_builder_requires_a_path() {
  assert!(matches!(
    FileStore::builder().build(),
    Err(StoreError::MissingOption("path"))
  ));
}
