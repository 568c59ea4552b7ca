//! The configuration store interface and an in-memory implementation.

use crate::error::{Error, Result};
use crate::value::{Value, Values};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Storage backend for configuration sections.
///
/// Implementations must be thread-safe. Each call is treated by the binder as
/// a single round trip; durability of writes is up to the implementation.
pub trait ConfigurationStore: Send + Sync {
  /// Returns every key/value pair of `section`.
  ///
  /// Returns an empty map if the section does not exist yet. Fails with
  /// [`Error::Argument`] if `section` is empty.
  fn get_values(&self, section: &str) -> Result<Values>;

  /// Inserts or updates each pair of `values` in `section`.
  ///
  /// An existing key is matched case-insensitively and keeps its stored
  /// spelling; a new key is appended as given. Fails with
  /// [`Error::Argument`] if `section` is empty.
  fn set_values(&self, section: &str, values: &Values) -> Result<()>;
}

impl<S: ConfigurationStore + ?Sized> ConfigurationStore for &S {
  fn get_values(&self, section: &str) -> Result<Values> {
    (**self).get_values(section)
  }

  fn set_values(&self, section: &str, values: &Values) -> Result<()> {
    (**self).set_values(section, values)
  }
}

impl<S: ConfigurationStore + ?Sized> ConfigurationStore for Box<S> {
  fn get_values(&self, section: &str) -> Result<Values> {
    (**self).get_values(section)
  }

  fn set_values(&self, section: &str, values: &Values) -> Result<()> {
    (**self).set_values(section, values)
  }
}

impl<S: ConfigurationStore + ?Sized> ConfigurationStore for Arc<S> {
  fn get_values(&self, section: &str) -> Result<Values> {
    (**self).get_values(section)
  }

  fn set_values(&self, section: &str, values: &Values) -> Result<()> {
    (**self).set_values(section, values)
  }
}

/// Fails with [`Error::Argument`] if `section` is empty.
pub fn ensure_section(section: &str) -> Result<()> {
  if section.is_empty() {
    return Err(Error::empty_section());
  }
  Ok(())
}

/// The write-merge key rule shared by all stores: keys match case-insensitively.
pub fn same_key(stored: &str, key: &str) -> bool {
  stored == key || stored.to_lowercase() == key.to_lowercase()
}

/// Upserts `value` under `key` into an ordered list of entries. A match keeps
/// its original key spelling.
pub(crate) fn upsert_entry(entries: &mut Vec<(String, Value)>, key: &str, value: Value) {
  match entries.iter_mut().find(|(stored, _)| same_key(stored, key)) {
    Some((_, slot)) => *slot = value,
    None => entries.push((key.to_owned(), value)),
  }
}

/// A process-local store. Sections keep their keys in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
  sections: RwLock<HashMap<String, Vec<(String, Value)>>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Seeds a section, replacing any previous content.
  pub fn with_section<K, V>(self, section: &str, entries: impl IntoIterator<Item = (K, V)>) -> Self
  where
    K: Into<String>,
    V: Into<Value>,
  {
    let entries = entries
      .into_iter()
      .map(|(k, v)| (k.into(), v.into()))
      .collect();
    self.sections.write().insert(section.to_owned(), entries);
    self
  }

  /// Returns the section's entries in stored order.
  pub fn entries(&self, section: &str) -> Vec<(String, Value)> {
    self
      .sections
      .read()
      .get(section)
      .cloned()
      .unwrap_or_default()
  }
}

impl ConfigurationStore for MemoryStore {
  fn get_values(&self, section: &str) -> Result<Values> {
    ensure_section(section)?;
    let sections = self.sections.read();
    Ok(
      sections
        .get(section)
        .map(|entries| entries.iter().cloned().collect())
        .unwrap_or_default(),
    )
  }

  fn set_values(&self, section: &str, values: &Values) -> Result<()> {
    ensure_section(section)?;
    let mut sections = self.sections.write();
    let entries = sections.entry(section.to_owned()).or_default();
    for (key, value) in values {
      upsert_entry(entries, key, value.clone());
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_section_is_empty() {
    let store = MemoryStore::new();
    assert!(store.get_values("Nothing").unwrap().is_empty());
  }

  #[test]
  fn empty_section_name_is_rejected() {
    let store = MemoryStore::new();
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
  fn upsert_matches_existing_keys_case_insensitively() {
    let store = MemoryStore::new().with_section("App", [("TestInt", "1")]);
    let mut values = Values::new();
    values.insert("testint".to_string(), Value::from("2"));
    values.insert("Other".to_string(), Value::Null);
    store.set_values("App", &values).unwrap();

    let entries = store.entries("App");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0], ("TestInt".to_string(), Value::from("2")));
    assert_eq!(entries[1], ("Other".to_string(), Value::Null));
  }

  #[test]
  fn keys_differing_only_in_case_share_one_entry() {
    let store = MemoryStore::new();
    let mut values = Values::new();
    values.insert("Key".to_string(), Value::from("1"));
    values.insert("key".to_string(), Value::from("2"));
    store.set_values("S", &values).unwrap();

    assert_eq!(store.entries("S"), vec![("Key".to_string(), Value::from("2"))]);
  }

  #[test]
  fn same_key_ignores_case_only() {
    assert!(same_key("TestInt", "testint"));
    assert!(same_key("ÉtatInitial", "étatinitial"));
    assert!(!same_key("TestInt", "TestInt2"));
  }
}
