#![allow(dead_code)]

use fibre_config::{
  config_enum, configuration, ConfigurationStore, Error, MemoryStore, Result, Values,
};
use std::sync::atomic::{AtomicUsize, Ordering};

configuration! {
  #[derive(Debug, Default, Clone, PartialEq)]
  pub struct TestConfigurationObject {
    pub test_string: String => "TestString",
    pub test_int: i32 => "TestInt",
    pub test_nullable_int: Option<i32> => "TestNullableInt",
  }
}

config_enum! {
  #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
  pub enum Verbosity {
    #[default]
    Quiet,
    Normal,
    Loud,
  }
}

configuration! {
  #[derive(Debug, Default, Clone, PartialEq)]
  pub struct EveryScalar {
    pub flag: bool => "Flag",
    pub letter: char => "Letter",
    pub small: i8 => "Small",
    pub count: u64 => "Count",
    pub ratio: f64 => "Ratio",
    pub narrow: f32 => "Narrow",
    pub day: Option<chrono::NaiveDate> => "Day",
    pub stamp: Option<chrono::NaiveDateTime> => "Stamp",
    pub verbosity: Verbosity => "Verbosity",
    pub label: Option<String> => "Label",
  }
}

/// The section used by the tests of `TestConfigurationObject`.
pub fn seeded_store() -> MemoryStore {
  MemoryStore::new().with_section(
    "TestConfigurationObject",
    [
      ("TestString", "default"),
      ("TestInt", "10"),
      ("TestNullableInt", ""),
    ],
  )
}

/// A store that counts its calls and delegates to a `MemoryStore`.
#[derive(Default)]
pub struct CountingStore {
  pub inner: MemoryStore,
  pub gets: AtomicUsize,
  pub sets: AtomicUsize,
}

impl ConfigurationStore for CountingStore {
  fn get_values(&self, section: &str) -> Result<Values> {
    self.gets.fetch_add(1, Ordering::SeqCst);
    self.inner.get_values(section)
  }

  fn set_values(&self, section: &str, values: &Values) -> Result<()> {
    self.sets.fetch_add(1, Ordering::SeqCst);
    self.inner.set_values(section, values)
  }
}

/// A store whose backend is always down.
pub struct UnavailableStore;

impl ConfigurationStore for UnavailableStore {
  fn get_values(&self, section: &str) -> Result<Values> {
    Err(Error::store(
      section,
      std::io::Error::new(std::io::ErrorKind::NotConnected, "backend unavailable"),
    ))
  }

  fn set_values(&self, section: &str, _values: &Values) -> Result<()> {
    Err(Error::store(
      section,
      std::io::Error::new(std::io::ErrorKind::NotConnected, "backend unavailable"),
    ))
  }
}
