//! A configuration store backed by rows of `(section, name, value)`.
//!
//! [`EntryTable`] is the seam to whatever holds the rows, for instance a
//! database table. [`VecTable`] keeps them in memory.

use crate::error::StoreError;
use fibre_config::{ensure_section, same_key, ConfigurationStore, Value, Values};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

/// One configuration entry of one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigurationEntry {
  pub section: String,
  pub name: String,
  #[serde(default)]
  pub value: Option<String>,
}

impl ConfigurationEntry {
  pub fn new(section: impl Into<String>, name: impl Into<String>, value: Option<&str>) -> Self {
    Self {
      section: section.into(),
      name: name.into(),
      value: value.map(str::to_owned),
    }
  }
}

/// A collection of configuration rows.
pub trait EntryTable: Send + Sync {
  /// All rows whose section equals `section` exactly.
  fn rows(&self, section: &str) -> Result<Vec<ConfigurationEntry>, StoreError>;

  fn insert(&self, entry: ConfigurationEntry) -> Result<(), StoreError>;

  /// Sets the value of the row identified by `section` and its stored `name`.
  fn update(&self, section: &str, name: &str, value: Option<String>) -> Result<(), StoreError>;
}

/// Rows held in process memory.
#[derive(Debug, Default)]
pub struct VecTable {
  rows: RwLock<Vec<ConfigurationEntry>>,
}

impl VecTable {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_rows(rows: Vec<ConfigurationEntry>) -> Self {
    Self {
      rows: RwLock::new(rows),
    }
  }

  /// A copy of every row, across all sections.
  pub fn snapshot(&self) -> Vec<ConfigurationEntry> {
    self.rows.read().clone()
  }
}

impl EntryTable for VecTable {
  fn rows(&self, section: &str) -> Result<Vec<ConfigurationEntry>, StoreError> {
    Ok(
      self
        .rows
        .read()
        .iter()
        .filter(|row| row.section == section)
        .cloned()
        .collect(),
    )
  }

  fn insert(&self, entry: ConfigurationEntry) -> Result<(), StoreError> {
    self.rows.write().push(entry);
    Ok(())
  }

  fn update(&self, section: &str, name: &str, value: Option<String>) -> Result<(), StoreError> {
    let mut rows = self.rows.write();
    if let Some(row) = rows
      .iter_mut()
      .find(|row| row.section == section && row.name == name)
    {
      row.value = value;
    }
    Ok(())
  }
}

/// Exposes an [`EntryTable`] as a [`ConfigurationStore`].
///
/// Values are stored as their invariant string, null as `None`.
#[derive(Debug)]
pub struct TableStore<T> {
  table: T,
  write_lock: Mutex<()>,
}

impl<T: EntryTable> TableStore<T> {
  pub fn new(table: T) -> Self {
    Self {
      table,
      write_lock: Mutex::new(()),
    }
  }

  pub fn table(&self) -> &T {
    &self.table
  }

  fn upsert(&self, section: &str, values: &Values) -> Result<(), StoreError> {
    // Names present in the section, including those inserted by this write.
    let mut names: Vec<String> = self
      .table
      .rows(section)?
      .into_iter()
      .map(|row| row.name)
      .collect();

    for (key, value) in values {
      let value = value.to_invariant_string();
      match names.iter().find(|name| same_key(name, key)) {
        Some(name) => self.table.update(section, name, value)?,
        None => {
          self.table.insert(ConfigurationEntry {
            section: section.to_string(),
            name: key.clone(),
            value,
          })?;
          names.push(key.clone());
        }
      }
    }
    Ok(())
  }
}

impl<T: EntryTable> ConfigurationStore for TableStore<T> {
  fn get_values(&self, section: &str) -> fibre_config::Result<Values> {
    ensure_section(section)?;
    let rows = self.table.rows(section).map_err(|e| e.in_section(section))?;
    Ok(
      rows
        .into_iter()
        .map(|row| (row.name, row.value.map_or(Value::Null, Value::String)))
        .collect(),
    )
  }

  fn set_values(&self, section: &str, values: &Values) -> fibre_config::Result<()> {
    ensure_section(section)?;
    let _guard = self.write_lock.lock();
    self
      .upsert(section, values)
      .map_err(|e| e.in_section(section))?;
    tracing::debug!(section, entries = values.len(), "upserted table rows");
    Ok(())
  }
}
