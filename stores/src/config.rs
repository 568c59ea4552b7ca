//! Declarative store selection.
//!
//! ```yaml
//! kind: file
//! path: settings.yaml
//! create_if_missing: true
//! ```

use crate::error::Result;
use crate::file::FileStore;
use crate::table::{ConfigurationEntry, TableStore, VecTable};
use fibre_config::{ConfigurationStore, MemoryStore};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Describes which store to open and how.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum StoreConfig {
  /// A [`MemoryStore`]; nothing is persisted.
  Memory,
  /// A YAML [`FileStore`].
  File {
    path: PathBuf,
    #[serde(default)]
    create_if_missing: bool,
  },
  /// A [`TableStore`] over in-memory rows, optionally seeded.
  Table {
    #[serde(default)]
    rows: Vec<ConfigurationEntry>,
  },
}

impl StoreConfig {
  pub fn from_yaml_str(text: &str) -> Result<Self> {
    Ok(serde_yaml::from_str(text)?)
  }

  pub fn from_file(path: &Path) -> Result<Self> {
    let text = fs::read_to_string(path)?;
    Self::from_yaml_str(&text)
  }

  /// Opens the described store.
  pub fn open(&self) -> Result<Box<dyn ConfigurationStore>> {
    let store: Box<dyn ConfigurationStore> = match self {
      StoreConfig::Memory => Box::new(MemoryStore::new()),
      StoreConfig::File {
        path,
        create_if_missing,
      } => Box::new(
        FileStore::builder()
          .path(path.clone())
          .create_if_missing(*create_if_missing)
          .build()?,
      ),
      StoreConfig::Table { rows } => Box::new(TableStore::new(VecTable::from_rows(rows.clone()))),
    };
    tracing::debug!(config = ?self, "opened configuration store");
    Ok(store)
  }
}
