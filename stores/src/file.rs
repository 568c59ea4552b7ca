//! A configuration store backed by a single YAML file.
//!
//! The file holds one top-level mapping per section:
//!
//! ```yaml
//! TestConfigurationObject:
//!   TestString: default
//!   TestInt: '10'
//!   TestNullableInt: null
//! ```
//!
//! Keys keep the order in which they were first written.

use crate::error::{Result, StoreError};
use fibre_config::{ensure_section, same_key, ConfigurationStore, Value, Values};
use parking_lot::Mutex;
use serde_yaml::{Mapping, Value as YamlValue};
use std::fs;
use std::path::{Path, PathBuf};

/// Builder for [`FileStore`].
#[derive(Debug, Clone, Default)]
pub struct FileStoreBuilder {
  path: Option<PathBuf>,
  create_if_missing: bool,
}

impl FileStoreBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// The YAML file to read from and write to. Required.
  pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
    self.path = Some(path.into());
    self
  }

  /// When `true`, a missing file reads as empty and is created on the first
  /// write. When `false` (the default), a missing file is an error.
  pub fn create_if_missing(mut self, create: bool) -> Self {
    self.create_if_missing = create;
    self
  }

  pub fn build(self) -> Result<FileStore> {
    let path = self.path.ok_or(StoreError::MissingOption("path"))?;
    Ok(FileStore {
      path,
      create_if_missing: self.create_if_missing,
      write_lock: Mutex::new(()),
    })
  }
}

/// Stores sections as top-level mappings of a YAML document.
///
/// Every write reads the current document, merges the new values and replaces
/// the file. Writers within one process are serialized.
#[derive(Debug)]
pub struct FileStore {
  path: PathBuf,
  create_if_missing: bool,
  write_lock: Mutex<()>,
}

impl FileStore {
  pub fn builder() -> FileStoreBuilder {
    FileStoreBuilder::new()
  }

  /// Opens an existing file. Shorthand for `builder().path(path).build()`.
  pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
    Self::builder().path(path).build()
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn read_document(&self) -> Result<Mapping> {
    let text = match fs::read_to_string(&self.path) {
      Ok(text) => text,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        if self.create_if_missing {
          return Ok(Mapping::new());
        }
        return Err(StoreError::FileNotFound(self.path.clone()));
      }
      Err(e) => return Err(e.into()),
    };

    if text.trim().is_empty() {
      return Ok(Mapping::new());
    }
    Ok(serde_yaml::from_str(&text)?)
  }

  fn write_document(&self, document: &Mapping) -> Result<()> {
    if let Some(parent) = self.path.parent() {
      if self.create_if_missing && !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)?;
      }
    }
    let text = serde_yaml::to_string(document)?;
    // Write next to the target and rename so readers never see a torn file.
    let staging = self.path.with_extension("yaml.tmp");
    fs::write(&staging, text)?;
    fs::rename(&staging, &self.path)?;
    Ok(())
  }

  fn section_values(document: &Mapping, section: &str) -> Result<Values> {
    let entries = match document.get(section) {
      None | Some(YamlValue::Null) => return Ok(Values::new()),
      Some(YamlValue::Mapping(entries)) => entries,
      Some(other) => {
        return Err(StoreError::UnsupportedSection {
          section: section.to_string(),
          found: yaml_kind(other),
        })
      }
    };

    let mut values = Values::with_capacity(entries.len());
    for (key, value) in entries {
      let key = scalar_text(key).ok_or_else(|| StoreError::UnsupportedValue {
        section: section.to_string(),
        key: format!("{:?}", key),
        found: yaml_kind(key),
      })?;
      let value = match value {
        YamlValue::Null => Value::Null,
        other => Value::String(scalar_text(other).ok_or_else(|| StoreError::UnsupportedValue {
          section: section.to_string(),
          key: key.clone(),
          found: yaml_kind(other),
        })?),
      };
      values.insert(key, value);
    }
    Ok(values)
  }

  fn merge_section(document: &mut Mapping, section: &str, values: &Values) -> Result<()> {
    let slot = document
      .entry(YamlValue::String(section.to_string()))
      .or_insert(YamlValue::Null);
    if slot.is_null() {
      *slot = YamlValue::Mapping(Mapping::new());
    }
    let entries = match slot {
      YamlValue::Mapping(entries) => entries,
      other => {
        return Err(StoreError::UnsupportedSection {
          section: section.to_string(),
          found: yaml_kind(other),
        })
      }
    };

    for (key, value) in values {
      let yaml = match value.to_invariant_string() {
        Some(text) => YamlValue::String(text),
        None => YamlValue::Null,
      };
      let existing = entries.iter_mut().find(|(stored, _)| {
        stored
          .as_str()
          .is_some_and(|stored| same_key(stored, key))
      });
      match existing {
        Some((_, slot)) => *slot = yaml,
        None => {
          entries.insert(YamlValue::String(key.clone()), yaml);
        }
      }
    }
    Ok(())
  }
}

impl ConfigurationStore for FileStore {
  fn get_values(&self, section: &str) -> fibre_config::Result<Values> {
    ensure_section(section)?;
    let document = self.read_document().map_err(|e| e.in_section(section))?;
    let values = Self::section_values(&document, section).map_err(|e| e.in_section(section))?;
    tracing::debug!(path = %self.path.display(), section, entries = values.len(), "read section");
    Ok(values)
  }

  fn set_values(&self, section: &str, values: &Values) -> fibre_config::Result<()> {
    ensure_section(section)?;
    let _guard = self.write_lock.lock();
    let mut document = self.read_document().map_err(|e| e.in_section(section))?;
    Self::merge_section(&mut document, section, values).map_err(|e| e.in_section(section))?;
    self
      .write_document(&document)
      .map_err(|e| e.in_section(section))?;
    tracing::debug!(path = %self.path.display(), section, entries = values.len(), "wrote section");
    Ok(())
  }
}

/// Text of a YAML scalar. Numbers and booleans keep their YAML spelling.
fn scalar_text(value: &YamlValue) -> Option<String> {
  match value {
    YamlValue::String(s) => Some(s.clone()),
    YamlValue::Bool(b) => Some(b.to_string()),
    YamlValue::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

fn yaml_kind(value: &YamlValue) -> &'static str {
  match value {
    YamlValue::Null => "null",
    YamlValue::Bool(_) => "bool",
    YamlValue::Number(_) => "number",
    YamlValue::String(_) => "string",
    YamlValue::Sequence(_) => "sequence",
    YamlValue::Mapping(_) => "mapping",
    YamlValue::Tagged(_) => "tagged value",
  }
}
