use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the stores in this crate.
///
/// Inside the [`ConfigurationStore`](fibre_config::ConfigurationStore) methods
/// they are wrapped into [`fibre_config::Error::Store`] together with the
/// section name.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Configuration file not found: {}", .0.display())]
  FileNotFound(PathBuf),

  #[error("Failed to access configuration file: {0}")]
  Io(#[from] std::io::Error),

  #[error("Failed to parse configuration: {0}")]
  Yaml(#[from] serde_yaml::Error),

  #[error("Section '{section}' is a {found}, expected a mapping of keys to values")]
  UnsupportedSection { section: String, found: &'static str },

  #[error("Entry '{section}.{key}' is a {found}, expected a scalar")]
  UnsupportedValue {
    section: String,
    key: String,
    found: &'static str,
  },

  #[error("Missing required option '{0}'")]
  MissingOption(&'static str),
}

impl StoreError {
  pub(crate) fn in_section(self, section: &str) -> fibre_config::Error {
    fibre_config::Error::store(section, self)
  }
}

/// A specialized `Result` type for store setup.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
