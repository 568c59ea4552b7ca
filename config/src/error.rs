use thiserror::Error;

/// The main error type for the `fibre_config` library.
#[derive(Debug, Error)]
pub enum Error {
  /// An entry point was called with an argument it cannot work with,
  /// e.g. an empty section name.
  #[error("Invalid argument '{name}': {reason}")]
  Argument { name: &'static str, reason: String },

  /// A stored value could not be bound to a property. The whole bind is aborted.
  #[error("Failed to bind '{section}.{property}': {source}")]
  Conversion {
    section: String,
    property: String,
    #[source]
    source: ConversionError,
  },

  /// The binding plan of a type is malformed.
  #[error("Invalid binding plan for '{type_name}': {source}")]
  Plan {
    type_name: &'static str,
    #[source]
    source: ConversionError,
  },

  /// An error raised by the configuration store, passed through unchanged.
  #[error("Store failed for section '{section}': {source}")]
  Store {
    section: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl Error {
  pub(crate) fn empty_section() -> Self {
    Error::Argument {
      name: "section",
      reason: "section name cannot be empty".to_string(),
    }
  }

  /// Wraps any store-specific error.
  pub fn store(
    section: impl Into<String>,
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
  ) -> Self {
    Error::Store {
      section: section.into(),
      source: source.into(),
    }
  }
}

/// Errors produced by the type conversion rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
  #[error("nullable wrapper must have exactly 1 type argument, found {0}")]
  NullableArity(usize),

  #[error("null cannot be assigned to non-nullable {target}")]
  NullIntoNonNullable { target: String },

  #[error("cannot convert {value:?} into {target}: {reason}")]
  Parse {
    value: String,
    target: String,
    reason: String,
  },

  #[error("expected a {expected} value, found {found}")]
  TypeMismatch {
    expected: &'static str,
    found: &'static str,
  },

  #[error("property key '{name}' is declared more than once")]
  DuplicateProperty { name: String },
}

/// A specialized `Result` type for `fibre_config` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
