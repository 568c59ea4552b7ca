//! The untyped value exchanged between stores and the binder.

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use std::fmt;

/// ISO-8601 date format used for both parsing and rendering.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// ISO-8601 date-time format used when rendering. Fractional seconds are omitted when zero.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A flat section of key/value pairs as produced or consumed by a store.
/// Iteration follows insertion order, so a saved section keeps declaration order.
pub type Values = IndexMap<String, Value>;

/// A configuration value.
///
/// Stores normally hand out `Null` or `String`. A store that already knows the
/// native type of an entry may return one of the scalar variants instead; the
/// conversion rules accept both.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Null,
  String(String),
  Bool(bool),
  Char(char),
  Int(i64),
  UInt(u64),
  Float(f64),
  Date(NaiveDate),
  DateTime(NaiveDateTime),
}

impl Value {
  pub fn is_null(&self) -> bool {
    matches!(self, Value::Null)
  }

  /// A short name for the variant, used in error messages.
  pub fn kind_name(&self) -> &'static str {
    match self {
      Value::Null => "null",
      Value::String(_) => "string",
      Value::Bool(_) => "bool",
      Value::Char(_) => "char",
      Value::Int(_) => "int",
      Value::UInt(_) => "uint",
      Value::Float(_) => "float",
      Value::Date(_) => "date",
      Value::DateTime(_) => "datetime",
    }
  }

  /// Renders a non-null value with locale-invariant rules.
  ///
  /// Returns `None` for `Null`.
  pub fn to_invariant_string(&self) -> Option<String> {
    let text = match self {
      Value::Null => return None,
      Value::String(s) => s.clone(),
      Value::Bool(b) => b.to_string(),
      Value::Char(c) => c.to_string(),
      Value::Int(i) => i.to_string(),
      Value::UInt(u) => u.to_string(),
      Value::Float(f) => f.to_string(),
      Value::Date(d) => d.format(DATE_FORMAT).to_string(),
      Value::DateTime(dt) => dt.format(DATE_TIME_FORMAT).to_string(),
    };
    Some(text)
  }

  /// Converts the value into the form that is handed to a store on save:
  /// `Null` stays `Null`, every other value becomes its invariant string.
  pub fn into_raw(self) -> Value {
    match self {
      Value::Null => Value::Null,
      Value::String(s) => Value::String(s),
      other => match other.to_invariant_string() {
        Some(text) => Value::String(text),
        None => Value::Null,
      },
    }
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.to_invariant_string() {
      Some(text) => f.write_str(&text),
      None => f.write_str("null"),
    }
  }
}

impl From<&str> for Value {
  fn from(value: &str) -> Self {
    Value::String(value.to_owned())
  }
}

impl From<String> for Value {
  fn from(value: String) -> Self {
    Value::String(value)
  }
}

impl<T: Into<Value>> From<Option<T>> for Value {
  fn from(value: Option<T>) -> Self {
    value.map_or(Value::Null, Into::into)
  }
}
