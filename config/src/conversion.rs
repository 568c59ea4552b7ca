//! Type conversion rules.
//!
//! [`convert`] turns a raw value, as handed out by a store, into a value that
//! a property of the given [`TypeDescriptor`] accepts. Parsing is
//! locale-invariant. For nullable destinations an empty string is read as
//! null; for every other destination the empty string is an ordinary input.

use crate::error::ConversionError;
use crate::value::{Value, DATE_FORMAT};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

const DATE_TIME_INPUT_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// The scalar types the conversion rules know how to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
  String,
  Bool,
  Char,
  I8,
  I16,
  I32,
  I64,
  Isize,
  U8,
  U16,
  U32,
  U64,
  Usize,
  F32,
  F64,
  Date,
  DateTime,
  /// A fieldless enum, matched by variant name.
  Enum {
    name: &'static str,
    variants: &'static [&'static str],
  },
}

impl ScalarKind {
  pub fn name(&self) -> &'static str {
    match self {
      ScalarKind::String => "String",
      ScalarKind::Bool => "bool",
      ScalarKind::Char => "char",
      ScalarKind::I8 => "i8",
      ScalarKind::I16 => "i16",
      ScalarKind::I32 => "i32",
      ScalarKind::I64 => "i64",
      ScalarKind::Isize => "isize",
      ScalarKind::U8 => "u8",
      ScalarKind::U16 => "u16",
      ScalarKind::U32 => "u32",
      ScalarKind::U64 => "u64",
      ScalarKind::Usize => "usize",
      ScalarKind::F32 => "f32",
      ScalarKind::F64 => "f64",
      ScalarKind::Date => "NaiveDate",
      ScalarKind::DateTime => "NaiveDateTime",
      ScalarKind::Enum { name, .. } => *name,
    }
  }
}

/// Describes the declared type of a bindable property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
  /// A scalar handled by the conversion rules.
  Scalar(ScalarKind),
  /// A nullable wrapper. Holds the wrapper's type arguments; exactly one is valid.
  Nullable(Vec<TypeDescriptor>),
  /// Any other type. Raw values are passed through untouched.
  Opaque(&'static str),
}

impl TypeDescriptor {
  pub fn nullable(inner: TypeDescriptor) -> Self {
    TypeDescriptor::Nullable(vec![inner])
  }

  pub fn is_nullable(&self) -> bool {
    matches!(self, TypeDescriptor::Nullable(_))
  }
}

impl fmt::Display for TypeDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TypeDescriptor::Scalar(kind) => f.write_str(kind.name()),
      TypeDescriptor::Nullable(args) => {
        f.write_str("Option<")?;
        for (i, arg) in args.iter().enumerate() {
          if i > 0 {
            f.write_str(", ")?;
          }
          write!(f, "{}", arg)?;
        }
        f.write_str(">")
      }
      TypeDescriptor::Opaque(name) => f.write_str(name),
    }
  }
}

/// Converts `raw` into a value assignable to a property of type `target`.
///
/// # Errors
///
/// - [`ConversionError::NullableArity`] if a nullable wrapper does not carry
///   exactly one type argument.
/// - [`ConversionError::NullIntoNonNullable`] if `raw` is null and the target
///   is a non-nullable scalar other than a string.
/// - [`ConversionError::Parse`] if the raw value cannot be parsed into the
///   target scalar, including an empty string into a non-nullable scalar.
pub fn convert(raw: Value, target: &TypeDescriptor) -> Result<Value, ConversionError> {
  let (target, nullable) = match target {
    TypeDescriptor::Nullable(args) => {
      if args.len() != 1 {
        return Err(ConversionError::NullableArity(args.len()));
      }
      (&args[0], true)
    }
    other => (other, false),
  };

  match target {
    // Strings are never converted, not even "" to null.
    TypeDescriptor::Scalar(ScalarKind::String) => Ok(raw),
    TypeDescriptor::Scalar(kind) => {
      if nullable && is_null_or_empty(&raw) {
        return Ok(Value::Null);
      }
      if raw.is_null() {
        return Err(ConversionError::NullIntoNonNullable {
          target: kind.name().to_string(),
        });
      }
      parse_scalar(raw, *kind)
    }
    TypeDescriptor::Nullable(_) => convert(raw, target),
    TypeDescriptor::Opaque(_) => Ok(raw),
  }
}

fn is_null_or_empty(raw: &Value) -> bool {
  match raw {
    Value::Null => true,
    Value::String(s) => s.is_empty(),
    _ => false,
  }
}

fn parse_error(text: &str, kind: ScalarKind, reason: impl fmt::Display) -> ConversionError {
  ConversionError::Parse {
    value: text.to_string(),
    target: kind.name().to_string(),
    reason: reason.to_string(),
  }
}

macro_rules! parse_number {
  ($text:expr, $kind:expr, $ty:ty, $variant:ident) => {
    $text
      .trim()
      .parse::<$ty>()
      .map(|v| Value::$variant(v as _))
      .map_err(|e| parse_error(&$text, $kind, e))
  };
}

/// Widens an `f32` through its shortest decimal form so `1.1f32` becomes `1.1f64`.
pub(crate) fn widen_f32(value: f32) -> f64 {
  value.to_string().parse().unwrap_or(value as f64)
}

fn parse_scalar(raw: Value, kind: ScalarKind) -> Result<Value, ConversionError> {
  // Natives that already have the requested shape need no round trip through text.
  match (kind, &raw) {
    (ScalarKind::Bool, Value::Bool(_))
    | (ScalarKind::Char, Value::Char(_))
    | (ScalarKind::F64, Value::Float(_))
    | (ScalarKind::Date, Value::Date(_))
    | (ScalarKind::DateTime, Value::DateTime(_)) => return Ok(raw),
    _ => {}
  }

  let text = match raw {
    Value::String(s) => s,
    other => other.to_invariant_string().unwrap_or_default(),
  };

  match kind {
    ScalarKind::I8 => parse_number!(text, kind, i8, Int),
    ScalarKind::I16 => parse_number!(text, kind, i16, Int),
    ScalarKind::I32 => parse_number!(text, kind, i32, Int),
    ScalarKind::I64 => parse_number!(text, kind, i64, Int),
    ScalarKind::Isize => parse_number!(text, kind, isize, Int),
    ScalarKind::U8 => parse_number!(text, kind, u8, UInt),
    ScalarKind::U16 => parse_number!(text, kind, u16, UInt),
    ScalarKind::U32 => parse_number!(text, kind, u32, UInt),
    ScalarKind::U64 => parse_number!(text, kind, u64, UInt),
    ScalarKind::Usize => parse_number!(text, kind, usize, UInt),
    ScalarKind::F64 => parse_number!(text, kind, f64, Float),
    ScalarKind::F32 => text
      .trim()
      .parse::<f32>()
      .map(|v| Value::Float(widen_f32(v)))
      .map_err(|e| parse_error(&text, kind, e)),
    ScalarKind::Bool => {
      let trimmed = text.trim();
      if trimmed.eq_ignore_ascii_case("true") {
        Ok(Value::Bool(true))
      } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(Value::Bool(false))
      } else {
        Err(parse_error(&text, kind, "expected 'true' or 'false'"))
      }
    }
    ScalarKind::Char => {
      let mut chars = text.chars();
      match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Value::Char(c)),
        _ => Err(parse_error(&text, kind, "expected exactly one character")),
      }
    }
    ScalarKind::Date => NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
      .map(Value::Date)
      .map_err(|e| parse_error(&text, kind, e)),
    ScalarKind::DateTime => {
      let trimmed = text.trim();
      let mut last_error = None;
      for format in DATE_TIME_INPUT_FORMATS {
        match NaiveDateTime::parse_from_str(trimmed, format) {
          Ok(dt) => return Ok(Value::DateTime(dt)),
          Err(e) => last_error = Some(e),
        }
      }
      Err(parse_error(
        &text,
        kind,
        last_error.map_or_else(|| "invalid date-time".to_string(), |e| e.to_string()),
      ))
    }
    ScalarKind::Enum { variants, .. } => {
      let trimmed = text.trim();
      variants
        .iter()
        .find(|variant| variant.eq_ignore_ascii_case(trimmed))
        .map(|variant| Value::String((*variant).to_string()))
        .ok_or_else(|| parse_error(&text, kind, format!("expected one of {:?}", variants)))
    }
    ScalarKind::String => Ok(Value::String(text)),
  }
}
