//! Mapping between Rust field types and configuration values.

use crate::conversion::{widen_f32, ScalarKind, TypeDescriptor};
use crate::error::ConversionError;
use crate::value::Value;
use chrono::{NaiveDate, NaiveDateTime};

/// A field type that can be bound to a configuration entry.
///
/// `from_value` receives a value that already went through
/// [`convert`](crate::convert) for [`Scalar::descriptor`], so implementations
/// only unpack the matching variant.
pub trait Scalar: Sized {
  fn descriptor() -> TypeDescriptor;
  fn to_value(&self) -> Value;
  fn from_value(value: Value) -> Result<Self, ConversionError>;
}

fn mismatch(expected: &'static str, found: &Value) -> ConversionError {
  match found {
    Value::Null => ConversionError::NullIntoNonNullable {
      target: expected.to_string(),
    },
    other => ConversionError::TypeMismatch {
      expected,
      found: other.kind_name(),
    },
  }
}

impl Scalar for String {
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::Scalar(ScalarKind::String)
  }

  fn to_value(&self) -> Value {
    Value::String(self.clone())
  }

  fn from_value(value: Value) -> Result<Self, ConversionError> {
    match value {
      Value::String(s) => Ok(s),
      Value::Null => Err(mismatch("String", &Value::Null)),
      // A store may hand a native scalar to a string property.
      other => other
        .to_invariant_string()
        .ok_or_else(|| mismatch("String", &Value::Null)),
    }
  }
}

macro_rules! impl_scalar_int {
  ($($ty:ty => $kind:ident, $variant:ident);* $(;)?) => {
    $(
      impl Scalar for $ty {
        fn descriptor() -> TypeDescriptor {
          TypeDescriptor::Scalar(ScalarKind::$kind)
        }

        fn to_value(&self) -> Value {
          Value::$variant(*self as _)
        }

        fn from_value(value: Value) -> Result<Self, ConversionError> {
          match value {
            Value::$variant(v) => <$ty>::try_from(v).map_err(|e| ConversionError::Parse {
              value: v.to_string(),
              target: stringify!($ty).to_string(),
              reason: e.to_string(),
            }),
            other => Err(mismatch(stringify!($ty), &other)),
          }
        }
      }
    )*
  };
}

impl_scalar_int! {
  i8 => I8, Int;
  i16 => I16, Int;
  i32 => I32, Int;
  i64 => I64, Int;
  isize => Isize, Int;
  u8 => U8, UInt;
  u16 => U16, UInt;
  u32 => U32, UInt;
  u64 => U64, UInt;
  usize => Usize, UInt;
}

impl Scalar for f64 {
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::Scalar(ScalarKind::F64)
  }

  fn to_value(&self) -> Value {
    Value::Float(*self)
  }

  fn from_value(value: Value) -> Result<Self, ConversionError> {
    match value {
      Value::Float(f) => Ok(f),
      other => Err(mismatch("f64", &other)),
    }
  }
}

impl Scalar for f32 {
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::Scalar(ScalarKind::F32)
  }

  fn to_value(&self) -> Value {
    Value::Float(widen_f32(*self))
  }

  fn from_value(value: Value) -> Result<Self, ConversionError> {
    match value {
      Value::Float(f) => Ok(f as f32),
      other => Err(mismatch("f32", &other)),
    }
  }
}

impl Scalar for bool {
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::Scalar(ScalarKind::Bool)
  }

  fn to_value(&self) -> Value {
    Value::Bool(*self)
  }

  fn from_value(value: Value) -> Result<Self, ConversionError> {
    match value {
      Value::Bool(b) => Ok(b),
      other => Err(mismatch("bool", &other)),
    }
  }
}

impl Scalar for char {
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::Scalar(ScalarKind::Char)
  }

  fn to_value(&self) -> Value {
    Value::Char(*self)
  }

  fn from_value(value: Value) -> Result<Self, ConversionError> {
    match value {
      Value::Char(c) => Ok(c),
      other => Err(mismatch("char", &other)),
    }
  }
}

impl Scalar for NaiveDate {
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::Scalar(ScalarKind::Date)
  }

  fn to_value(&self) -> Value {
    Value::Date(*self)
  }

  fn from_value(value: Value) -> Result<Self, ConversionError> {
    match value {
      Value::Date(d) => Ok(d),
      other => Err(mismatch("NaiveDate", &other)),
    }
  }
}

impl Scalar for NaiveDateTime {
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::Scalar(ScalarKind::DateTime)
  }

  fn to_value(&self) -> Value {
    Value::DateTime(*self)
  }

  fn from_value(value: Value) -> Result<Self, ConversionError> {
    match value {
      Value::DateTime(dt) => Ok(dt),
      other => Err(mismatch("NaiveDateTime", &other)),
    }
  }
}

/// Raw values bound as-is.
impl Scalar for Value {
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::Opaque("Value")
  }

  fn to_value(&self) -> Value {
    self.clone()
  }

  fn from_value(value: Value) -> Result<Self, ConversionError> {
    Ok(value)
  }
}

/// `Option<S>` is the nullable wrapper: `None` is stored as null.
impl<S: Scalar> Scalar for Option<S> {
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::nullable(S::descriptor())
  }

  fn to_value(&self) -> Value {
    match self {
      Some(inner) => inner.to_value(),
      None => Value::Null,
    }
  }

  fn from_value(value: Value) -> Result<Self, ConversionError> {
    match value {
      Value::Null => Ok(None),
      other => S::from_value(other).map(Some),
    }
  }
}
