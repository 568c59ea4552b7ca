//! Public macros for declaring bindable types.

/// Declares a struct and implements [`Configurable`](crate::Configurable) for it.
///
/// Every field becomes a bound property. The store key defaults to the field
/// name and can be overridden with `=> "Key"`. The section defaults to the
/// struct name and can be overridden with `as "Section"`.
///
/// # Examples
///
/// ```
/// use fibre_config::{configuration, Configurable};
///
/// configuration! {
///   #[derive(Debug, Default, Clone, PartialEq)]
///   pub struct MailSettings {
///     pub relay: String => "Relay",
///     pub port: u16 => "Port",
///     pub retries: Option<u8>,
///   }
/// }
///
/// configuration! {
///   #[derive(Default)]
///   struct Legacy as "legacy-settings" {
///     enabled: bool,
///   }
/// }
///
/// assert_eq!(MailSettings::section(), "MailSettings");
/// let names: Vec<_> = MailSettings::properties().iter().map(|p| p.name()).collect();
/// assert_eq!(names, ["Relay", "Port", "retries"]);
/// assert_eq!(Legacy::section(), "legacy-settings");
/// ```
#[macro_export]
macro_rules! configuration {
  (
    $(#[$meta:meta])*
    $vis:vis struct $name:ident $(as $section:literal)? {
      $(
        $(#[$field_meta:meta])*
        $field_vis:vis $field:ident : $ty:ty $(=> $key:literal)?
      ),* $(,)?
    }
  ) => {
    $(#[$meta])*
    $vis struct $name {
      $(
        $(#[$field_meta])*
        $field_vis $field: $ty,
      )*
    }

    impl $crate::Configurable for $name {
      fn section() -> &'static str {
        $crate::__config_name!($name $(, $section)?)
      }

      fn properties() -> ::std::vec::Vec<$crate::Property<Self>> {
        ::std::vec![
          $(
            $crate::Property::<Self>::scalar(
              $crate::__config_name!($field $(, $key)?),
              |target| &target.$field,
              |target| &mut target.$field,
            ),
          )*
        ]
      }
    }
  };
}

/// Declares a fieldless enum and implements [`Scalar`](crate::Scalar) for it.
///
/// Variants are stored by name and matched case-insensitively on load.
///
/// ```
/// use fibre_config::{config_enum, Scalar, Value};
///
/// config_enum! {
///   #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
///   pub enum Mode {
///     #[default]
///     Fast,
///     Safe,
///   }
/// }
///
/// assert_eq!(Mode::Safe.to_value(), Value::from("Safe"));
/// assert_eq!(Mode::from_value(Value::from("Fast")), Ok(Mode::Fast));
/// ```
#[macro_export]
macro_rules! config_enum {
  (
    $(#[$meta:meta])*
    $vis:vis enum $name:ident {
      $(
        $(#[$variant_meta:meta])*
        $variant:ident
      ),+ $(,)?
    }
  ) => {
    $(#[$meta])*
    $vis enum $name {
      $(
        $(#[$variant_meta])*
        $variant,
      )+
    }

    impl $name {
      pub const VARIANTS: &'static [&'static str] = &[$(stringify!($variant)),+];

      pub fn as_str(&self) -> &'static str {
        match self {
          $($name::$variant => stringify!($variant),)+
        }
      }
    }

    impl $crate::Scalar for $name {
      fn descriptor() -> $crate::TypeDescriptor {
        $crate::TypeDescriptor::Scalar($crate::ScalarKind::Enum {
          name: stringify!($name),
          variants: Self::VARIANTS,
        })
      }

      fn to_value(&self) -> $crate::Value {
        $crate::Value::String(self.as_str().to_string())
      }

      fn from_value(value: $crate::Value) -> ::std::result::Result<Self, $crate::ConversionError> {
        match value {
          $crate::Value::String(text) => {
            $(
              if text == stringify!($variant) {
                return Ok($name::$variant);
              }
            )+
            Err($crate::ConversionError::Parse {
              value: text,
              target: stringify!($name).to_string(),
              reason: format!("expected one of {:?}", Self::VARIANTS),
            })
          }
          $crate::Value::Null => Err($crate::ConversionError::NullIntoNonNullable {
            target: stringify!($name).to_string(),
          }),
          other => Err($crate::ConversionError::TypeMismatch {
            expected: stringify!($name),
            found: other.kind_name(),
          }),
        }
      }
    }
  };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __config_name {
  ($ident:ident) => {
    stringify!($ident)
  };
  ($ident:ident, $name:literal) => {
    $name
  };
}
