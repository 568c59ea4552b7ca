//! Per-type binding plans.

use crate::conversion::TypeDescriptor;
use crate::error::ConversionError;
use crate::scalar::Scalar;
use crate::value::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

type Reader<T> = Box<dyn Fn(&T) -> Value + Send + Sync>;
type Preparer<T> = Box<dyn Fn(Value) -> Result<Assignment<T>, ConversionError> + Send + Sync>;

/// A type whose fields are bound to a configuration section.
///
/// Usually implemented with the [`configuration!`](crate::configuration) macro.
pub trait Configurable: Sized + 'static {
  /// Name of the section this type is stored under. The type name by convention.
  fn section() -> &'static str;

  /// The bindable properties, in declaration order.
  ///
  /// Called once per [`PlanCache`](crate::PlanCache) while the cache holds the
  /// entry for `Self` locked. It must not use that cache, directly or through a
  /// [`Binder`](crate::Binder), or it deadlocks.
  fn properties() -> Vec<Property<Self>>;
}

/// Name, declared type and nullability of a bound property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
  pub name: &'static str,
  pub ty: TypeDescriptor,
  pub nullable: bool,
}

/// One bindable property of `T`: its descriptor plus accessors.
pub struct Property<T> {
  descriptor: PropertyDescriptor,
  read: Reader<T>,
  prepare: Preparer<T>,
}

/// A typed value ready to be stored into a property. Applying it cannot fail.
pub struct Assignment<T>(Box<dyn FnOnce(&mut T)>);

impl<T> Assignment<T> {
  pub fn apply(self, target: &mut T) {
    (self.0)(target)
  }
}

impl<T: 'static> Property<T> {
  /// Builds a property from a pair of field projections.
  ///
  /// ```
  /// use fibre_config::Property;
  ///
  /// struct Limits {
  ///   max_connections: u32,
  /// }
  ///
  /// let property = Property::<Limits>::scalar("MaxConnections", |l| &l.max_connections, |l| &mut l.max_connections);
  /// assert_eq!(property.descriptor().name, "MaxConnections");
  /// ```
  pub fn scalar<S, G, M>(name: &'static str, get: G, get_mut: M) -> Self
  where
    S: Scalar + 'static,
    G: Fn(&T) -> &S + Send + Sync + 'static,
    M: Fn(&mut T) -> &mut S + Send + Sync + 'static,
  {
    let ty = S::descriptor();
    let get_mut = Arc::new(get_mut);
    Self {
      descriptor: PropertyDescriptor {
        name,
        nullable: ty.is_nullable(),
        ty,
      },
      read: Box::new(move |target: &T| get(target).to_value()),
      prepare: Box::new(move |value: Value| {
        let typed = S::from_value(value)?;
        let get_mut = Arc::clone(&get_mut);
        Ok(Assignment(Box::new(move |target: &mut T| {
          *(*get_mut)(target) = typed;
        })))
      }),
    }
  }
}

impl<T> Property<T> {
  pub fn descriptor(&self) -> &PropertyDescriptor {
    &self.descriptor
  }

  pub fn name(&self) -> &'static str {
    self.descriptor.name
  }

  /// Reads the property's current value off `target`.
  pub fn read(&self, target: &T) -> Value {
    (self.read)(target)
  }

  /// Turns an already converted value into the property's type without
  /// touching any object.
  pub fn prepare(&self, value: Value) -> Result<Assignment<T>, ConversionError> {
    (self.prepare)(value)
  }
}

impl<T> fmt::Debug for Property<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Property")
      .field("descriptor", &self.descriptor)
      .finish_non_exhaustive()
  }
}

/// The ordered list of properties bound for a type. Immutable once built.
pub struct BindingPlan<T> {
  section: &'static str,
  properties: Vec<Property<T>>,
}

impl<T: Configurable> BindingPlan<T> {
  /// Introspects `T` and validates that its property keys are unique.
  pub fn build() -> Result<Self, ConversionError> {
    let properties = T::properties();
    let mut seen = HashSet::with_capacity(properties.len());
    for property in &properties {
      if !seen.insert(property.name()) {
        return Err(ConversionError::DuplicateProperty {
          name: property.name().to_string(),
        });
      }
    }
    Ok(Self {
      section: T::section(),
      properties,
    })
  }
}

impl<T> BindingPlan<T> {
  pub fn section(&self) -> &'static str {
    self.section
  }

  pub fn properties(&self) -> &[Property<T>] {
    &self.properties
  }

  pub fn descriptors(&self) -> impl Iterator<Item = &PropertyDescriptor> {
    self.properties.iter().map(Property::descriptor)
  }

  pub fn len(&self) -> usize {
    self.properties.len()
  }

  pub fn is_empty(&self) -> bool {
    self.properties.is_empty()
  }
}

impl<T> fmt::Debug for BindingPlan<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("BindingPlan")
      .field("section", &self.section)
      .field("properties", &self.properties)
      .finish()
  }
}
