//! # Fibre Config
//!
//! Binds plain Rust structs to named key-value configuration sections.
//!
//! A store hands out a flat map of string keys to raw values per section. The
//! [`Binder`] reads such a section into a typed object, or writes the object's
//! fields back out as strings.
//!
//! ## Core Concepts
//!
//! - **Configurable**: a type whose fields are bound. Declared with [`configuration!`].
//!   Its section name is the type name.
//! - **Conversion rules**: [`convert`] turns raw values into typed values with
//!   locale-invariant parsing. `Option<T>` fields read both null and `""` as `None`.
//! - **Binding plan**: the ordered property list of a type, built once and kept in a
//!   thread-safe [`PlanCache`].
//! - **Store**: any [`ConfigurationStore`]. [`MemoryStore`] is included; file and
//!   table backed stores live in `fibre_config_stores`.
//!
//! Loading has patch semantics: keys missing from the store leave fields as they
//! are. A value that fails to convert aborts the load before any field changes.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_config::{configuration, Binder, MemoryStore};
//!
//! configuration! {
//!   #[derive(Debug, Default, PartialEq)]
//!   pub struct TestConfigurationObject {
//!     pub test_string: String => "TestString",
//!     pub test_int: i32 => "TestInt",
//!     pub test_nullable_int: Option<i32> => "TestNullableInt",
//!   }
//! }
//!
//! let binder = Binder::new(MemoryStore::new());
//!
//! let original = TestConfigurationObject {
//!   test_string: "x".to_string(),
//!   test_int: -1,
//!   test_nullable_int: None,
//! };
//! binder.save(&original).unwrap();
//!
//! let loaded: TestConfigurationObject = binder.load().unwrap();
//! assert_eq!(loaded, original);
//! ```

mod binder;
mod cache;
mod conversion;
mod error;
mod macros;
mod plan;
mod scalar;
mod store;
mod value;

pub use binder::Binder;
pub use cache::PlanCache;
pub use conversion::{convert, ScalarKind, TypeDescriptor};
pub use error::{ConversionError, Error, Result};
pub use plan::{Assignment, BindingPlan, Configurable, Property, PropertyDescriptor};
pub use scalar::Scalar;
pub use store::{ensure_section, same_key, ConfigurationStore, MemoryStore};
pub use value::{Value, Values, DATE_FORMAT, DATE_TIME_FORMAT};
