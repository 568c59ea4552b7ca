//! The `Binder`: loads configuration objects from a store and saves them back.

use crate::cache::PlanCache;
use crate::conversion::convert;
use crate::error::{Error, Result};
use crate::plan::{Assignment, BindingPlan, Configurable};
use crate::store::{ensure_section, ConfigurationStore};
use crate::value::Values;
use std::sync::Arc;

/// Binds [`Configurable`] objects to a [`ConfigurationStore`].
///
/// Every binder owns a handle to a [`PlanCache`]. Binders created with
/// [`Binder::with_cache`] can share one cache so each type is introspected
/// once per process rather than once per binder.
///
/// ```
/// use fibre_config::{configuration, Binder, MemoryStore};
///
/// configuration! {
///   #[derive(Debug, Default)]
///   pub struct ServerSettings {
///     pub host: String => "Host",
///     pub port: u16 => "Port",
///     pub timeout_secs: Option<u32> => "TimeoutSecs",
///   }
/// }
///
/// let store = MemoryStore::new().with_section(
///   "ServerSettings",
///   [("Host", "localhost"), ("Port", "8080"), ("TimeoutSecs", "")],
/// );
/// let binder = Binder::new(store);
///
/// let settings: ServerSettings = binder.load().unwrap();
/// assert_eq!(settings.host, "localhost");
/// assert_eq!(settings.port, 8080);
/// assert_eq!(settings.timeout_secs, None);
/// ```
#[derive(Debug)]
pub struct Binder<S> {
  store: S,
  plans: Arc<PlanCache>,
}

impl<S: ConfigurationStore> Binder<S> {
  /// Creates a binder with its own, empty plan cache.
  pub fn new(store: S) -> Self {
    Self::with_cache(store, Arc::new(PlanCache::new()))
  }

  /// Creates a binder that shares `plans` with other binders.
  pub fn with_cache(store: S, plans: Arc<PlanCache>) -> Self {
    Self { store, plans }
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  pub fn plans(&self) -> &Arc<PlanCache> {
    &self.plans
  }

  /// Constructs a default `T` and loads its section into it.
  pub fn load<T: Configurable + Default>(&self) -> Result<T> {
    let mut target = T::default();
    self.load_into(&mut target)?;
    Ok(target)
  }

  /// Loads `T`'s section into `target`.
  ///
  /// Only properties whose key is present in the section are assigned; all
  /// other fields keep their current value. Every present value is converted
  /// before anything is assigned, so a conversion failure leaves `target`
  /// untouched.
  ///
  /// # Errors
  ///
  /// - [`Error::Argument`] if `T`'s section name is empty.
  /// - [`Error::Conversion`] if a stored value does not fit its property.
  /// - [`Error::Plan`] if `T` declares duplicate property keys.
  /// - Any error returned by the store.
  pub fn load_into<T: Configurable>(&self, target: &mut T) -> Result<()> {
    let section = T::section();
    ensure_section(section)?;

    let mut values = self.store.get_values(section)?;
    let plan = self.plans.get_or_build::<T>()?;

    let staged = stage(&plan, &mut values)?;
    let assigned = staged.len();
    for (name, assignment) in staged {
      assignment.apply(target);
      tracing::trace!(section, property = name, "assigned property");
    }

    tracing::debug!(section, assigned, available = plan.len(), "loaded section");
    Ok(())
  }

  /// Writes every property of `source` into `T`'s section.
  ///
  /// Non-null values are stored as invariant strings; `None` is stored as null.
  ///
  /// # Errors
  ///
  /// - [`Error::Argument`] if `T`'s section name is empty.
  /// - [`Error::Plan`] if `T` declares duplicate property keys.
  /// - Any error returned by the store.
  pub fn save<T: Configurable>(&self, source: &T) -> Result<()> {
    let section = T::section();
    ensure_section(section)?;

    let plan = self.plans.get_or_build::<T>()?;
    let values: Values = plan
      .properties()
      .iter()
      .map(|property| (property.name().to_string(), property.read(source).into_raw()))
      .collect();

    self.store.set_values(section, &values)?;
    tracing::debug!(section, written = values.len(), "saved section");
    Ok(())
  }

  /// Returns `true` if the store holds at least one entry for `T`'s section.
  pub fn exists<T: Configurable>(&self) -> Result<bool> {
    let section = T::section();
    ensure_section(section)?;
    Ok(!self.store.get_values(section)?.is_empty())
  }
}

/// Converts and types every value present for a plan property, failing on the
/// first value that does not fit. Nothing is assigned here.
fn stage<T>(
  plan: &BindingPlan<T>,
  values: &mut Values,
) -> Result<Vec<(&'static str, Assignment<T>)>> {
  let mut staged = Vec::with_capacity(plan.len());
  for property in plan.properties() {
    let Some(raw) = values.shift_remove(property.name()) else {
      continue;
    };
    let descriptor = property.descriptor();
    match convert(raw, &descriptor.ty).and_then(|value| property.prepare(value)) {
      Ok(assignment) => staged.push((descriptor.name, assignment)),
      Err(source) => {
        tracing::warn!(
          section = plan.section(),
          property = descriptor.name,
          error = %source,
          "conversion failed, bind aborted"
        );
        return Err(Error::Conversion {
          section: plan.section().to_string(),
          property: descriptor.name.to_string(),
          source,
        });
      }
    }
  }
  Ok(staged)
}
