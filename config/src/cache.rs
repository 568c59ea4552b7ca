//! The binding plan cache.

use crate::error::{Error, Result};
use crate::plan::{BindingPlan, Configurable};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct PlanKey {
  type_id: TypeId,
  type_name: &'static str,
}

impl PlanKey {
  fn of<T: Any>() -> Self {
    Self {
      type_id: TypeId::of::<T>(),
      type_name: type_name::<T>(),
    }
  }
}

impl fmt::Debug for PlanKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "PlanKey({})", self.type_name)
  }
}

/// Memoizes one [`BindingPlan`] per configuration type.
///
/// The cache is thread-safe. The first request for a type builds its plan while
/// holding the map entry, so concurrent first requests for the same type
/// serialize and observe a single plan. Requests for other types only contend
/// when they land on the same shard. Plans are never evicted or rebuilt.
#[derive(Default)]
pub struct PlanCache {
  // Each value is an `Arc<BindingPlan<T>>` for the `T` named by its key.
  plans: DashMap<PlanKey, Box<dyn Any + Send + Sync>>,
}

impl PlanCache {
  /// Creates a new, empty `PlanCache`.
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns the plan for `T`, building and caching it on first use.
  ///
  /// # Errors
  ///
  /// [`Error::Plan`] if `T` declares an invalid set of properties. Nothing is
  /// cached in that case.
  pub fn get_or_build<T: Configurable>(&self) -> Result<Arc<BindingPlan<T>>> {
    let key = PlanKey::of::<T>();

    if let Some(plan) = self.plans.get(&key) {
      return Ok(downcast::<T>(&**plan.value()));
    }

    match self.plans.entry(key) {
      Entry::Occupied(entry) => Ok(downcast::<T>(&**entry.get())),
      Entry::Vacant(entry) => {
        let plan = BindingPlan::<T>::build().map_err(|source| Error::Plan {
          type_name: key.type_name,
          source,
        })?;
        let plan = Arc::new(plan);
        tracing::debug!(
          type_name = key.type_name,
          section = plan.section(),
          properties = plan.len(),
          "built binding plan"
        );
        entry.insert(Box::new(plan.clone()));
        Ok(plan)
      }
    }
  }

  /// Returns `true` if a plan for `T` has been built.
  pub fn contains<T: Configurable>(&self) -> bool {
    self.plans.contains_key(&PlanKey::of::<T>())
  }

  pub fn len(&self) -> usize {
    self.plans.len()
  }

  pub fn is_empty(&self) -> bool {
    self.plans.is_empty()
  }
}

impl fmt::Debug for PlanCache {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let keys: Vec<PlanKey> = self.plans.iter().map(|entry| *entry.key()).collect();
    f.debug_struct("PlanCache").field("plans", &keys).finish()
  }
}

fn downcast<T: Configurable>(stored: &(dyn Any + Send + Sync)) -> Arc<BindingPlan<T>> {
  match stored.downcast_ref::<Arc<BindingPlan<T>>>() {
    Some(plan) => plan.clone(),
    // Keys are derived from `TypeId::of::<T>()`, so the stored type always matches.
    None => unreachable!("plan cache entry for {} holds a foreign type", type_name::<T>()),
  }
}
