mod common;

use common::{EveryScalar, TestConfigurationObject};
use fibre_config::{
  configuration, Binder, Configurable, MemoryStore, PlanCache, Property, PropertyDescriptor,
};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc, Barrier,
};
use std::thread;
use std::time::Duration;

fn names(descriptors: &[PropertyDescriptor]) -> Vec<&'static str> {
  descriptors.iter().map(|d| d.name).collect()
}

#[test]
fn test_plan_describes_properties_in_declaration_order() {
  let cache = PlanCache::new();

  let plan = cache.get_or_build::<TestConfigurationObject>().unwrap();

  assert_eq!(plan.section(), "TestConfigurationObject");
  let descriptors: Vec<PropertyDescriptor> = plan.descriptors().cloned().collect();
  assert_eq!(
    names(&descriptors),
    ["TestString", "TestInt", "TestNullableInt"]
  );
  assert!(!descriptors[0].nullable);
  assert!(!descriptors[1].nullable);
  assert!(descriptors[2].nullable);
}

#[test]
fn test_plan_is_built_once_and_shared() {
  let cache = PlanCache::new();

  let first = cache.get_or_build::<TestConfigurationObject>().unwrap();
  let second = cache.get_or_build::<TestConfigurationObject>().unwrap();

  assert!(Arc::ptr_eq(&first, &second));
  assert_eq!(cache.len(), 1);
  assert!(cache.contains::<TestConfigurationObject>());
  assert!(!cache.contains::<EveryScalar>());
}

#[test]
fn test_binders_can_share_a_cache() {
  let cache = Arc::new(PlanCache::new());
  let a = Binder::with_cache(MemoryStore::new(), cache.clone());
  let b = Binder::with_cache(MemoryStore::new(), cache.clone());

  a.save(&TestConfigurationObject::default()).unwrap();
  b.load::<TestConfigurationObject>().unwrap();

  assert_eq!(cache.len(), 1);
  assert!(Arc::ptr_eq(a.plans(), b.plans()));
}

// Counts introspections so the test can tell how many plans were built.
static SLOW_BUILDS: AtomicUsize = AtomicUsize::new(0);

#[derive(Default)]
struct SlowToDescribe {
  alpha: i32,
  beta: Option<String>,
  gamma: bool,
}

impl Configurable for SlowToDescribe {
  fn section() -> &'static str {
    "SlowToDescribe"
  }

  fn properties() -> Vec<Property<Self>> {
    SLOW_BUILDS.fetch_add(1, Ordering::SeqCst);
    // Widen the window in which concurrent first requests could race.
    thread::sleep(Duration::from_millis(50));
    vec![
      Property::<Self>::scalar("Alpha", |s| &s.alpha, |s| &mut s.alpha),
      Property::<Self>::scalar("Beta", |s| &s.beta, |s| &mut s.beta),
      Property::<Self>::scalar("Gamma", |s| &s.gamma, |s| &mut s.gamma),
    ]
  }
}

#[test]
fn test_concurrent_first_requests_build_one_plan() {
  let cache = Arc::new(PlanCache::new());
  let num_threads = 16;
  let barrier = Arc::new(Barrier::new(num_threads));

  let plans: Vec<_> = thread::scope(|s| {
    let handles: Vec<_> = (0..num_threads)
      .map(|_| {
        let cache = cache.clone();
        let barrier = barrier.clone();
        s.spawn(move || {
          barrier.wait();
          cache.get_or_build::<SlowToDescribe>().unwrap()
        })
      })
      .collect();
    handles.into_iter().map(|h| h.join().unwrap()).collect()
  });

  assert_eq!(SLOW_BUILDS.load(Ordering::SeqCst), 1);
  assert_eq!(cache.len(), 1);
  for plan in &plans {
    assert!(Arc::ptr_eq(plan, &plans[0]));
    let descriptors: Vec<PropertyDescriptor> = plan.descriptors().cloned().collect();
    assert_eq!(names(&descriptors), ["Alpha", "Beta", "Gamma"]);
  }
}

configuration! {
  #[derive(Debug, Default, Clone, PartialEq)]
  struct Left {
    shared: i64 => "Shared",
    left_only: String => "LeftOnly",
  }
}

configuration! {
  #[derive(Debug, Default, Clone, PartialEq)]
  struct Right {
    shared: Option<i64> => "Shared",
    right_only: bool => "RightOnly",
  }
}

#[test]
fn test_concurrent_binds_of_different_types_stay_separate() {
  let cache = Arc::new(PlanCache::new());
  let store = Arc::new(MemoryStore::new());
  let rounds = 200;

  thread::scope(|s| {
    for worker in 0..4_i64 {
      let binder = Binder::with_cache(store.clone(), cache.clone());
      s.spawn(move || {
        for round in 0..rounds {
          if worker % 2 == 0 {
            let left = Left {
              shared: round,
              left_only: format!("left-{worker}"),
            };
            binder.save(&left).unwrap();
            let loaded: Left = binder.load().unwrap();
            assert!(loaded.left_only.starts_with("left-"));
          } else {
            let right = Right {
              shared: Some(-round),
              right_only: true,
            };
            binder.save(&right).unwrap();
            let loaded: Right = binder.load().unwrap();
            assert!(loaded.right_only);
            assert!(loaded.shared.unwrap() <= 0);
          }
        }
      });
    }
  });

  assert_eq!(cache.len(), 2);
  let left = cache.get_or_build::<Left>().unwrap();
  let right = cache.get_or_build::<Right>().unwrap();
  let left_names: Vec<_> = left.descriptors().map(|d| d.name).collect();
  let right_names: Vec<_> = right.descriptors().map(|d| d.name).collect();
  assert_eq!(left_names, ["Shared", "LeftOnly"]);
  assert_eq!(right_names, ["Shared", "RightOnly"]);
  assert_eq!(store.entries("Left").len(), 2);
  assert_eq!(store.entries("Right").len(), 2);
}
