//! Loads a settings object from a YAML file, bumps a counter, clears an
//! optional field and writes it back.
//!
//! Run with `RUST_LOG=debug` to see the binder and store at work.

use fibre_config::{configuration, Binder};
use fibre_config_stores::FileStore;
use tracing_subscriber::EnvFilter;

configuration! {
  #[derive(Debug, Default)]
  pub struct TestObject {
    pub test_string: String => "TestString",
    pub test_int: i32 => "TestInt",
    pub test_nullable_int: Option<i32> => "TestNullableInt",
  }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let path = std::env::args()
    .nth(1)
    .unwrap_or_else(|| "roundtrip.yaml".to_string());
  let store = FileStore::builder()
    .path(&path)
    .create_if_missing(true)
    .build()?;
  let binder = Binder::new(store);

  let mut settings = TestObject::default();
  binder.load_into(&mut settings)?;
  println!("Loaded from {}: {:?}", path, settings);

  settings.test_int += 1;
  settings.test_nullable_int = None;
  binder.save(&settings)?;
  println!("Saved: {:?}", settings);

  Ok(())
}
