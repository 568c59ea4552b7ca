#![allow(dead_code)]

use fibre_config::configuration;

configuration! {
  #[derive(Debug, Default, Clone, PartialEq)]
  pub struct TestConfigurationObject {
    pub test_string: String => "TestString",
    pub test_int: i32 => "TestInt",
    pub test_nullable_int: Option<i32> => "TestNullableInt",
  }
}

/// The document the load tests start from.
pub const LOAD_TEST_YAML: &str = "\
TestConfigurationObject:
  TestString: default
  TestInt: 10
  TestNullableInt: ''
";
