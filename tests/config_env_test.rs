// Runs in its own binary so the TTL variable cannot leak into other tests.

use boxshelf::core::ConfigProvider;
use boxshelf::{BoxshelfError, TomlConfig};

#[test]
fn test_ttl_env_fallback() {
    std::env::set_var("TTL", "15");
    let config = TomlConfig::from_toml_str("").unwrap();
    assert_eq!(config.cache_ttl_seconds(), 15);

    // An explicit setting wins over the environment.
    let config = TomlConfig::from_toml_str("[cache]\nttl_seconds = 90\n").unwrap();
    assert_eq!(config.cache_ttl_seconds(), 90);

    std::env::set_var("TTL", "soon");
    let err = TomlConfig::from_toml_str("").unwrap_err();
    assert!(matches!(err, BoxshelfError::ConfigError { .. }));

    std::env::remove_var("TTL");
    let config = TomlConfig::from_toml_str("").unwrap();
    assert_eq!(config.cache_ttl_seconds(), 60);
}
