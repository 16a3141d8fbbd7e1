//! Configuration loading and environment override.

use std::path::Path;

use serial_test::serial;
use templateworks::config::CONFIG_ENV_VAR;
use templateworks::{Config, Language};

#[test]
fn test_round_trip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("templateworks.yaml");

    let config = Config {
        seed_on_bootstrap: false,
        default_language: Language::He,
        store_timeout: 10,
    };
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert!(!loaded.seed_on_bootstrap);
    assert_eq!(loaded.default_language, Language::He);
    assert_eq!(loaded.store_timeout, 10);
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = Config::load_from(&dir.path().join("absent.yaml")).unwrap();
    assert!(loaded.seed_on_bootstrap);
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(&path, "seed_on_bootstrap: [not, a, bool]\n").unwrap();
    assert!(Config::load_from(&path).is_err());
}

#[test]
#[serial]
fn test_env_var_overrides_config_path() {
    // SAFETY: marked #[serial] to ensure single-threaded access to the
    // process environment.
    unsafe { std::env::set_var(CONFIG_ENV_VAR, "/tmp/custom-templateworks.yaml") };
    assert_eq!(
        Config::path(),
        Path::new("/tmp/custom-templateworks.yaml")
    );

    unsafe { std::env::remove_var(CONFIG_ENV_VAR) };
    assert_eq!(Config::path(), Path::new("templateworks.yaml"));
}
