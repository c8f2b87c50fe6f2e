// Configuration tests - verify config parsing, validation and session sizing

use fdready::application::config::loader::ConfigLoader;
use fdready::mux::{Delivery, Session};
use std::fs;

#[test]
fn test_config_file_round_trip_into_session() {
    let toml_content = r#"
log_level = "warn"
max_descriptors = 128
poll_timeout_ms = 10
event_capacity = 32
"#;

    let temp_file = std::env::temp_dir().join("fdready_test_config.toml");
    fs::write(&temp_file, toml_content).unwrap();

    let config = ConfigLoader::load(temp_file.to_str().unwrap()).unwrap();
    let session = Session::start_with(&config, Vec::<Delivery>::new()).unwrap();
    assert!(session.max_fd() <= 128);
    assert_eq!(session.armed_count(), 0);
}

#[test]
fn test_invalid_values_rejected() {
    for content in [
        "max_descriptors = 0",
        "poll_timeout_ms = -2",
        "event_capacity = 0",
        r#"log_level = "verbose""#,
    ] {
        assert!(ConfigLoader::load_from_str(content).is_err(), "{}", content);
    }
}

#[test]
fn test_malformed_toml_rejected() {
    let temp_file = std::env::temp_dir().join("fdready_test_invalid_config.toml");
    fs::write(&temp_file, "max_descriptors = [").unwrap();
    assert!(ConfigLoader::load(temp_file.to_str().unwrap()).is_err());
}
