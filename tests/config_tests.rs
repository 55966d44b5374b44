//! Configuration loading and credential resolution tests
//!
//! Env-var names are unique per test because the test harness runs tests
//! in parallel within one process.

use sensorsim::config::{ConfigError, SimulatorConfig};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn loads_full_config_from_file() {
    let file = write_config(
        r#"
[mqtt]
broker_host = "broker.test"
broker_port = 1884
channel_id_env = "CFG_TEST_CHANNEL"
client_id_env = "CFG_TEST_CLIENT"
username_env = "CFG_TEST_USER"
password_env = "CFG_TEST_PASS"

[publish]
interval_secs = 60
poll_backoff_secs = 3
"#,
    );

    let config = SimulatorConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.mqtt.broker_host, "broker.test");
    assert_eq!(config.mqtt.broker_port, 1884);
    assert_eq!(config.publish.interval_secs, 60);
    assert_eq!(config.publish.poll_backoff_secs, 3);
}

#[test]
fn load_with_explicit_missing_file_fails() {
    let result = SimulatorConfig::load(Some(std::path::Path::new(
        "/nonexistent/sensorsim.toml",
    )));
    assert!(matches!(result, Err(ConfigError::FileRead(_))));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let file = write_config("[mqtt\nbroker_host = ");
    let result = SimulatorConfig::load_from_file(file.path());
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn zero_interval_in_file_is_rejected_at_load() {
    let file = write_config("[publish]\ninterval_secs = 0\n");
    let result = SimulatorConfig::load_from_file(file.path());
    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
}

// Scenario: credentials fully absent. Resolution fails before any network
// activity, naming the first missing variable.
#[test]
fn absent_credentials_fail_resolution() {
    let file = write_config(
        r#"
[mqtt]
channel_id_env = "CREDS_TEST_ABSENT_CHANNEL"
client_id_env = "CREDS_TEST_ABSENT_CLIENT"
username_env = "CREDS_TEST_ABSENT_USER"
password_env = "CREDS_TEST_ABSENT_PASS"
"#,
    );

    let config = SimulatorConfig::load_from_file(file.path()).unwrap();
    let err = config.resolve_credentials().unwrap_err();
    match err {
        ConfigError::MissingCredential(name) => {
            assert_eq!(name, "CREDS_TEST_ABSENT_CHANNEL");
        }
        other => panic!("expected MissingCredential, got {other:?}"),
    }
}

#[test]
fn partial_credentials_still_fail() {
    std::env::set_var("CREDS_TEST_PARTIAL_CHANNEL", "123456");
    std::env::set_var("CREDS_TEST_PARTIAL_CLIENT", "client-1");
    // username and password left unset

    let file = write_config(
        r#"
[mqtt]
channel_id_env = "CREDS_TEST_PARTIAL_CHANNEL"
client_id_env = "CREDS_TEST_PARTIAL_CLIENT"
username_env = "CREDS_TEST_PARTIAL_USER"
password_env = "CREDS_TEST_PARTIAL_PASS"
"#,
    );

    let config = SimulatorConfig::load_from_file(file.path()).unwrap();
    assert!(matches!(
        config.resolve_credentials(),
        Err(ConfigError::MissingCredential(_))
    ));
}

#[test]
fn complete_credentials_resolve() {
    std::env::set_var("CREDS_TEST_FULL_CHANNEL", "123456");
    std::env::set_var("CREDS_TEST_FULL_CLIENT", "client-1");
    std::env::set_var("CREDS_TEST_FULL_USER", "user-1");
    std::env::set_var("CREDS_TEST_FULL_PASS", "secret");

    let file = write_config(
        r#"
[mqtt]
channel_id_env = "CREDS_TEST_FULL_CHANNEL"
client_id_env = "CREDS_TEST_FULL_CLIENT"
username_env = "CREDS_TEST_FULL_USER"
password_env = "CREDS_TEST_FULL_PASS"
"#,
    );

    let config = SimulatorConfig::load_from_file(file.path()).unwrap();
    let credentials = config.resolve_credentials().unwrap();
    assert_eq!(credentials.channel_id, "123456");
    assert_eq!(credentials.client_id, "client-1");
    assert_eq!(credentials.username, "user-1");
    assert_eq!(credentials.password, "secret");
    assert_eq!(credentials.broker_host, "mqtt3.thingspeak.com");
    assert_eq!(credentials.broker_port, 1883);
}
