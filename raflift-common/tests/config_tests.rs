//! Tests for configuration resolution
//!
//! Priority order: CLI → environment → TOML → compiled default.
//! Missing or unparsable TOML must not abort resolution.
//!
//! Note: Uses serial_test to prevent environment variable races. Every test
//! that reads or writes RAFLIFT_* variables is marked #[serial].

use raflift_common::config::{
    read_toml_config, CompiledDefaults, ConfigResolver, ENV_BIND, ENV_DATABASE,
};
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// In-memory log sink for asserting on warnings
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn clear_env() {
    env::remove_var(ENV_DATABASE);
    env::remove_var(ENV_BIND);
}

fn write_config(dir: &tempfile::TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_compiled_defaults() {
    let defaults = CompiledDefaults::for_current_platform();

    assert!(defaults.database.ends_with("raflift.db"));
    assert_eq!(defaults.bind.to_string(), "127.0.0.1:5728");
    assert_eq!(defaults.log_level, "info");
}

#[test]
#[serial]
fn test_missing_config_file_uses_defaults() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();

    let config = ConfigResolver::new()
        .with_config_file(Some(dir.path().join("absent.toml")))
        .resolve()
        .unwrap();

    let defaults = CompiledDefaults::for_current_platform();
    assert_eq!(config.database, defaults.database);
    assert_eq!(config.bind, defaults.bind);
}

#[test]
#[serial]
fn test_toml_values_used() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
        database = "/tmp/from-toml.db"
        bind = "0.0.0.0:9000"

        [logging]
        level = "debug"
        "#,
    );

    let config = ConfigResolver::new()
        .with_config_file(Some(path))
        .resolve()
        .unwrap();

    assert_eq!(config.database, PathBuf::from("/tmp/from-toml.db"));
    assert_eq!(config.bind.to_string(), "0.0.0.0:9000");
    assert_eq!(config.log_level, "debug");
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "database = \"/tmp/from-toml.db\"\n");

    env::set_var(ENV_DATABASE, "/tmp/from-env.db");
    env::set_var(ENV_BIND, "127.0.0.1:6000");

    let config = ConfigResolver::new()
        .with_config_file(Some(path))
        .resolve()
        .unwrap();

    clear_env();
    assert_eq!(config.database, PathBuf::from("/tmp/from-env.db"));
    assert_eq!(config.bind.to_string(), "127.0.0.1:6000");
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    clear_env();
    env::set_var(ENV_DATABASE, "/tmp/from-env.db");

    let dir = tempfile::tempdir().unwrap();
    let config = ConfigResolver::new()
        .with_config_file(Some(dir.path().join("absent.toml")))
        .with_database(Some(PathBuf::from("/tmp/from-cli.db")))
        .with_bind(Some("127.0.0.1:7000".to_string()))
        .resolve()
        .unwrap();

    clear_env();
    assert_eq!(config.database, PathBuf::from("/tmp/from-cli.db"));
    assert_eq!(config.bind.to_string(), "127.0.0.1:7000");
}

#[test]
#[serial]
fn test_unparsable_toml_falls_back_to_defaults() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "this is = = not toml");

    assert!(read_toml_config(&path).is_err());

    let config = ConfigResolver::new()
        .with_config_file(Some(path))
        .resolve()
        .unwrap();
    assert_eq!(config.database, CompiledDefaults::for_current_platform().database);
}

#[test]
#[serial]
fn test_invalid_bind_address_is_error() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();

    let result = ConfigResolver::new()
        .with_config_file(Some(dir.path().join("absent.toml")))
        .with_bind(Some("not-an-address".to_string()))
        .resolve();

    assert!(result.is_err());
}

#[test]
#[serial]
fn test_unparsable_toml_logs_warning() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "bind = [broken");

    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();

    let config = tracing::subscriber::with_default(subscriber, || {
        ConfigResolver::new().with_config_file(Some(path)).resolve()
    })
    .unwrap();

    let output = logs.contents();
    assert!(output.contains("WARN"), "no warning logged: {}", output);
    assert!(output.contains("using defaults"));
    assert_eq!(config.bind, CompiledDefaults::for_current_platform().bind);
}

#[test]
#[serial]
fn test_missing_explicit_config_file_logs_warning() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();

    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        ConfigResolver::new()
            .with_config_file(Some(dir.path().join("absent.toml")))
            .resolve()
    })
    .unwrap();

    assert!(logs.contents().contains("Config file not found"));
}
