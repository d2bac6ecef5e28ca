//! Tests for the reloadable tracing setup

mod helpers;

use helpers::CapturedLogs;
use raflift_an::logging::reloadable_subscriber;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[test]
fn test_config_level_replaces_startup_filter() {
    let logs = CapturedLogs::default();
    let (subscriber, handle) = reloadable_subscriber(EnvFilter::new("info"), false, logs.clone());

    tracing::subscriber::with_default(subscriber, || {
        info!("before reload");
        handle.apply_config_level("warn").unwrap();
        info!("suppressed after reload");
        warn!("still shown after reload");
    });

    let output = logs.contents();
    assert!(output.contains("before reload"));
    assert!(!output.contains("suppressed after reload"));
    assert!(output.contains("still shown after reload"));
}

#[test]
fn test_env_filter_is_not_overridden() {
    let logs = CapturedLogs::default();
    let (subscriber, handle) = reloadable_subscriber(EnvFilter::new("info"), true, logs.clone());

    tracing::subscriber::with_default(subscriber, || {
        handle.apply_config_level("error").unwrap();
        info!("info kept under RUST_LOG");
    });

    assert!(logs.contents().contains("info kept under RUST_LOG"));
}

#[test]
fn test_invalid_config_level_is_error() {
    let (_subscriber, handle) =
        reloadable_subscriber(EnvFilter::new("info"), false, CapturedLogs::default());

    assert!(handle.apply_config_level("raflift=notalevel").is_err());
}
