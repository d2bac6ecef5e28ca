//! Tracing setup
//!
//! The subscriber is installed before configuration is resolved so config
//! warnings are visible. Its filter starts at `RUST_LOG` (or INFO) and is
//! swapped for the configured level once config is known, unless `RUST_LOG`
//! was set.

use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    prelude::*,
    reload, EnvFilter, Registry,
};

/// Handle for applying the configured log level after startup
pub struct LogLevelHandle {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogLevelHandle {
    /// Replace the filter with `level`; no-op when `RUST_LOG` is in effect
    pub fn apply_config_level(&self, level: &str) -> anyhow::Result<()> {
        if self.from_env {
            return Ok(());
        }
        let filter = EnvFilter::try_new(level)?;
        self.handle.reload(filter)?;
        Ok(())
    }
}

/// Subscriber with a reloadable filter writing to `writer`
pub fn reloadable_subscriber<W>(
    filter: EnvFilter,
    from_env: bool,
    writer: W,
) -> (impl Subscriber + Send + Sync + 'static, LogLevelHandle)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let (filter, handle) = reload::Layer::new(filter);
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer));

    (subscriber, LogLevelHandle { handle, from_env })
}

/// Install the global subscriber on stdout
pub fn init_tracing() -> LogLevelHandle {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new("info"), false),
    };

    let (subscriber, handle) = reloadable_subscriber(filter, from_env, std::io::stdout);
    subscriber.init();
    handle
}
