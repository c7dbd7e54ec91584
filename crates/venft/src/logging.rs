use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::Error;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` is used, and an
/// unparsable filter falls back to `info`. Fails if a subscriber is already set.
pub fn init_logging(default_filter: &str) -> Result<(), Error> {
    tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| Error::Config(format!("logging: {e}")))
}

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| configured_filter(default_filter))
}

fn configured_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_new(default_filter).unwrap_or_else(|_| EnvFilter::new("info"))
}
