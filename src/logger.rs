use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Install the global tracing subscriber, writing to stderr.
///
/// Level precedence: `--log-level`, then `[logging] level`, then `RUST_LOG`,
/// then `info` (`warn` when `quiet`).
pub fn init(cli_level: Option<&str>, config: &LoggingConfig, quiet: bool) {
    let fallback = if quiet { "warn" } else { "info" };
    let level = cli_level
        .map(str::to_string)
        .or_else(|| config.level.clone())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| fallback.to_string());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
