use tracing::metadata::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{filter, fmt, Layer};

use crate::config::Config;

/// Installs the global subscriber unless logging is off. Only events from
/// this crate are kept.
///
/// Calling it twice is harmless; the second subscriber is dropped.
pub fn init(config: &Config) {
    if config.log_level == LevelFilter::OFF {
        return;
    }

    let layer = fmt::Layer::new()
        .with_writer(std::io::stderr)
        .with_ansi(config.colored_logs)
        .with_target(true)
        .with_filter(config.log_level)
        .with_filter(filter::filter_fn(|metadata| {
            metadata.target().starts_with("gk2")
        }))
        .boxed();

    if tracing::subscriber::set_global_default(tracing_subscriber::Registry::default().with(layer))
        .is_err()
    {
        tracing::debug!("global subscriber already set");
    }
}
