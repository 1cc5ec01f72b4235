use std::env;

use tracing::metadata::LevelFilter;

pub const LOG_LEVEL_VAR: &str = "GK2_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Most verbose level that reaches stderr; `OFF` disables logging.
    pub log_level: LevelFilter,
    /// Should logs be colored?
    pub colored_logs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::WARN,
            colored_logs: true,
        }
    }
}

impl Config {
    /// Configuration for the `gk2` binary, taken from `GK2_LOG_LEVEL` and
    /// `NO_COLOR`.
    pub fn from_env() -> Config {
        Config {
            log_level: Self::log_level(env::var(LOG_LEVEL_VAR).ok().as_deref()),
            colored_logs: env::var_os("NO_COLOR").is_none(),
        }
    }

    pub fn log_level(value: Option<&str>) -> LevelFilter {
        value
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(LevelFilter::WARN)
    }

    pub fn verbose(mut self, verbose: bool) -> Config {
        if verbose && self.log_level < LevelFilter::DEBUG {
            self.log_level = LevelFilter::DEBUG;
        }
        self
    }
}
