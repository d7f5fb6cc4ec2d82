use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "ombre_engine=debug,wgpu=warn"). When unset, `RUST_LOG` is used, then
/// `info`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Maps a `-v` count to a filter. Zero keeps the environment default.
    ///
    /// wgpu stays at `warn` below trace level; it is very chatty at debug.
    pub fn from_verbosity(verbose: u8) -> Self {
        let env_filter = match verbose {
            0 => None,
            1 => Some("info,ombre_engine=debug,ombre_studio=debug,wgpu=warn,naga=warn"),
            2 => Some("debug,ombre_engine=trace,ombre_studio=trace,wgpu=warn,naga=warn"),
            _ => Some("trace"),
        };
        Self {
            env_filter: env_filter.map(str::to_string),
            ..Self::default()
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored.
/// Intended usage is early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.write_style(config.write_style);
        builder.init();

        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_filters() {
        assert_eq!(LoggingConfig::from_verbosity(0).env_filter, None);
        let debug = LoggingConfig::from_verbosity(1).env_filter.unwrap();
        assert!(debug.contains("ombre_engine=debug"));
        assert!(debug.contains("wgpu=warn"));
        assert_eq!(LoggingConfig::from_verbosity(9).env_filter.as_deref(), Some("trace"));
    }

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig::from_verbosity(1));
        init_logging(LoggingConfig::default());
        log::debug!("still fine");
    }
}
