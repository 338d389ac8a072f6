use std::sync::Once;

/// Filter used when neither the config nor `RUST_LOG` provides one.
///
/// wgpu's internals are chatty at `info`; keep them at `warn`.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "trine_engine=debug,wgpu=warn") and takes precedence over `RUST_LOG`.
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

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Subsequent calls are ignored. Call early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(config.env_filter, std::env::var("RUST_LOG").ok());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);

        // `try_init` so a host that already installed a logger keeps it.
        if builder.try_init().is_ok() {
            log::debug!("logging initialized with filter \"{filter}\"");
        }
    });
}

fn resolve_filter(explicit: Option<String>, env: Option<String>) -> String {
    explicit
        .or(env)
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins_over_env() {
        let f = resolve_filter(Some("debug".into()), Some("warn".into()));
        assert_eq!(f, "debug");
    }

    #[test]
    fn env_filter_used_when_no_explicit_filter() {
        assert_eq!(resolve_filter(None, Some("warn".into())), "warn");
    }

    #[test]
    fn blank_filters_fall_back_to_default() {
        assert_eq!(resolve_filter(None, None), DEFAULT_FILTER);
        assert_eq!(resolve_filter(Some("  ".into()), None), DEFAULT_FILTER);
    }
}
