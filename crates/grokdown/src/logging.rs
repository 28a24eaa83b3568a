//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "grokdown=debug,grokdown_core=debug";

/// Error returned when a global subscriber is already installed.
pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Install a stderr subscriber. Only called with `--debug`.
///
/// `RUST_LOG` takes precedence over the default filter.
pub fn init_debug() -> Result<(), InitError> {
    let filter =
        EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(filter)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_install_is_reported() {
        let _ = init_debug();
        assert!(init_debug().is_err());
    }
}
