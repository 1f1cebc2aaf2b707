//! Diagnostic logging for the `blindjack` binary.
//!
//! Output goes to stderr so that command output on stdout stays parseable.
//! The filter comes from `BLINDJACK_LOG`, then `RUST_LOG`, and defaults to
//! `warn`.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "BLINDJACK_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Filter directive in effect for the current environment.
pub fn filter_directive() -> String {
    [LOG_ENV, "RUST_LOG"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Installs the global subscriber. Calling it again is a no-op.
pub fn init() {
    let directive = filter_directive();
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear() {
        unsafe {
            std::env::remove_var(LOG_ENV);
            std::env::remove_var("RUST_LOG");
        }
    }

    #[test]
    #[serial]
    fn defaults_to_warn() {
        clear();
        assert_eq!(filter_directive(), "warn");
    }

    #[test]
    #[serial]
    fn own_variable_wins_over_rust_log() {
        clear();
        unsafe {
            std::env::set_var("RUST_LOG", "info");
            std::env::set_var(LOG_ENV, "blindjack_engine=debug");
        }
        assert_eq!(filter_directive(), "blindjack_engine=debug");
        unsafe {
            std::env::remove_var(LOG_ENV);
        }
        assert_eq!(filter_directive(), "info");
        clear();
    }

    #[test]
    #[serial]
    fn init_twice_is_harmless() {
        clear();
        init();
        init();
    }
}
