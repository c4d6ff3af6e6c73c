// src/utils/logging.rs
//! `env_logger` setup for binaries and tests embedding the authority.

use env_logger::{Builder, Env};

/// Installs the global logger. `RUST_LOG` overrides `default_level`.
/// Calling it again after a logger is installed is a no-op.
pub fn init_logging(default_level: &str) {
    let _ = Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .try_init();
}

/// Logger for unit and integration tests; output is captured per test.
pub fn init_test_logging() {
    let _ = Builder::from_env(Env::default().default_filter_or("debug"))
        .is_test(true)
        .try_init();
}
