//! Shared test setup

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static TEST_SETUP: Once = Once::new();

/// Install a tracing subscriber for tests. Safe to call from every test
/// binary; only the first call does anything.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
