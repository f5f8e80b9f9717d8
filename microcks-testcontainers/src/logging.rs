//! Logging setup for test suites

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "microcks_testcontainers=info,microcks_client=info";

/// Install a `tracing` subscriber whose output is captured by the test harness
///
/// Honours `RUST_LOG`. Safe to call from every test: only the first call
/// installs the subscriber.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
