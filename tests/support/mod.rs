//! Shared test support utilities.
//!
//! This module provides helpers for integration tests: tree fixtures,
//! client recipes built on the public recipe API, and tracing setup.

#![allow(dead_code)]

pub mod fixtures;
pub mod recipes;

use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a test subscriber once per test binary.
///
/// Honors `RUST_LOG`; defaults to `warn` so recipe errors show up in failing
/// test output.
pub fn init_tracing() {
    TRACING.call_once(|| {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_test_writer()
            .try_init();
    });
}
