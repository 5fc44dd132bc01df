//! Tracing initialisation for tests.
//!
//! The subscriber is installed at most once per process; later calls are
//! no-ops, so every test may call [`init_test_tracing`] freely.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset: our crates at debug, the HTTP
/// stack at warn.
pub const DEFAULT_TEST_FILTER: &str = "warn,replyai_core=debug,replyai_config=debug";

/// Route tracing output to the test-harness writer, honouring `RUST_LOG`.
///
/// ```ignore
/// #[tokio::test]
/// async fn registry_logs_skipped_providers() {
///     replyai_test_utils::tracing_setup::init_test_tracing();
///     let _ = ProviderRegistry::from_config_with_env(&config, no_env);
/// }
/// ```
pub fn init_test_tracing() {
    init_test_tracing_with(DEFAULT_TEST_FILTER);
}

/// Like [`init_test_tracing`] with an explicit fallback filter.
pub fn init_test_tracing_with(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_test_writer()
        .try_init();
}
