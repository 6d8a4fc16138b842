use std::sync::Once;

static INIT: Once = Once::new();

/// Install a test-writer tracing subscriber once per test binary.
///
/// Honors `RUST_LOG`; without it only warnings and errors are shown so test
/// output stays readable.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .finish();

        // Another harness may already have installed a subscriber.
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
