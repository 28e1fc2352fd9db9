//! Test logging shared by unit tests (via the backend's `test_bootstrap`) and
//! integration test binaries (via `tests/common`).

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Quiet unless asked otherwise.
pub const DEFAULT_TEST_FILTER: &str = "warn";

/// Filter directive: `TEST_LOG` wins over `RUST_LOG`; blank values are skipped.
pub fn filter_directive(test_log: Option<&str>, rust_log: Option<&str>) -> String {
    [test_log, rust_log]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|d| !d.is_empty())
        .unwrap_or(DEFAULT_TEST_FILTER)
        .to_string()
}

/// Install a test-writer subscriber once per process. Never panics if another
/// subscriber got there first.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let test_log = std::env::var("TEST_LOG").ok();
        let rust_log = std::env::var("RUST_LOG").ok();
        let directive = filter_directive(test_log.as_deref(), rust_log.as_deref());

        fmt()
            .with_env_filter(EnvFilter::new(directive))
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
