use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Used when `RUST_LOG` is unset; the driver is chatty at info.
const DEFAULT_FILTER: &str = "info,actix_web=info,mongodb=warn";

/// JSON lines for deployments; `LOG_FORMAT=pretty` gives human-readable
/// output for local runs against the memory store.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let pretty = std::env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("pretty"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if pretty {
        registry
            .with(fmt::layer().with_target(false).compact())
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_ansi(false)
                    .json()
                    .flatten_event(true),
            )
            .init();
    }
}
