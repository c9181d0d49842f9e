//! Logging Infrastructure
//!
//! Structured logging via `tracing`, filterable with `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise defaults to info-level output for
/// the server and tower-http request traces.
pub fn init_logger() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sales_server=info,tower_http=info".into()),
        )
        .init();
}
