//! Observability for the API service.
//!
//! Instrumentation uses `#[instrument(skip_all)]` on every path that touches
//! credentials. Tokens, passwords, keys and user ids never appear in log
//! fields; failure reasons and token types do.

pub mod metrics;

pub use metrics::init_metrics_recorder;
