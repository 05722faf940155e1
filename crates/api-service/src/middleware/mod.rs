pub mod auth;
pub mod http_metrics;

pub use auth::{authenticate, authorize};
pub use http_metrics::http_metrics_middleware;
