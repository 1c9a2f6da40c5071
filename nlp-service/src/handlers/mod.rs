pub mod health;
pub mod metrics;
pub mod parse;

pub use health::health_check;
pub use metrics::metrics_endpoint;
pub use parse::parse_text;
