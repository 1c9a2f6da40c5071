pub mod health;
pub mod parse;

pub use health::HealthResponse;
pub use parse::{ErrorResponse, ParseRequest, ParseResponse, INVALID_REQUEST_MESSAGE};
