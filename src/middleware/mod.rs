pub mod cors;
pub mod rate_limit;
pub mod security_headers;

pub use cors::dynamic_cors_middleware;
pub use rate_limit::{client_ip, rate_limit_middleware, RateLimitState};
pub use security_headers::security_headers_middleware;
