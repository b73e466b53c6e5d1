// Utility modules for the phishscan backend

pub mod allowlist;
pub mod service_error;
pub mod url_normalizer;

pub use allowlist::Allowlist;
pub use service_error::ScanError;
pub use url_normalizer::{extract_host, normalize_url};
