// URL normalization for the scan pipeline.
// Normalization never rejects input; malformed hosts surface later as a
// failed host extraction, which the caller treats as "cannot allowlist".

use url::Url;

/// Canonicalize a raw user-supplied string into a well-formed URL.
/// Trims whitespace and prepends `http://` when no scheme is present.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

/// Extract the registrable host from a normalized URL.
/// Lower-cases and strips one leading `www.`; returns None when the URL
/// does not parse or carries no host.
pub fn extract_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    Some(match host.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => host,
    })
}
