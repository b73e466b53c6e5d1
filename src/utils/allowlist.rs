// Static trusted-domain allowlist.
// Matching is label-aware: a trusted entry matches a host only when the
// host equals the entry or ends with `.` + entry. A plain string-suffix
// test would let evilgoogle.com ride on google.com.

use crate::utils::url_normalizer::extract_host;

/// Trusted registrable domains that bypass full scoring
const TRUSTED_DOMAINS: &[&str] = &[
    "christuniversity.in",
    "google.com",
    "microsoft.com",
    "github.com",
    "stackoverflow.com",
    "wikipedia.org",
    "youtube.com",
    "linkedin.com",
    "amazon.com",
];

#[derive(Debug, Clone)]
pub struct Allowlist {
    entries: Vec<String>,
}

impl Allowlist {
    pub fn new(entries: Vec<String>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| e.to_lowercase()).collect(),
        }
    }

    /// Check whether a host is a trusted domain or a subdomain of one
    pub fn matches_host(&self, host: &str) -> bool {
        let host = host.to_lowercase();
        self.entries.iter().any(|entry| {
            host == *entry
                || (host.len() > entry.len()
                    && host.ends_with(entry.as_str())
                    && host.as_bytes()[host.len() - entry.len() - 1] == b'.')
        })
    }

    /// Check a full URL; unparseable URLs are never allowlisted
    pub fn is_allowlisted(&self, url: &str) -> bool {
        match extract_host(url) {
            Some(host) => self.matches_host(&host),
            None => false,
        }
    }
}

impl Default for Allowlist {
    fn default() -> Self {
        Self::new(TRUSTED_DOMAINS.iter().map(|s| s.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_subdomain_match() {
        let allowlist = Allowlist::default();
        assert!(allowlist.matches_host("google.com"));
        assert!(allowlist.matches_host("mail.google.com"));
        assert!(allowlist.matches_host("deep.sub.github.com"));
    }

    #[test]
    fn test_suffix_lookalike_is_rejected() {
        let allowlist = Allowlist::default();
        assert!(!allowlist.matches_host("evilgoogle.com"));
        assert!(!allowlist.matches_host("notgithub.com"));
        assert!(!allowlist.matches_host("amazon.com.attacker.net"));
    }

    #[test]
    fn test_url_level_check() {
        let allowlist = Allowlist::default();
        assert!(allowlist.is_allowlisted("http://christuniversity.in/login"));
        assert!(allowlist.is_allowlisted("https://www.youtube.com/watch?v=x"));
        assert!(!allowlist.is_allowlisted("http://phishing-youtube.com"));
        assert!(!allowlist.is_allowlisted("http://"));
    }

    #[test]
    fn test_case_insensitive() {
        let allowlist = Allowlist::default();
        assert!(allowlist.matches_host("Mail.Google.COM"));
    }
}
