//! Destination allow-listing for proxied requests.
//!
//! The gateway forwards arbitrary caller-supplied URLs, so the set of
//! permitted destinations is the main line of defense against being used as
//! an open proxy. Matching is suffix-based only: no wildcards, no regex, and
//! it operates exclusively on an already-parsed hostname. Callers must never
//! pass raw URL strings here, otherwise userinfo tricks like
//! `https://api.ionos.com@evil.example/` would defeat the check.

/// Primary API domain accepted as a proxy target.
pub const PRIMARY_API_DOMAIN: &str = "api.ionos.com";

/// Regional API hosts (e.g. `s3.eu-central-1.ionos.com`) share this suffix.
pub const REGIONAL_DOMAIN_SUFFIX: &str = ".ionos.com";

/// Pure predicate over parsed hostnames.
#[derive(Debug, Clone)]
pub struct HostAllowlist {
    primary_domain: String,
    primary_suffix: String,
    regional_suffix: String,
}

impl Default for HostAllowlist {
    fn default() -> Self {
        Self::new(PRIMARY_API_DOMAIN, REGIONAL_DOMAIN_SUFFIX)
    }
}

impl HostAllowlist {
    /// Create an allowlist from a primary domain and a broader regional
    /// domain suffix (leading dot included).
    pub fn new(primary_domain: &str, regional_suffix: &str) -> Self {
        let primary_domain = primary_domain.to_ascii_lowercase();
        Self {
            primary_suffix: format!(".{}", primary_domain),
            primary_domain,
            regional_suffix: regional_suffix.to_ascii_lowercase(),
        }
    }

    /// Whether `hostname` is a permitted upstream.
    ///
    /// True iff the lower-cased hostname equals the primary domain, is a
    /// subdomain of it, or carries the regional suffix.
    pub fn is_allowed(&self, hostname: &str) -> bool {
        let host = hostname.to_ascii_lowercase();
        host == self.primary_domain
            || host.ends_with(&self.primary_suffix)
            || host.ends_with(&self.regional_suffix)
    }
}
