pub const DEFAULT_DOMAIN: &str = "domain1.com";

/// Matches referers pointing at one domain over HTTPS.
///
/// A referer counts when it starts with `https://<domain>` or contains
/// `https://<domain>/` anywhere, so `https://other.net/https://domain1.com/`
/// is a hit as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefererMatcher {
    prefix: String,
    embedded: String,
}

impl RefererMatcher {
    pub fn new(domain: &str) -> Self {
        let prefix = format!("https://{domain}");
        let embedded = format!("{prefix}/");
        Self { prefix, embedded }
    }

    pub fn matches(&self, referer: &str) -> bool {
        referer.starts_with(&self.prefix) || referer.contains(&self.embedded)
    }
}

impl Default for RefererMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_DOMAIN)
    }
}
