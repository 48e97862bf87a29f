//! Hostname extraction from tunnel client output.
//!
//! cloudflared prints the quick-tunnel URL in its startup banner. That
//! banner is not a stable interface: if its phrasing changes, extraction
//! silently stops matching and discovery reports `NotFound`.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

/// Suffix of hostnames handed out by quick tunnels.
pub const TUNNEL_DOMAIN_SUFFIX: &str = "trycloudflare.com";

pub const DEFAULT_ATTEMPTS: u32 = 20;
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

#[allow(clippy::expect_used)] // literal pattern
static HOSTNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://([a-z0-9-]+\.trycloudflare\.com)").expect("valid hostname regex")
});

/// Terminal outcome of discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryResult {
    Found(String),
    NotFound { attempts: u32 },
}

/// Polling budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            interval: DEFAULT_INTERVAL,
        }
    }
}

/// Last quick-tunnel hostname in `text`, lower-cased, without scheme or path.
///
/// The log is appended to across runs, so earlier banners name tunnels that
/// are already gone.
#[must_use]
pub fn extract_hostname(text: &str) -> Option<String> {
    HOSTNAME_RE
        .captures_iter(text)
        .last()
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
}
