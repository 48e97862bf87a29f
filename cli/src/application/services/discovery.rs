//! Application service: tunnel hostname discovery by polling a log.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use crate::application::ports::{DomainDiscoverer, LogSource};
use crate::domain::discovery::{DiscoveryResult, PollSettings, extract_hostname};

/// Polls a [`LogSource`] until a quick-tunnel hostname shows up or the
/// attempt budget runs out.
///
/// Each attempt first waits `interval`, then reads the whole source, so the
/// worst case is `attempts × interval` and nothing is read at time zero.
pub struct PollingDiscoverer<S> {
    source: S,
    settings: PollSettings,
}

impl<S: LogSource> PollingDiscoverer<S> {
    #[must_use]
    pub fn new(source: S, settings: PollSettings) -> Self {
        Self { source, settings }
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: LogSource> DomainDiscoverer for PollingDiscoverer<S> {
    async fn discover(&self) -> DiscoveryResult {
        let PollSettings { attempts, interval } = self.settings;
        for attempt in 1..=attempts {
            tokio::time::sleep(interval).await;
            match self.source.read_all().await {
                Ok(Some(text)) => {
                    if let Some(host) = extract_hostname(&text) {
                        tracing::info!(attempt, %host, "tunnel hostname discovered");
                        return DiscoveryResult::Found(host);
                    }
                    tracing::debug!(attempt, bytes = text.len(), "no hostname in tunnel log yet");
                }
                Ok(None) => {
                    tracing::debug!(attempt, source = %self.source.describe(), "tunnel log not created yet");
                }
                Err(e) => {
                    tracing::debug!(attempt, error = %e, "reading tunnel log failed");
                }
            }
        }
        tracing::warn!(attempts, source = %self.source.describe(), "no tunnel hostname found");
        DiscoveryResult::NotFound { attempts }
    }
}
