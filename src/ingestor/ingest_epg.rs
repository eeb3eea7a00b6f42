//! EPG ingestion - fetch, parse and swap in a new index
//!
//! A refresh never fails the service. When the feed is unset the refresh is
//! skipped; when fetching or parsing fails the previous index stays in place
//! and keeps answering lookups.

use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::epg::{EpgIndex, EpgStore, RetentionPolicy};
use crate::errors::{SourceError, SourceResult};
use crate::utils::{format_duration, DecompressionService, UrlUtils, XmltvProgrammes};

/// What a refresh attempt did to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new index replaced the previous one
    Replaced { channels: usize, programmes: usize },
    /// No feed is configured; the store was left alone
    Skipped,
    /// Fetch or parse failed; the previous index is still served
    Failed { reason: String },
}

pub struct EpgIngestor {
    client: Client,
    feed_url: Option<String>,
    policy: RetentionPolicy,
}

impl EpgIngestor {
    pub fn new(client: Client, feed_url: Option<String>, policy: RetentionPolicy) -> Self {
        Self {
            client,
            feed_url,
            policy,
        }
    }

    pub fn from_config(client: Client, config: &Config) -> Self {
        Self::new(
            client,
            config.epg.url.clone(),
            RetentionPolicy::from(&config.epg),
        )
    }

    pub fn feed_url(&self) -> Option<&str> {
        self.feed_url.as_deref()
    }

    /// Fetch the feed and replace the stored index on success.
    pub async fn refresh(&self, store: &EpgStore) -> RefreshOutcome {
        let Some(url) = self.feed_url.as_deref() else {
            warn!("EPG_URL not provided; skipping EPG loading");
            return RefreshOutcome::Skipped;
        };

        let start_time = Instant::now();
        info!(
            "Starting EPG refresh from: {}",
            UrlUtils::obfuscate_credentials(url)
        );

        let index = match self.fetch_feed(url).await {
            Ok(content) => Self::build_index(&content, &self.policy, Utc::now()),
            Err(e) => Err(e),
        };

        match index {
            Ok(index) => {
                let channels = index.channel_count();
                let programmes = index.programme_count();
                store.replace(index).await;

                info!(
                    "EPG refresh completed channels={} programmes={} duration={}",
                    channels,
                    programmes,
                    format_duration(start_time.elapsed().as_millis() as u64)
                );
                RefreshOutcome::Replaced {
                    channels,
                    programmes,
                }
            }
            Err(e) => {
                error!("Failed to load EPG: {}", e);
                RefreshOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn fetch_feed(&self, url: &str) -> SourceResult<String> {
        let display_url = UrlUtils::obfuscate_credentials(url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::transport(&display_url, e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::http(
                status.as_u16(),
                format!(
                    "Failed to fetch XMLTV data: {}",
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SourceError::transport(&display_url, e.without_url().to_string()))?;
        debug!("Downloaded XMLTV content ({} bytes)", body.len());

        DecompressionService::decompress_to_string(&body)
    }

    /// Parse XMLTV content and apply the retention policy as of `now`.
    pub fn build_index(
        content: &str,
        policy: &RetentionPolicy,
        now: DateTime<Utc>,
    ) -> SourceResult<EpgIndex> {
        let index = EpgIndex::try_build(XmltvProgrammes::new(content), policy, now)?;
        debug!(
            "Indexed {} programmes from {} bytes of XMLTV content",
            index.programme_count(),
            content.len()
        );
        Ok(index)
    }
}
