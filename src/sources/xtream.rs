//! Xtream Codes provider client
//!
//! Uses two endpoints of the Xtream API: the `get_live_streams` action of
//! `player_api.php` for the channel list, and the `/live/{user}/{pass}/{id}.ts`
//! playback path.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, info};

use super::traits::{ChannelLister, StreamUrlGenerator};
use crate::config::ProviderConfig;
use crate::errors::{SourceError, SourceResult};
use crate::models::ChannelRecord;
use crate::utils::UrlUtils;

pub struct XtreamClient {
    client: Client,
    provider: ProviderConfig,
}

impl XtreamClient {
    pub fn new(client: Client, provider: ProviderConfig) -> Self {
        Self { client, provider }
    }

    fn base_url(&self) -> &str {
        self.provider.server_url.trim_end_matches('/')
    }

    /// `player_api.php` URL for an action, with credentials in the query
    fn api_url(&self, action: &str) -> SourceResult<Url> {
        let mut url = Url::parse(&format!("{}/player_api.php", self.base_url())).map_err(|e| {
            SourceError::parse_error(
                "xtream",
                format!("Invalid server URL '{}': {e}", self.base_url()),
            )
        })?;
        url.query_pairs_mut()
            .append_pair("username", &self.provider.username)
            .append_pair("password", &self.provider.password)
            .append_pair("action", action);
        Ok(url)
    }

    /// Interpret a `get_live_streams` body.
    ///
    /// Anything but a JSON array is rejected. Array elements that are not
    /// channel records are skipped.
    pub fn parse_live_streams(body: &str) -> SourceResult<Vec<ChannelRecord>> {
        let value: Value = serde_json::from_str(body).map_err(|e| {
            SourceError::parse_error("xtream", format!("Response is not JSON: {e}"))
        })?;

        let Value::Array(items) = value else {
            return Err(SourceError::parse_error(
                "xtream",
                "Invalid response format from IPTV server",
            ));
        };

        let total = items.len();
        let channels: Vec<ChannelRecord> = items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect();

        if channels.len() < total {
            debug!(
                "Skipped {} malformed channel records out of {}",
                total - channels.len(),
                total
            );
        }

        Ok(channels)
    }
}

#[async_trait]
impl ChannelLister for XtreamClient {
    async fn list_live_channels(&self) -> SourceResult<Vec<ChannelRecord>> {
        let url = self.api_url("get_live_streams")?;
        let display_url = UrlUtils::obfuscate_credentials(url.as_str());
        debug!("Fetching live channels from: {}", display_url);

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
                status.canonical_reason().unwrap_or("Unknown").to_string(),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::transport(&display_url, e.without_url().to_string()))?;

        let channels = Self::parse_live_streams(&body)?;
        info!("Retrieved {} live channels from provider", channels.len());
        Ok(channels)
    }
}

impl StreamUrlGenerator for XtreamClient {
    fn generate_stream_url(&self, stream_id: &str) -> String {
        format!(
            "{}/live/{}/{}/{}.ts",
            self.base_url(),
            self.provider.username,
            self.provider.password,
            stream_id
        )
    }
}
