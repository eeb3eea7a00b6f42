//! Provider abstractions
//!
//! Listing channels and building playback URLs are separate concerns: the
//! first is a network call that can fail, the second is a pure function of the
//! configured credentials.

use async_trait::async_trait;

use crate::errors::SourceResult;
use crate::models::ChannelRecord;

/// Sources that can enumerate their live channels
#[async_trait]
pub trait ChannelLister: Send + Sync {
    async fn list_live_channels(&self) -> SourceResult<Vec<ChannelRecord>>;
}

/// Sources that can turn a provider stream id into a playback URL
pub trait StreamUrlGenerator: Send + Sync {
    fn generate_stream_url(&self, stream_id: &str) -> String;
}

/// Everything the addon service needs from a provider
pub trait LiveSource: ChannelLister + StreamUrlGenerator {}

impl<T> LiveSource for T where T: ChannelLister + StreamUrlGenerator {}
