//! Catalog, stream and meta resolution
//!
//! Every operation soft-fails: provider or lookup problems produce an empty
//! or minimal value wrapped in [`Outcome::Degraded`], never an error.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

use super::Outcome;
use crate::epg::EpgStore;
use crate::models::{
    CatalogResponse, ChannelRecord, Manifest, MetaDetail, MetaPreview, MetaResponse, StreamItem,
    StreamResponse, CONTENT_TYPE_TV, DEFAULT_CHANNEL_NAME, ID_PREFIX, STREAM_TITLE,
};
use crate::sources::{ChannelLister, LiveSource, StreamUrlGenerator};

pub struct AddonService {
    source: Arc<dyn LiveSource>,
    epg: EpgStore,
    manifest: Manifest,
}

impl AddonService {
    pub fn new(source: Arc<dyn LiveSource>, epg: EpgStore) -> Self {
        Self {
            source,
            epg,
            manifest: Manifest::live_tv(),
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn epg(&self) -> &EpgStore {
        &self.epg
    }

    /// List the live channels for a catalog declared in the manifest
    pub async fn catalog(&self, content_type: &str, catalog_id: &str) -> Outcome<CatalogResponse> {
        if !self.manifest.has_catalog(content_type, catalog_id) {
            return Outcome::degraded(
                CatalogResponse::default(),
                format!("Unknown catalog {content_type}/{catalog_id}"),
            );
        }

        match self.source.list_live_channels().await {
            Ok(channels) => {
                let metas: Vec<MetaPreview> = channels.into_iter().map(to_preview).collect();
                debug!("Catalog {} lists {} channels", catalog_id, metas.len());
                Outcome::Ready(CatalogResponse { metas })
            }
            Err(e) => Outcome::degraded(
                CatalogResponse::default(),
                format!("Error fetching catalog: {e}"),
            ),
        }
    }

    /// Resolve an addon id to its playback stream
    pub fn stream(&self, _content_type: &str, id: &str) -> Outcome<StreamResponse> {
        let stream_id = strip_id_prefix(id);
        if stream_id.is_empty() {
            return Outcome::degraded(
                StreamResponse::default(),
                format!("No stream id in '{id}'"),
            );
        }

        Outcome::Ready(StreamResponse {
            streams: vec![StreamItem {
                title: STREAM_TITLE.to_string(),
                url: self.source.generate_stream_url(stream_id),
            }],
        })
    }

    pub async fn meta(&self, _content_type: &str, id: &str) -> Outcome<MetaResponse> {
        self.meta_at(id, Utc::now()).await
    }

    /// Build the meta descriptor, annotated with whatever is airing at `now`
    pub async fn meta_at(&self, id: &str, now: DateTime<Utc>) -> Outcome<MetaResponse> {
        let mut meta = MetaDetail::minimal(id);

        let stream_id = strip_id_prefix(id);
        if let Some(programme) = self.epg.current_programme(stream_id, now).await {
            meta.description = Some(format!("Now Playing: {}", programme.title));
        }

        Outcome::Ready(MetaResponse { meta })
    }
}

fn to_preview(channel: ChannelRecord) -> MetaPreview {
    let name = channel
        .name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_CHANNEL_NAME.to_string());
    let poster = channel.stream_icon.filter(|icon| !icon.is_empty());

    MetaPreview {
        id: format!("{ID_PREFIX}{}", channel.stream_id),
        content_type: CONTENT_TYPE_TV.to_string(),
        name,
        poster,
    }
}

/// Provider stream id behind an addon id; ids without the prefix pass through
fn strip_id_prefix(id: &str) -> &str {
    id.strip_prefix(ID_PREFIX).unwrap_or(id)
}
