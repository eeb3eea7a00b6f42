//! Addon protocol wire types

use serde::{Deserialize, Serialize};

/// Prefix that scopes provider stream ids into the addon id namespace
pub const ID_PREFIX: &str = "iptv_";
/// Prefix advertised in the manifest's `idPrefixes`
pub const MANIFEST_ID_PREFIX: &str = "iptv";
pub const CONTENT_TYPE_TV: &str = "tv";
pub const LIVE_CATALOG_ID: &str = "iptv_live";

pub const DEFAULT_CHANNEL_NAME: &str = "Unknown Channel";
pub const META_CHANNEL_NAME: &str = "IPTV Channel";
pub const STREAM_TITLE: &str = "IPTV Stream";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: String,
    pub version: String,
    pub name: String,
    pub description: String,
    pub catalogs: Vec<CatalogDescriptor>,
    pub resources: Vec<String>,
    pub types: Vec<String>,
    pub id_prefixes: Vec<String>,
}

impl Manifest {
    /// The fixed manifest this addon advertises
    pub fn live_tv() -> Self {
        Self {
            id: "org.iptv.custom".to_string(),
            version: "1.1.0".to_string(),
            name: "My IPTV Addon with EPG".to_string(),
            description:
                "Streams live TV and VOD from your IPTV provider, with optional EPG support"
                    .to_string(),
            catalogs: vec![CatalogDescriptor {
                content_type: CONTENT_TYPE_TV.to_string(),
                id: LIVE_CATALOG_ID.to_string(),
                name: "Live IPTV".to_string(),
            }],
            resources: vec![
                "catalog".to_string(),
                "stream".to_string(),
                "meta".to_string(),
            ],
            types: vec![CONTENT_TYPE_TV.to_string()],
            id_prefixes: vec![MANIFEST_ID_PREFIX.to_string()],
        }
    }

    pub fn has_catalog(&self, content_type: &str, id: &str) -> bool {
        self.catalogs
            .iter()
            .any(|c| c.content_type == content_type && c.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDescriptor {
    #[serde(rename = "type")]
    pub content_type: String,
    pub id: String,
    pub name: String,
}

/// Catalog entry for one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaPreview {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub name: String,
    /// Serialized as `null` when the provider has no icon
    pub poster: Option<String>,
}

/// Detailed descriptor returned by the meta resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaDetail {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MetaDetail {
    /// Minimal descriptor without programme information
    pub fn minimal(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content_type: CONTENT_TYPE_TV.to_string(),
            name: META_CHANNEL_NAME.to_string(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamItem {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub metas: Vec<MetaPreview>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamResponse {
    pub streams: Vec<StreamItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaResponse {
    pub meta: MetaDetail,
}
