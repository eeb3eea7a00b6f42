use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::warn;

use super::AppState;
use crate::models::{CatalogResponse, Manifest, MetaResponse, StreamResponse};
use crate::services::Outcome;

/// Addon resources are addressed as `.../{id}.json`
fn strip_json(segment: &str) -> Result<&str, StatusCode> {
    segment.strip_suffix(".json").ok_or(StatusCode::NOT_FOUND)
}

fn respond<T>(resource: &str, outcome: Outcome<T>) -> Json<T> {
    if let Some(reason) = outcome.reason() {
        warn!("{} request degraded: {}", resource, reason);
    }
    Json(outcome.into_value())
}

pub async fn manifest(State(state): State<AppState>) -> Json<Manifest> {
    Json(state.addon.manifest().clone())
}

pub async fn catalog(
    Path((content_type, file)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<CatalogResponse>, StatusCode> {
    let catalog_id = strip_json(&file)?;
    Ok(respond(
        "catalog",
        state.addon.catalog(&content_type, catalog_id).await,
    ))
}

/// Catalog with search/skip extras; the extras are ignored
pub async fn catalog_with_extra(
    Path((content_type, catalog_id, extra)): Path<(String, String, String)>,
    State(state): State<AppState>,
) -> Result<Json<CatalogResponse>, StatusCode> {
    strip_json(&extra)?;
    Ok(respond(
        "catalog",
        state.addon.catalog(&content_type, &catalog_id).await,
    ))
}

pub async fn stream(
    Path((content_type, file)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<StreamResponse>, StatusCode> {
    let id = strip_json(&file)?;
    Ok(respond("stream", state.addon.stream(&content_type, id)))
}

pub async fn meta(
    Path((content_type, file)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<MetaResponse>, StatusCode> {
    let id = strip_json(&file)?;
    Ok(respond("meta", state.addon.meta(&content_type, id).await))
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let index = state.epg.snapshot().await;
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "iptv-addon",
        "epg": {
            "channels": index.channel_count(),
            "programmes": index.programme_count(),
            "built_at": index.built_at().map(|t| t.to_rfc3339()),
        }
    }))
}
