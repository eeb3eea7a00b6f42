use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::EpgIndex;
use crate::models::ProgrammeEntry;

/// Process-scoped handle to the current EPG index.
///
/// Readers take a cheap `Arc` snapshot and never observe a partially built
/// index; refreshes build the replacement outside the lock and swap it in.
#[derive(Clone, Default)]
pub struct EpgStore {
    current: Arc<RwLock<Arc<EpgIndex>>>,
}

impl EpgStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Arc<EpgIndex> {
        self.current.read().await.clone()
    }

    /// Swap in a new index, returning the one it replaced
    pub async fn replace(&self, index: EpgIndex) -> Arc<EpgIndex> {
        let mut current = self.current.write().await;
        std::mem::replace(&mut *current, Arc::new(index))
    }

    pub async fn current_programme(
        &self,
        channel_id: &str,
        now: DateTime<Utc>,
    ) -> Option<ProgrammeEntry> {
        self.snapshot()
            .await
            .current_programme(channel_id, now)
            .cloned()
    }
}
