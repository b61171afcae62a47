//! Snapshot cache for the site content key/value map.
//!
//! Public pages read the whole map on every request; the cache serves one
//! snapshot for a configurable TTL. Every admin content write calls
//! [`ContentCache::invalidate`] so the next read reloads from the database.

use std::sync::Arc;
use std::time::{Duration, Instant};

use clinica_core::content::ContentMap;
use clinica_db::repositories::ContentRepo;
use clinica_db::DbPool;
use tokio::sync::RwLock;

struct Snapshot {
    loaded_at: Instant,
    map: Arc<ContentMap>,
}

pub struct ContentCache {
    ttl: Duration,
    slot: RwLock<Option<Snapshot>>,
}

impl ContentCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// The current snapshot, reloading it when missing or stale.
    pub async fn snapshot(&self, pool: &DbPool) -> Result<Arc<ContentMap>, sqlx::Error> {
        if let Some(map) = self.fresh().await {
            return Ok(map);
        }

        let mut slot = self.slot.write().await;
        // Another request may have reloaded while we waited for the lock.
        if let Some(snapshot) = slot.as_ref() {
            if snapshot.loaded_at.elapsed() < self.ttl {
                return Ok(Arc::clone(&snapshot.map));
            }
        }

        let map = Arc::new(ContentRepo::load_map(pool).await?);
        tracing::debug!(entries = map.len(), "Content snapshot reloaded");
        *slot = Some(Snapshot {
            loaded_at: Instant::now(),
            map: Arc::clone(&map),
        });
        Ok(map)
    }

    /// Drop the snapshot so the next read goes to the database.
    pub async fn invalidate(&self) {
        *self.slot.write().await = None;
    }

    async fn fresh(&self) -> Option<Arc<ContentMap>> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|s| s.loaded_at.elapsed() < self.ttl)
            .map(|s| Arc::clone(&s.map))
    }

    #[cfg(test)]
    async fn seed(&self, map: ContentMap) {
        *self.slot.write().await = Some(Snapshot {
            loaded_at: Instant::now(),
            map: Arc::new(map),
        });
    }
}
