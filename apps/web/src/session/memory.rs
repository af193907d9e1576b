use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use super::{SessionData, SessionError, SessionStore};

struct Entry {
    data: SessionData,
    touched: Instant,
}

/// In-process session store. State disappears on restart. Loads and saves
/// both count as activity; sessions idle for longer than the TTL read as
/// empty and are evicted on the next write.
pub struct MemorySessionStore {
    entries: RwLock<HashMap<Uuid, Entry>>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: Uuid) -> Result<SessionData, SessionError> {
        let mut entries = self.entries.write().await;
        Ok(entries
            .get_mut(&id)
            .filter(|entry| entry.touched.elapsed() <= self.ttl)
            .map(|entry| {
                entry.touched = Instant::now();
                entry.data.clone()
            })
            .unwrap_or_default())
    }

    async fn save(&self, id: Uuid, data: &SessionData) -> Result<(), SessionError> {
        let mut entries = self.entries.write().await;

        let before = entries.len();
        entries.retain(|_, entry| entry.touched.elapsed() <= self.ttl);
        if entries.len() < before {
            debug!("Evicted {} idle sessions", before - entries.len());
        }

        entries.insert(
            id,
            Entry {
                data: data.clone(),
                touched: Instant::now(),
            },
        );
        Ok(())
    }

    async fn clear(&self, id: Uuid) -> Result<(), SessionError> {
        self.entries.write().await.remove(&id);
        Ok(())
    }
}
