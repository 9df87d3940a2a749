use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::future::Cache;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::game::Session;

pub struct StoredSession {
    pub session: Session,
    pub created_at: DateTime<Utc>,
}

pub type SharedSession = Arc<Mutex<StoredSession>>;

/// Live play sessions keyed by puzzle id. Idle sessions expire after the configured TTL.
#[derive(Clone)]
pub struct SessionStore {
    cache: Cache<Uuid, SharedSession>,
}

impl SessionStore {
    pub fn new(max_sessions: u64, time_to_idle: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_sessions)
            .time_to_idle(time_to_idle)
            .build();
        Self { cache }
    }

    pub async fn insert(&self, session: Session) -> (Uuid, SharedSession) {
        let id = Uuid::new_v4();
        let entry = Arc::new(Mutex::new(StoredSession {
            session,
            created_at: Utc::now(),
        }));
        self.cache.insert(id, entry.clone()).await;
        (id, entry)
    }

    pub async fn get(&self, id: &Uuid) -> Option<SharedSession> {
        self.cache.get(id).await
    }

    pub async fn remove(&self, id: &Uuid) -> Option<SharedSession> {
        self.cache.remove(id).await
    }

    /// Number of live sessions. Pending cache maintenance runs first so the
    /// count reflects every insert and removal made so far.
    pub async fn len(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
