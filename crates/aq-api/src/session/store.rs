use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::model::Session;

/// A session behind its own lock, so requests on one session run one at a
/// time while other sessions proceed
pub type SessionHandle = Arc<Mutex<Session>>;

struct Slot {
    session: SessionHandle,
    last_seen: DateTime<Utc>,
}

/// In-memory sessions keyed by the token stored in the session cookie.
///
/// Sessions idle for longer than the TTL are dropped lazily on lookup and
/// by the periodic sweep.
#[derive(Clone)]
pub struct SessionStore {
    slots: Arc<RwLock<HashMap<Uuid, Slot>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store `session` under a fresh token, discarding the session held
    /// under `previous` if any.
    pub async fn replace(
        &self,
        previous: Option<Uuid>,
        session: Session,
        now: DateTime<Utc>,
    ) -> Uuid {
        let token = Uuid::new_v4();
        let mut slots = self.slots.write().await;

        if let Some(previous) = previous {
            slots.remove(&previous);
        }
        slots.insert(
            token,
            Slot {
                session: Arc::new(Mutex::new(session)),
                last_seen: now,
            },
        );

        token
    }

    /// Look up a live session and mark it as seen at `now`.
    pub async fn get(&self, token: Uuid, now: DateTime<Utc>) -> Option<SessionHandle> {
        let mut slots = self.slots.write().await;

        let expired = slots
            .get(&token)
            .is_some_and(|slot| now - slot.last_seen > self.ttl);
        if expired {
            slots.remove(&token);
            return None;
        }

        let slot = slots.get_mut(&token)?;
        slot.last_seen = now;
        Some(slot.session.clone())
    }

    pub async fn remove(&self, token: Uuid) -> bool {
        self.slots.write().await.remove(&token).is_some()
    }

    /// Drop every session idle for longer than the TTL; returns how many.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut slots = self.slots.write().await;
        let before = slots.len();
        slots.retain(|_, slot| now - slot.last_seen <= self.ttl);
        before - slots.len()
    }

    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }
}
