// src/sessions.rs

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::engine::AttemptEngine;

/// One user's live attempt. The mutex around it serializes answers,
/// navigation and clock ticks.
#[derive(Debug)]
pub struct AttemptSession {
    pub owner_id: String,
    pub engine: AttemptEngine,
}

pub type SharedSession = Arc<Mutex<AttemptSession>>;

/// In-progress attempts, keyed by session id.
///
/// A session leaves the registry when it completes or is abandoned, so the
/// clock only ever sees engines that can still take a tick.
#[derive(Debug, Default)]
pub struct AttemptRegistry {
    sessions: RwLock<HashMap<Uuid, SharedSession>>,
}

impl AttemptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: AttemptSession) -> (Uuid, SharedSession) {
        let id = Uuid::new_v4();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(id, shared.clone());
        (id, shared)
    }

    pub async fn get(&self, id: &Uuid) -> Option<SharedSession> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn remove(&self, id: &Uuid) -> Option<SharedSession> {
        self.sessions.write().await.remove(id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Adds one second to every in-progress attempt.
    pub async fn tick(&self) {
        let sessions: Vec<SharedSession> = self.sessions.read().await.values().cloned().collect();

        for session in sessions {
            let mut session = session.lock().await;
            if session.engine.is_finished() {
                continue;
            }
            if let Err(e) = session.engine.elapse_one_second() {
                tracing::warn!("Clock tick refused: {}", e);
            }
        }
    }
}

/// Starts the attempt clock. The engine never times itself; this task is the
/// only caller of `elapse_one_second` in the running service.
pub fn spawn_clock(registry: Arc<AttemptRegistry>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            interval.tick().await;
            registry.tick().await;
        }
    })
}
