//! In-memory registry of running and finished searches.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use scout_pipeline::RunSnapshot;
use tokio::sync::{watch, RwLock};
use uuid::Uuid;

/// Finished sessions older than this are evicted on the next insert.
const FINISHED_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

struct Session {
    progress: watch::Receiver<RunSnapshot>,
    created_at: Instant,
}

impl Session {
    /// Terminal, or its run task is gone without publishing one.
    fn is_finished(&self) -> bool {
        self.progress.borrow().is_terminal() || self.progress.has_changed().is_err()
    }
}

#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionRegistry {
    pub async fn insert(&self, progress: watch::Receiver<RunSnapshot>) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.inner.write().await;
        sessions.retain(|_, s| {
            !(s.is_finished() && s.created_at.elapsed() > FINISHED_SESSION_TTL)
        });
        sessions.insert(
            id,
            Session {
                progress,
                created_at: Instant::now(),
            },
        );
        id
    }

    /// A fresh receiver for `id`, positioned at the current snapshot.
    pub async fn subscribe(&self, id: Uuid) -> Option<watch::Receiver<RunSnapshot>> {
        let sessions = self.inner.read().await;
        sessions.get(&id).map(|s| {
            let mut rx = s.progress.clone();
            rx.mark_changed();
            rx
        })
    }

    pub async fn snapshot(&self, id: Uuid) -> Option<RunSnapshot> {
        let sessions = self.inner.read().await;
        sessions.get(&id).map(|s| s.progress.borrow().clone())
    }

    /// Drops the session. A still-running pipeline finishes unobserved.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }
}
