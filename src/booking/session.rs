use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::wizard::BookingWizard;
use crate::error::{AppError, AppResult};

/// One user's wizard plus the time it was last used.
#[derive(Debug)]
pub struct WizardSession {
    pub wizard: BookingWizard,
    touched_at: DateTime<Utc>,
}

impl WizardSession {
    fn new(wizard: BookingWizard) -> Self {
        Self {
            wizard,
            touched_at: Utc::now(),
        }
    }

    pub fn touch(&mut self) {
        self.touched_at = Utc::now();
    }

    pub fn touched_at(&self) -> DateTime<Utc> {
        self.touched_at
    }
}

/// In-process wizard sessions keyed by an unguessable id.
///
/// Each session sits behind its own lock so a payment waiting on the
/// simulated delay only holds up its own session.
#[derive(Clone, Default)]
pub struct WizardSessions {
    inner: Arc<RwLock<HashMap<Uuid, Arc<Mutex<WizardSession>>>>>,
}

impl WizardSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, wizard: BookingWizard) -> Uuid {
        let id = Uuid::new_v4();
        self.inner
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(WizardSession::new(wizard))));
        id
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Arc<Mutex<WizardSession>>> {
        self.inner
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Booking session not found".to_string()))
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Drops sessions idle for longer than `ttl`. Sessions busy with a
    /// request are left alone.
    pub async fn sweep_idle(&self, ttl: Duration) -> usize {
        let cutoff = Utc::now() - ttl;
        let mut sessions = self.inner.write().await;
        let before = sessions.len();

        sessions.retain(|_, session| match session.try_lock() {
            Ok(session) => session.touched_at() >= cutoff,
            Err(_) => true,
        });

        before - sessions.len()
    }
}
