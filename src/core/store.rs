//! Session store: user id → profile + session
//!
//! The map lock is only held to look up or insert a slot. Each user has
//! their own async mutex, held for a whole turn, so one user's turns run
//! one at a time while other users proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::info;

use crate::types::{Persona, SessionPhase, SessionState, UserProfile};

/// Everything owned for one user
#[derive(Debug, Clone)]
pub struct UserEntry {
    pub profile: UserProfile,
    pub session: SessionState,
}

pub type UserSlot = Arc<Mutex<UserEntry>>;

/// Held for the duration of a turn
pub type UserGuard = OwnedMutexGuard<UserEntry>;

/// Process-wide, volatile store
#[derive(Debug, Default)]
pub struct SessionStore {
    users: RwLock<HashMap<String, UserSlot>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing slot, or a fresh profile + session. Bool = newly created.
    pub async fn get_or_create(&self, user_id: &str, category: &str, level: &str) -> (UserSlot, bool) {
        if let Some(slot) = self.users.read().await.get(user_id) {
            return (Arc::clone(slot), false);
        }

        let mut users = self.users.write().await;
        // another request may have inserted between the two locks
        if let Some(slot) = users.get(user_id) {
            return (Arc::clone(slot), false);
        }

        let persona = Persona::random(&mut rand::thread_rng());
        let entry = UserEntry {
            profile: UserProfile::new(persona, category, level),
            session: SessionState::new(new_session_id()),
        };
        info!(user_id, persona = ?persona, "new user");
        let slot = Arc::new(Mutex::new(entry));
        users.insert(user_id.to_string(), Arc::clone(&slot));
        (slot, true)
    }

    /// Take the per-user lock, creating the user on first sight
    pub async fn lock_user(&self, user_id: &str, category: &str, level: &str) -> (UserGuard, bool) {
        let (slot, created) = self.get_or_create(user_id, category, level).await;
        (slot.lock_owned().await, created)
    }

    pub async fn get(&self, user_id: &str) -> Option<UserSlot> {
        self.users.read().await.get(user_id).cloned()
    }

    /// Copy of a user's profile
    pub async fn profile(&self, user_id: &str) -> Option<UserProfile> {
        let slot = self.get(user_id).await?;
        let entry = slot.lock().await;
        Some(entry.profile.clone())
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Users with a puzzle in play. Slots busy with a turn count as active.
    pub async fn active_sessions(&self) -> usize {
        let users = self.users.read().await;
        users
            .values()
            .filter(|slot| match slot.try_lock() {
                Ok(entry) => entry.session.phase() == SessionPhase::AwaitingAnswer,
                Err(_) => true,
            })
            .count()
    }
}

/// Short random session id
pub fn new_session_id() -> String {
    format!("session_{}", &uuid::Uuid::new_v4().simple().to_string()[..12])
}

/// Short random user id for anonymous callers
pub fn new_user_id() -> String {
    format!("user_{}", &uuid::Uuid::new_v4().simple().to_string()[..8])
}

// =============================================================================
// TESTS
// =============================================================================
