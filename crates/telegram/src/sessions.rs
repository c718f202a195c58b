//! Per-user wizard sessions.
//!
//! Each user gets one slot behind its own mutex, so concurrent updates for
//! the same user are serialized while different users proceed in parallel.
//! Sessions expire after the idle timeout, checked lazily on access and by
//! a periodic sweep.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use jobwatch_core::domain::alert::FilterDraft;
use jobwatch_core::wizard::Step;

#[derive(Clone, Debug)]
pub struct Session {
    pub step: Step,
    pub draft: FilterDraft,
    pub last_activity: Instant,
}

impl Session {
    fn new() -> Self {
        Self { step: Step::MainMenu, draft: FilterDraft::default(), last_activity: Instant::now() }
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

pub struct SessionStore {
    sessions: Mutex<HashMap<String, Arc<Mutex<Session>>>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self { sessions: Mutex::new(HashMap::new()), idle_timeout }
    }

    /// Creates a fresh session at the main menu, replacing any existing one.
    pub async fn begin(&self, user_id: &str) -> Arc<Mutex<Session>> {
        let slot = Arc::new(Mutex::new(Session::new()));
        self.sessions.lock().await.insert(user_id.to_owned(), slot.clone());
        slot
    }

    /// Returns the live session, or `None` if there is none or it has sat
    /// idle past the timeout (in which case it is evicted here).
    ///
    /// The map lock is released before the slot is inspected: a slot held
    /// across a transition must never stall lookups for other users. An
    /// in-flight slot is mid transition and therefore live.
    pub async fn get(&self, user_id: &str) -> Option<Arc<Mutex<Session>>> {
        let slot = self.sessions.lock().await.get(user_id)?.clone();

        let expired = match slot.try_lock() {
            Ok(session) => session.last_activity.elapsed() > self.idle_timeout,
            Err(_) => false,
        };
        if expired {
            let mut sessions = self.sessions.lock().await;
            // begin() may have swapped in a fresh slot in the meantime.
            if sessions.get(user_id).is_some_and(|current| Arc::ptr_eq(current, &slot)) {
                sessions.remove(user_id);
            }
            return None;
        }

        Some(slot)
    }

    pub async fn end(&self, user_id: &str) {
        self.sessions.lock().await.remove(user_id);
    }

    /// Evicts every idle-expired session. Slots currently locked are mid
    /// transition and therefore not idle; they are skipped.
    pub async fn sweep(&self) -> usize {
        let mut sessions = self.sessions.lock().await;
        let mut expired = Vec::new();

        for (user_id, slot) in sessions.iter() {
            if let Ok(session) = slot.try_lock() {
                if session.last_activity.elapsed() > self.idle_timeout {
                    expired.push(user_id.clone());
                }
            }
        }

        for user_id in &expired {
            sessions.remove(user_id);
        }
        expired.len()
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use jobwatch_core::schema::ExperienceLevel;
    use jobwatch_core::wizard::Step;

    use super::SessionStore;

    #[tokio::test]
    async fn begin_replaces_any_existing_session() {
        let store = SessionStore::new(Duration::from_secs(60));

        let first = store.begin("u-1").await;
        first.lock().await.step = Step::Confirm;

        store.begin("u-1").await;
        let current = store.get("u-1").await.expect("session exists");
        assert_eq!(current.lock().await.step, Step::MainMenu);
        assert_eq!(store.active_count().await, 1);
    }

    #[tokio::test]
    async fn end_removes_the_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        store.begin("u-1").await;
        store.end("u-1").await;

        assert!(store.get("u-1").await.is_none());
        assert_eq!(store.active_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_sessions_are_evicted_lazily_on_access() {
        let store = SessionStore::new(Duration::from_secs(30));
        store.begin("u-1").await;

        tokio::time::advance(Duration::from_secs(31)).await;

        assert!(store.get("u-1").await.is_none());
        assert_eq!(store.active_count().await, 0, "lazy check also evicts");
    }

    #[tokio::test(start_paused = true)]
    async fn touch_extends_the_idle_deadline() {
        let store = SessionStore::new(Duration::from_secs(30));
        store.begin("u-1").await;

        tokio::time::advance(Duration::from_secs(20)).await;
        store.get("u-1").await.expect("still live").lock().await.touch();
        tokio::time::advance(Duration::from_secs(20)).await;

        assert!(store.get("u-1").await.is_some(), "activity resets the timeout");
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_evicts_only_expired_sessions() {
        let store = SessionStore::new(Duration::from_secs(30));
        store.begin("stale").await;

        tokio::time::advance(Duration::from_secs(31)).await;
        store.begin("fresh").await;

        assert_eq!(store.sweep().await, 1);
        assert!(store.get("stale").await.is_none());
        assert!(store.get("fresh").await.is_some());
    }

    #[tokio::test]
    async fn a_busy_session_does_not_block_other_users() {
        let store = SessionStore::new(Duration::from_secs(60));
        let slot_a = store.begin("u-1").await;
        store.begin("u-2").await;

        // u-1 is mid transition; its slot stays locked across the lookups.
        let _in_flight = slot_a.lock().await;

        let other = tokio::time::timeout(Duration::from_millis(500), store.get("u-2"))
            .await
            .expect("another user's lookup proceeds while u-1 is in flight");
        assert!(other.is_some());

        let same = tokio::time::timeout(Duration::from_millis(500), store.get("u-1"))
            .await
            .expect("the busy user's own lookup returns without the slot lock");
        assert!(same.is_some(), "an in-flight session counts as live");
    }

    #[tokio::test]
    async fn same_user_updates_are_serialized_by_the_slot_mutex() {
        let store = std::sync::Arc::new(SessionStore::new(Duration::from_secs(60)));
        store.begin("u-1").await;

        let mut tasks = Vec::new();
        for level in [ExperienceLevel::Entry, ExperienceLevel::Expert] {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                let slot = store.get("u-1").await.expect("session exists");
                let mut session = slot.lock().await;
                session.draft.toggle_experience(level);
                session.touch();
            }));
        }
        for task in tasks {
            task.await.expect("task completes");
        }

        let slot = store.get("u-1").await.expect("session exists");
        let session = slot.lock().await;
        assert_eq!(session.draft.experience_levels.len(), 2, "both toggles must land");
    }
}
