use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::Session;
use crate::error::SessionError;

#[derive(Clone)]
struct Entry {
    session: Session,
    // token expiry; the entry is useless past it
    expires_at: DateTime<Utc>,
}

/// In-process table of signed-in sessions, one per login.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
}

impl SessionStore {
    /// Opens a session that lives until `expires_at`, the expiry of the token
    /// handed out for it. Entries whose token has lapsed are swept first.
    pub async fn insert(&self, session: Session, expires_at: DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.write().await;
        let swept = sweep(&mut sessions, Utc::now());
        if swept > 0 {
            tracing::debug!("Swept {} sessions with lapsed tokens", swept);
        }
        sessions.insert(id, Entry { session, expires_at });
        tracing::debug!("Session {} opened", id);
        id
    }

    /// Returns a copy of the session after re-checking its token and plan expiry.
    /// An expired session is dropped from the store.
    pub async fn resolve(&self, id: Uuid, now: DateTime<Utc>) -> Result<Session, SessionError> {
        let entry = self
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotAuthenticated)?;

        if entry.expires_at <= now {
            self.sessions.write().await.remove(&id);
            tracing::debug!("Session {} closed: token lapsed", id);
            return Err(SessionError::NotAuthenticated);
        }

        if let Err(e) = entry.session.revalidate(now) {
            self.sessions.write().await.remove(&id);
            tracing::warn!("Session {} closed: {}", id, e);
            return Err(e);
        }

        Ok(entry.session)
    }

    /// Writes back a mutated session. A session removed in the meantime stays removed.
    ///
    /// Requests on one session each work on their own copy, so when two overlap
    /// the later `save` wins.
    pub async fn save(&self, id: Uuid, session: Session) {
        if let Some(entry) = self.sessions.write().await.get_mut(&id) {
            entry.session = session;
        }
    }

    pub async fn remove(&self, id: Uuid) -> Option<Session> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|entry| entry.session)
    }

    /// Drops every session whose token lapsed before `now`.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        sweep(&mut *self.sessions.write().await, now)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

fn sweep(sessions: &mut HashMap<Uuid, Entry>, now: DateTime<Utc>) -> usize {
    let before = sessions.len();
    sessions.retain(|_, entry| entry.expires_at > now);
    before - sessions.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{Feature, Plan, UserAccount};
    use chrono::Duration;

    fn session(expires_in: Duration) -> Session {
        Session::logged_in(UserAccount::new(
            "op",
            "pw",
            Plan::Basic,
            Utc::now() + expires_in,
            &["A"],
            &[Feature::Chats],
        ))
    }

    fn in_a_day() -> DateTime<Utc> {
        Utc::now() + Duration::days(1)
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = SessionStore::default();
        let a = store.insert(session(Duration::days(1)), in_a_day()).await;
        let b = store.insert(session(Duration::days(1)), in_a_day()).await;
        assert_ne!(a, b);

        let mut first = store.resolve(a, Utc::now()).await.unwrap();
        first.set_suggestion("only for a".into());
        store.save(a, first).await;

        let second = store.resolve(b, Utc::now()).await.unwrap();
        assert_eq!(second.ai_suggestion(), None);
        assert_eq!(
            store.resolve(a, Utc::now()).await.unwrap().ai_suggestion(),
            Some("only for a")
        );
    }

    #[tokio::test]
    async fn expired_session_is_dropped_on_resolve() {
        let store = SessionStore::default();
        let id = store.insert(session(Duration::hours(1)), in_a_day()).await;

        let later = Utc::now() + Duration::hours(2);
        assert_eq!(store.resolve(id, later).await.unwrap_err(), SessionError::Expired);
        assert!(store.is_empty().await);
        assert_eq!(
            store.resolve(id, Utc::now()).await.unwrap_err(),
            SessionError::NotAuthenticated
        );
    }

    #[tokio::test]
    async fn save_after_remove_does_not_resurrect() {
        let store = SessionStore::default();
        let id = store.insert(session(Duration::days(1)), in_a_day()).await;
        let copy = store.resolve(id, Utc::now()).await.unwrap();

        store.remove(id).await;
        store.save(id, copy).await;
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn lapsed_token_is_dropped_on_resolve() {
        let store = SessionStore::default();
        let id = store
            .insert(session(Duration::days(30)), Utc::now() + Duration::hours(1))
            .await;

        let later = Utc::now() + Duration::hours(2);
        assert_eq!(
            store.resolve(id, later).await.unwrap_err(),
            SessionError::NotAuthenticated
        );
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn abandoned_sessions_are_swept_on_login() {
        let store = SessionStore::default();
        for _ in 0..5 {
            store
                .insert(session(Duration::days(365)), Utc::now() - Duration::seconds(1))
                .await;
        }
        let live = store.insert(session(Duration::days(365)), in_a_day()).await;

        assert_eq!(store.len().await, 1);
        assert!(store.resolve(live, Utc::now()).await.is_ok());
    }

    #[tokio::test]
    async fn purge_keeps_live_sessions() {
        let store = SessionStore::default();
        store
            .insert(session(Duration::days(30)), Utc::now() + Duration::minutes(5))
            .await;
        let kept = store.insert(session(Duration::days(30)), in_a_day()).await;

        let swept = store.purge_expired(Utc::now() + Duration::hours(1)).await;
        assert_eq!(swept, 1);
        assert_eq!(store.len().await, 1);
        assert!(store.resolve(kept, Utc::now()).await.is_ok());
    }

    #[tokio::test]
    async fn overlapping_saves_keep_the_last_write() {
        let store = SessionStore::default();
        let id = store.insert(session(Duration::days(1)), in_a_day()).await;

        let mut first = store.resolve(id, Utc::now()).await.unwrap();
        let mut second = store.resolve(id, Utc::now()).await.unwrap();
        first.set_suggestion("first".into());
        second.set_suggestion("second".into());
        store.save(id, first).await;
        store.save(id, second).await;

        assert_eq!(
            store.resolve(id, Utc::now()).await.unwrap().ai_suggestion(),
            Some("second")
        );
    }
}
