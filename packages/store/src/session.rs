//! # Session: the persisted authentication state
//!
//! A [`Session`] is the bearer token plus the user record the server returned
//! with it. [`SessionStore`] is the single service that reads and writes it; the
//! app crate injects one instance into every loader and action instead of
//! letting each screen touch storage directly.
//!
//! ## Keys
//!
//! | Key | Value |
//! |-----|-------|
//! | [`TOKEN_KEY`] (`"token"`) | opaque bearer token |
//! | [`USER_KEY`] (`"user"`) | [`UserInfo`] as JSON |
//!
//! ## Guarantees
//!
//! - [`SessionStore::get`] never fails. Unreadable storage or a corrupt user
//!   record degrade to absence and are logged.
//! - A failed [`set`](SessionStore::set) puts the previous user record back, so
//!   the session read afterwards is the one that existed before the call.
//! - A user is only ever returned together with a token. The write order of
//!   [`set`](SessionStore::set) (user, then token) and [`clear`](SessionStore::clear)
//!   (token, then user) means the token key alone decides whether a session
//!   exists, even if the process dies between the two writes.
//! - Every operation holds the store's async mutex for its whole duration, so
//!   callers never observe a half-applied `set` or `clear`.
//! - [`subscribe`](SessionStore::subscribe) publishes the token after each
//!   successful `set`/`clear`. Loaders and the navigation shell follow it.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use crate::models::UserInfo;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Authentication state read back from storage.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserInfo>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

struct Inner<S> {
    store: S,
    lock: Mutex<()>,
    token_tx: watch::Sender<Option<String>>,
}

/// Shared handle over the persisted session. Cloning shares the same storage and watch.
pub struct SessionStore<S: KeyValueStore> {
    inner: Arc<Inner<S>>,
}

impl<S: KeyValueStore> Clone for SessionStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Wrap `store` and seed the token watch from whatever it already holds.
    pub async fn open(store: S) -> Self {
        let (token_tx, _) = watch::channel(None);
        let session = Self {
            inner: Arc::new(Inner {
                store,
                lock: Mutex::new(()),
                token_tx,
            }),
        };
        let current = session.get().await;
        session.inner.token_tx.send_replace(current.token);
        session
    }

    /// Read the stored session. Absent or unreadable data yields an empty session.
    pub async fn get(&self) -> Session {
        let _guard = self.inner.lock.lock().await;
        self.read_unlocked().await
    }

    /// Persist a freshly issued token together with its user.
    pub async fn set(&self, token: &str, user: &UserInfo) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(user)?;
        let _guard = self.inner.lock.lock().await;

        let previous = self.inner.store.get(USER_KEY).await.ok().flatten();
        self.inner.store.set(USER_KEY, encoded).await?;
        if let Err(e) = self.inner.store.set(TOKEN_KEY, token.to_string()).await {
            let rollback = match previous {
                Some(raw) => self.inner.store.set(USER_KEY, raw).await,
                None => self.inner.store.remove(USER_KEY).await,
            };
            if let Err(rollback) = rollback {
                tracing::warn!("failed to roll back cached user: {}", rollback);
            }
            return Err(e);
        }

        self.inner.token_tx.send_replace(Some(token.to_string()));
        tracing::debug!("session stored");
        Ok(())
    }

    /// Overwrite the cached user of the current session.
    pub async fn replace_user(&self, user: &UserInfo) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(user)?;
        let _guard = self.inner.lock.lock().await;

        if self.read_token().await.is_none() {
            return Err(StoreError::NoSession);
        }
        self.inner.store.set(USER_KEY, encoded).await
    }

    /// Remove token and user. Succeeds when nothing is stored.
    pub async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.inner.lock.lock().await;

        self.inner.store.remove(TOKEN_KEY).await?;
        // The token is gone, so the session is over even if the user key lingers.
        self.inner.token_tx.send_replace(None);
        self.inner.store.remove(USER_KEY).await?;
        tracing::debug!("session cleared");
        Ok(())
    }

    /// Watch the current token. The initial value reflects storage at [`open`](Self::open).
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.inner.token_tx.subscribe()
    }

    /// Token as last published, without touching storage.
    pub fn current_token(&self) -> Option<String> {
        self.inner.token_tx.borrow().clone()
    }

    async fn read_token(&self) -> Option<String> {
        match self.inner.store.get(TOKEN_KEY).await {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("failed to read session token: {}", e);
                None
            }
        }
    }

    async fn read_unlocked(&self) -> Session {
        let Some(token) = self.read_token().await else {
            return Session::default();
        };

        let user = match self.inner.store.get(USER_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<UserInfo>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!("ignoring unreadable cached user: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("failed to read cached user: {}", e);
                None
            }
        };

        Session {
            token: Some(token),
            user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileStore, Id, MemoryStore};

    /// MemoryStore that refuses writes to `fail_set` and removals of `fail_remove`.
    #[derive(Clone, Default)]
    struct FailingStore {
        inner: MemoryStore,
        fail_set: Option<&'static str>,
        fail_remove: Option<&'static str>,
    }

    impl FailingStore {
        fn refuse(key: &str) -> StoreError {
            StoreError::Io {
                key: key.to_string(),
                path: key.into(),
                source: std::io::Error::other("disk full"),
            }
        }
    }

    impl KeyValueStore for FailingStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
            if self.fail_set == Some(key) {
                return Err(Self::refuse(key));
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), StoreError> {
            if self.fail_remove == Some(key) {
                return Err(Self::refuse(key));
            }
            self.inner.remove(key).await
        }
    }

    fn soldier() -> UserInfo {
        UserInfo {
            id: Some(Id::Num(1)),
            firstname: "Jean".into(),
            lastname: "Bosco".into(),
            email: "jean@army.rw".into(),
            role: Some("soldier".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_empty_store_gives_empty_session() {
        let sessions = SessionStore::open(MemoryStore::new()).await;
        let session = sessions.get().await;
        assert_eq!(session, Session::default());
        assert!(!session.is_authenticated());
        assert!(sessions.subscribe().borrow().is_none());
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let sessions = SessionStore::open(MemoryStore::new()).await;
        sessions.set("abc123", &soldier()).await.unwrap();

        let session = sessions.get().await;
        assert_eq!(session.token.as_deref(), Some("abc123"));
        assert_eq!(session.user, Some(soldier()));
        assert_eq!(sessions.current_token().as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_user_without_token_is_hidden() {
        let kv = MemoryStore::new();
        kv.set(USER_KEY, serde_json::to_string(&soldier()).unwrap())
            .await
            .unwrap();

        let sessions = SessionStore::open(kv).await;
        assert_eq!(sessions.get().await, Session::default());
    }

    #[tokio::test]
    async fn test_corrupt_user_degrades_to_token_only() {
        let kv = MemoryStore::new();
        kv.set(TOKEN_KEY, "t".into()).await.unwrap();
        kv.set(USER_KEY, "{not json".into()).await.unwrap();

        let session = SessionStore::open(kv).await.get().await;
        assert_eq!(session.token.as_deref(), Some("t"));
        assert!(session.user.is_none());
    }

    #[tokio::test]
    async fn test_clear_always_empties() {
        let kv = MemoryStore::new();
        let sessions = SessionStore::open(kv.clone()).await;

        // Nothing stored yet
        sessions.clear().await.unwrap();
        assert_eq!(sessions.get().await, Session::default());

        sessions.set("abc123", &soldier()).await.unwrap();
        sessions.clear().await.unwrap();
        assert_eq!(sessions.get().await, Session::default());
        assert!(kv.is_empty());
        assert!(sessions.subscribe().borrow().is_none());
    }

    #[tokio::test]
    async fn test_replace_user_requires_session() {
        let sessions = SessionStore::open(MemoryStore::new()).await;
        assert!(matches!(
            sessions.replace_user(&soldier()).await,
            Err(StoreError::NoSession)
        ));

        sessions.set("abc123", &soldier()).await.unwrap();
        let updated = UserInfo {
            phone: "0788000000".into(),
            ..soldier()
        };
        sessions.replace_user(&updated).await.unwrap();
        assert_eq!(sessions.get().await.user, Some(updated));
    }

    #[tokio::test]
    async fn test_watch_follows_set_and_clear() {
        let sessions = SessionStore::open(MemoryStore::new()).await;
        let mut rx = sessions.subscribe();

        sessions.set("abc123", &soldier()).await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_deref(), Some("abc123"));

        sessions.clear().await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_none());
    }

    #[tokio::test]
    async fn test_failed_token_write_restores_previous_session() {
        let kv = MemoryStore::new();
        SessionStore::open(kv.clone())
            .await
            .set("old", &soldier())
            .await
            .unwrap();

        let sessions = SessionStore::open(FailingStore {
            inner: kv.clone(),
            fail_set: Some(TOKEN_KEY),
            ..Default::default()
        })
        .await;
        let mut rx = sessions.subscribe();
        rx.borrow_and_update();

        let officer = UserInfo {
            id: Some(Id::Num(2)),
            role: Some("officer".into()),
            ..soldier()
        };
        assert!(sessions.set("new", &officer).await.is_err());

        let session = sessions.get().await;
        assert_eq!(session.token.as_deref(), Some("old"));
        assert_eq!(session.user, Some(soldier()));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(sessions.current_token().as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn test_failed_first_login_leaves_no_user() {
        let kv = MemoryStore::new();
        let sessions = SessionStore::open(FailingStore {
            inner: kv.clone(),
            fail_set: Some(TOKEN_KEY),
            ..Default::default()
        })
        .await;

        assert!(sessions.set("abc123", &soldier()).await.is_err());
        assert_eq!(sessions.get().await, Session::default());
        assert!(kv.is_empty());
        assert!(sessions.subscribe().borrow().is_none());
    }

    #[tokio::test]
    async fn test_clear_failing_on_user_still_ends_session() {
        let kv = MemoryStore::new();
        let sessions = SessionStore::open(FailingStore {
            inner: kv.clone(),
            fail_remove: Some(USER_KEY),
            ..Default::default()
        })
        .await;
        sessions.set("abc123", &soldier()).await.unwrap();

        assert!(sessions.clear().await.is_err());
        assert_eq!(sessions.get().await, Session::default());
        assert!(sessions.subscribe().borrow().is_none());
        // The orphaned user stays on disk but is never returned without a token.
        assert!(kv.get(USER_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_session_survives_restart() {
        let dir = tempfile::tempdir().unwrap();

        let sessions = SessionStore::open(FileStore::new(dir.path().to_path_buf())).await;
        sessions.set("abc123", &soldier()).await.unwrap();
        drop(sessions);

        let reopened = SessionStore::open(FileStore::new(dir.path().to_path_buf())).await;
        assert_eq!(reopened.current_token().as_deref(), Some("abc123"));
        assert_eq!(reopened.get().await.user, Some(soldier()));
    }
}
