//! # ResourceLoader: session-gated fetch state machine
//!
//! Every tab of the app does the same thing: wait for a token, fetch one
//! endpoint, show a spinner, then show the list or an error. [`ResourceLoader`]
//! is that lifecycle written once and instantiated per [`Resource`].
//!
//! ## States
//!
//! ```text
//!          token present               ok
//!   Idle ───────────────▶ Loading ─────────▶ Success(data)
//!     ▲                     │  ▲                 │
//!     │ token cleared       │  └── refresh ──────┤
//!     └─────────────────────┤                    │
//!                           └──────────▶ Error(message) ◀┘
//!                               failure
//! ```
//!
//! - No token, no request. [`load`](ResourceLoader::load) returns the current
//!   state untouched; [`load_when_ready`](ResourceLoader::load_when_ready)
//!   suspends until the session store publishes a token.
//! - The token is read from the session store right before each fetch, never
//!   cached in the loader.
//! - Success replaces the data wholesale. Error keeps the last good data in
//!   [`Snapshot::data`] next to the message, so a view can show both.
//! - Each load takes a generation ticket. When two loads overlap, only the
//!   newest ticket may write its result; older responses are dropped.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use api::{ApiClient, Endpoints, Transport};
use serde::de::DeserializeOwned;
use store::{KeyValueStore, SessionStore};
use tokio::sync::watch;

use crate::error::AppError;

/// One backend collection a screen displays.
pub trait Resource {
    type Output: DeserializeOwned + Clone;

    /// Short name used in logs.
    const NAME: &'static str;

    /// Shown when the server fails without a message of its own.
    const FAILURE: &'static str;

    fn path(endpoints: &Endpoints) -> String;

    fn requires_auth() -> bool {
        true
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> LoadState<T> {
    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// What a view renders: the state plus the last data that loaded successfully.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot<T> {
    pub state: LoadState<T>,
    pub data: Option<T>,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            state: LoadState::Idle,
            data: None,
        }
    }
}

pub struct ResourceLoader<R: Resource, T: Transport, S: KeyValueStore> {
    client: Arc<ApiClient<T>>,
    session: SessionStore<S>,
    snapshot: watch::Sender<Snapshot<R::Output>>,
    generation: AtomicU64,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource, T: Transport, S: KeyValueStore> ResourceLoader<R, T, S> {
    pub fn new(client: Arc<ApiClient<T>>, session: SessionStore<S>) -> Self {
        let (snapshot, _) = watch::channel(Snapshot::default());
        Self {
            client,
            session,
            snapshot,
            generation: AtomicU64::new(0),
            _resource: PhantomData,
        }
    }

    pub fn state(&self) -> LoadState<R::Output> {
        self.snapshot.borrow().state.clone()
    }

    /// Last successfully loaded value, kept across later errors.
    pub fn data(&self) -> Option<R::Output> {
        self.snapshot.borrow().data.clone()
    }

    pub fn snapshot(&self) -> Snapshot<R::Output> {
        self.snapshot.borrow().clone()
    }

    /// Watch every state change, for views that re-render on update.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<R::Output>> {
        self.snapshot.subscribe()
    }

    /// Fetch once if a session exists.
    pub async fn load(&self) -> LoadState<R::Output> {
        let token = self.session.get().await.token;
        if R::requires_auth() && token.is_none() {
            tracing::debug!(resource = R::NAME, "no session, not fetching");
            return self.state();
        }

        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.snapshot.send_modify(|s| s.state = LoadState::Loading);

        let path = R::path(self.client.endpoints());
        let result = self
            .client
            .get::<R::Output>(&path, token.as_deref())
            .await;

        if self.generation.load(Ordering::SeqCst) != ticket {
            tracing::debug!(resource = R::NAME, ticket, "discarding superseded response");
            return self.state();
        }

        match result {
            Ok(data) => {
                tracing::debug!(resource = R::NAME, "loaded");
                self.snapshot.send_modify(|s| {
                    s.state = LoadState::Success(data.clone());
                    s.data = Some(data);
                });
            }
            Err(e) => {
                let err = AppError::from_fetch(e, R::FAILURE);
                tracing::warn!(resource = R::NAME, "load failed: {}", err);
                self.snapshot
                    .send_modify(|s| s.state = LoadState::Error(err.to_string()));
            }
        }
        self.state()
    }

    /// User-requested reload.
    pub async fn refresh(&self) -> LoadState<R::Output> {
        self.load().await
    }

    /// Wait for a session, then load.
    pub async fn load_when_ready(&self) -> LoadState<R::Output> {
        if R::requires_auth() {
            let mut rx = self.session.subscribe();
            if rx.wait_for(Option::is_some).await.is_err() {
                return self.state();
            }
        }
        self.load().await
    }

    /// Reload on every token change and reset when the session ends.
    ///
    /// Never returns while the session store is alive; drop the future to stop.
    pub async fn follow_session(&self) {
        let mut rx = self.session.subscribe();
        loop {
            let signed_in = rx.borrow_and_update().is_some();
            if signed_in {
                self.load().await;
            } else {
                self.reset();
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Back to `Idle` with no data. Any in-flight load is superseded.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.snapshot.send_replace(Snapshot::default());
    }

    /// Apply a server-confirmed change to the loaded data. Returns `false` if
    /// nothing has loaded yet.
    pub fn modify(&self, f: impl FnOnce(&mut R::Output)) -> bool {
        self.snapshot.send_if_modified(|s| {
            let Some(data) = s.data.as_mut() else {
                return false;
            };
            f(data);
            if let LoadState::Success(shown) = &mut s.state {
                *shown = data.clone();
            }
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{Missions, Notifications};
    use api::mock::MockTransport;
    use api::Method;
    use serde_json::json;
    use std::time::Duration;
    use store::{MemoryStore, UserInfo};

    const MISSIONS: &str = "/api/v1/mission/";

    async fn setup(
        token: Option<&str>,
    ) -> (MockTransport, SessionStore<MemoryStore>, Arc<ApiClient<MockTransport>>) {
        let mock = MockTransport::new();
        let session = SessionStore::open(MemoryStore::new()).await;
        if let Some(token) = token {
            session.set(token, &UserInfo::default()).await.unwrap();
        }
        let client = Arc::new(ApiClient::new("https://api.test", mock.clone()));
        (mock, session, client)
    }

    fn relief_op() -> serde_json::Value {
        json!({"data": [{"id": 1, "name": "Relief Op", "status": "active"}]})
    }

    #[tokio::test]
    async fn test_no_token_no_request() {
        let (mock, session, client) = setup(None).await;
        let loader = ResourceLoader::<Missions, _, _>::new(client, session);

        assert_eq!(loader.load().await, LoadState::Idle);
        assert_eq!(loader.refresh().await, LoadState::Idle);
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_missions_success() {
        let (mock, session, client) = setup(Some("abc123")).await;
        mock.respond(Method::GET, MISSIONS, 200, relief_op());
        let loader = ResourceLoader::<Missions, _, _>::new(client, session);
        assert_eq!(loader.state(), LoadState::Idle);

        let state = loader.load().await;
        let LoadState::Success(missions) = state else {
            panic!("expected success, got {:?}", state);
        };
        assert_eq!(missions.len(), 1);
        assert_eq!(missions[0].name, "Relief Op");
        assert_eq!(loader.data().unwrap().len(), 1);
        assert_eq!(mock.requests()[0].bearer.as_deref(), Some("abc123"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_passes_through_loading() {
        let (mock, session, client) = setup(Some("abc123")).await;
        mock.respond_after(Method::GET, MISSIONS, 200, relief_op(), Duration::from_millis(50));
        let loader = ResourceLoader::<Missions, _, _>::new(client, session);

        let observe = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            loader.state()
        };
        let (finished, midway) = tokio::join!(loader.load(), observe);

        assert_eq!(midway, LoadState::Loading);
        assert!(matches!(finished, LoadState::Success(ref m) if m.len() == 1));
    }

    #[tokio::test]
    async fn test_server_error_on_first_load() {
        let (mock, session, client) = setup(Some("abc123")).await;
        mock.respond_raw(Method::GET, MISSIONS, 500, "Internal Server Error");
        let loader = ResourceLoader::<Missions, _, _>::new(client, session);

        let state = loader.load().await;
        let message = state.error().expect("error state");
        assert!(!message.is_empty());
        assert!(loader.data().is_none());
    }

    #[tokio::test]
    async fn test_error_keeps_previous_data() {
        let (mock, session, client) = setup(Some("abc123")).await;
        mock.respond(Method::GET, MISSIONS, 200, relief_op());
        mock.respond(Method::GET, MISSIONS, 500, json!({"message": "database down"}));
        let loader = ResourceLoader::<Missions, _, _>::new(client, session);

        loader.load().await;
        let state = loader.refresh().await;

        assert_eq!(state.error(), Some("database down"));
        let snapshot = loader.snapshot();
        assert_eq!(snapshot.data.unwrap()[0].name, "Relief Op");
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_response_is_dropped() {
        let (mock, session, client) = setup(Some("abc123")).await;
        mock.respond_after(
            Method::GET,
            MISSIONS,
            200,
            json!({"data": [{"id": 1, "name": "Stale", "status": "active"}]}),
            Duration::from_millis(100),
        );
        mock.respond_after(
            Method::GET,
            MISSIONS,
            200,
            json!({"data": [{"id": 2, "name": "Fresh", "status": "active"}]}),
            Duration::from_millis(10),
        );
        let loader = ResourceLoader::<Missions, _, _>::new(client, session);

        let second = async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            loader.refresh().await
        };
        tokio::join!(loader.load(), second);

        assert_eq!(mock.request_count(), 2);
        let data = loader.data().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].name, "Fresh");
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_when_ready_waits_for_login() {
        let (mock, session, client) = setup(None).await;
        mock.respond(Method::GET, MISSIONS, 200, relief_op());
        let loader = ResourceLoader::<Missions, _, _>::new(client, session.clone());

        let login = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            assert_eq!(mock.request_count(), 0);
            session.set("abc123", &UserInfo::default()).await.unwrap();
        };
        let (state, _) = tokio::join!(loader.load_when_ready(), login);

        assert!(matches!(state, LoadState::Success(_)));
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_follow_session_loads_and_resets() {
        let (mock, session, client) = setup(None).await;
        mock.respond(Method::GET, "/api/v1/notification/", 200, json!({"data": []}));
        let loader = ResourceLoader::<Notifications, _, _>::new(client, session.clone());

        let drive = async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            assert_eq!(loader.state(), LoadState::Idle);

            session.set("abc123", &UserInfo::default()).await.unwrap();
            tokio::time::sleep(Duration::from_millis(5)).await;
            assert_eq!(loader.state(), LoadState::Success(vec![]));

            session.clear().await.unwrap();
            tokio::time::sleep(Duration::from_millis(5)).await;
            assert_eq!(loader.snapshot(), Snapshot::default());
        };

        tokio::select! {
            _ = loader.follow_session() => panic!("follow_session returned"),
            _ = drive => {}
        }
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_modify_before_load_is_noop() {
        let (_mock, session, client) = setup(Some("t")).await;
        let loader = ResourceLoader::<Notifications, _, _>::new(client, session);
        assert!(!loader.modify(|list| list.clear()));
    }
}
