//! Wiring of settings, HTTP client and session into one shared context.

use std::sync::Arc;

use api::{ApiClient, ReqwestTransport, Transport};
use store::{FileStore, KeyValueStore, SessionStore};

use crate::actions::Actions;
use crate::config::Settings;
use crate::error::AppError;
use crate::loader::{Resource, ResourceLoader};
use crate::shell::NavigationShell;

/// Everything a screen needs, created once at startup and handed down.
pub struct AppContext<T: Transport, S: KeyValueStore> {
    settings: Settings,
    client: Arc<ApiClient<T>>,
    session: SessionStore<S>,
}

impl<T: Transport, S: KeyValueStore> AppContext<T, S> {
    pub fn new(settings: Settings, client: ApiClient<T>, session: SessionStore<S>) -> Self {
        Self {
            settings,
            client: Arc::new(client),
            session,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn client(&self) -> &Arc<ApiClient<T>> {
        &self.client
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    /// A fresh loader for resource `R` sharing this context's client and session.
    pub fn loader<R: Resource>(&self) -> ResourceLoader<R, T, S> {
        ResourceLoader::new(self.client.clone(), self.session.clone())
    }

    pub fn actions(&self) -> Actions<T, S> {
        Actions::new(
            self.client.clone(),
            self.session.clone(),
            self.settings.auth.required_role.clone(),
        )
    }

    pub async fn shell(&self) -> NavigationShell {
        NavigationShell::start(&self.session).await
    }
}

impl AppContext<ReqwestTransport, FileStore> {
    /// Production wiring: reqwest with the configured timeout and a session
    /// persisted under the data directory.
    pub async fn from_settings(settings: Settings) -> Result<Self, AppError> {
        let transport =
            ReqwestTransport::new(settings.timeout()).map_err(|e| AppError::Network(e.0))?;
        let client =
            ApiClient::with_endpoints(settings.api.base_url.clone(), settings.endpoints(), transport);

        let data_dir = settings.data_dir();
        tracing::debug!(path = %data_dir.display(), "opening session store");
        let session = SessionStore::open(FileStore::new(data_dir)).await;

        Ok(Self::new(settings, client, session))
    }
}
