//! # ApiClient: authenticated requests against the backend
//!
//! [`ApiClient`] joins the configured base URL with an endpoint path, attaches
//! `Authorization: Bearer <token>` when the caller passes a token, sends the
//! request through its [`Transport`] and normalises the answer with
//! [`Envelope::from_response`].
//!
//! The client holds no session state. Callers read the token from the session
//! store immediately before each call, so a request is never sent with a token
//! that was already replaced.
//!
//! | Method | Returns |
//! |--------|---------|
//! | [`request`](ApiClient::request) | the normalised [`Envelope`] |
//! | [`get`](ApiClient::get) | `data` decoded as `T` |
//! | [`send_json`](ApiClient::send_json) | `POST`/`PUT` with a JSON body, envelope back |
//! | [`delete`](ApiClient::delete) | envelope of a `DELETE` |

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::endpoints::Endpoints;
use crate::envelope::Envelope;
use crate::error::FetchError;
use crate::transport::{HttpRequest, Transport};

/// HTTP client bound to one backend.
#[derive(Clone, Debug)]
pub struct ApiClient<T: Transport> {
    base_url: String,
    endpoints: Endpoints,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        Self::with_endpoints(base_url, Endpoints::default(), transport)
    }

    pub fn with_endpoints(base_url: impl Into<String>, endpoints: Endpoints, transport: T) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            endpoints,
            transport,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request and normalise the response.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<Envelope, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, path, authenticated = token.is_some(), "sending request");

        let request = HttpRequest {
            method: method.clone(),
            url,
            bearer: token.map(str::to_string),
            body,
        };

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("{} {} failed: {}", method, path, e);
                return Err(FetchError::Network(e.0));
            }
        };

        let status = response.status;
        Envelope::from_response(response).inspect_err(|e| {
            tracing::warn!("{} {} returned {}: {}", method, path, status, e);
        })
    }

    /// `GET path` and decode the payload.
    pub async fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<R, FetchError> {
        self.request(Method::GET, path, token, None).await?.decode()
    }

    /// Send `body` as JSON with `method`.
    pub async fn send_json<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<Envelope, FetchError> {
        let body = serde_json::to_value(body).map_err(|e| FetchError::Parse(e.to_string()))?;
        self.request(method, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<Envelope, FetchError> {
        self.request(Method::DELETE, path, token, None).await
    }
}
