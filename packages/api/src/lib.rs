//! # API crate: the authenticated fetch client for the garrison backend
//!
//! Everything that crosses the network lives here. The app crate never builds a
//! URL or inspects a status code itself; it calls [`ApiClient`] and receives
//! either a decoded value or a [`FetchError`].
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`transport`] | | The [`Transport`] seam and its `reqwest` implementation |
//! | [`client`] | | [`ApiClient`]: bearer header, request logging, typed helpers |
//! | [`envelope`] | | Normalises the backend's three response shapes into one [`Envelope`] |
//! | [`endpoints`] | | Route table for every backend call |
//! | [`models`] | | Missions, appointments, notifications, departments, auth payloads |
//! | `mock` | `test-util` | Scripted [`Transport`] that records requests, for tests |
//!
//! ## Error classification
//!
//! | Variant | When |
//! |---------|------|
//! | [`FetchError::Network`] | no response: DNS, connect, TLS, timeout |
//! | [`FetchError::Http`] | a response arrived but was non-2xx or said `success: false` |
//! | [`FetchError::Parse`] | the body was not JSON, or not the JSON we expected |

pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod models;
pub mod transport;

#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use client::ApiClient;
pub use endpoints::Endpoints;
pub use envelope::Envelope;
pub use error::FetchError;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};

pub use reqwest::Method;
pub use store::{Id, UserInfo};
