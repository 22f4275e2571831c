//! Scripted [`Transport`] for tests.
//!
//! Replies are queued per `(method, path)` and consumed in order. Every request
//! is recorded, including ones with no scripted reply (those fail as network
//! errors), so tests can assert exactly what reached the wire.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use reqwest::Method;
use serde_json::Value;

use crate::transport::{HttpRequest, HttpResponse, Transport, TransportError};

#[derive(Clone, Debug)]
enum Reply {
    Response { status: u16, body: String },
    Failure(String),
}

#[derive(Clone, Debug)]
struct Scripted {
    reply: Reply,
    delay: Option<Duration>,
}

#[derive(Debug, Default)]
struct State {
    replies: HashMap<(Method, String), VecDeque<Scripted>>,
    requests: Vec<HttpRequest>,
}

/// In-memory transport with queued replies. Clones share the same script.
#[derive(Clone, Debug, Default)]
pub struct MockTransport {
    state: Arc<Mutex<State>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON reply.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        self.push(method, path, Reply::json(status, &body), None);
    }

    /// Queue a JSON reply that arrives after `delay`.
    pub fn respond_after(
        &self,
        method: Method,
        path: &str,
        status: u16,
        body: Value,
        delay: Duration,
    ) {
        self.push(method, path, Reply::json(status, &body), Some(delay));
    }

    /// Queue a reply with a raw, possibly non-JSON, body.
    pub fn respond_raw(&self, method: Method, path: &str, status: u16, body: &str) {
        self.push(
            method,
            path,
            Reply::Response {
                status,
                body: body.to_string(),
            },
            None,
        );
    }

    /// Queue a transport failure (no response).
    pub fn fail(&self, method: Method, path: &str, reason: &str) {
        self.push(method, path, Reply::Failure(reason.to_string()), None);
    }

    /// Every request sent so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state().requests.len()
    }

    fn push(&self, method: Method, path: &str, reply: Reply, delay: Option<Duration>) {
        self.state()
            .replies
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Scripted { reply, delay });
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Reply {
    fn json(status: u16, body: &Value) -> Self {
        Reply::Response {
            status,
            body: body.to_string(),
        }
    }
}

/// Path part of an absolute URL, including the leading slash.
fn path_of(url: &str) -> &str {
    let after_scheme = url.find("://").map(|i| &url[i + 3..]).unwrap_or(url);
    after_scheme
        .find('/')
        .map(|i| &after_scheme[i..])
        .unwrap_or("/")
}

impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let key = (request.method.clone(), path_of(&request.url).to_string());
        let scripted = {
            let mut state = self.state();
            state.requests.push(request);
            state.replies.get_mut(&key).and_then(VecDeque::pop_front)
        };

        let Some(scripted) = scripted else {
            return Err(TransportError(format!("no reply scripted for {} {}", key.0, key.1)));
        };
        if let Some(delay) = scripted.delay {
            tokio::time::sleep(delay).await;
        }
        match scripted.reply {
            Reply::Response { status, body } => Ok(HttpResponse { status, body }),
            Reply::Failure(reason) => Err(TransportError(reason)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_of() {
        assert_eq!(path_of("https://a.b/api/v1/x"), "/api/v1/x");
        assert_eq!(path_of("http://host:8080"), "/");
        assert_eq!(path_of("/already/a/path"), "/already/a/path");
    }
}
