//! # Response envelope normalisation
//!
//! The backend wraps its answers three different ways:
//!
//! | Endpoint family | Shape |
//! |-----------------|-------|
//! | missions, notifications | `{ "data": [...] }` |
//! | appointments | `{ "success": true, "data": [...], "message": "..." }` |
//! | department, login, user updates | the record itself, or `{ "message": "..." }` |
//!
//! [`Envelope::from_response`] folds all of them into one [`Envelope`] so callers
//! never branch on shape:
//!
//! 1. Non-2xx status → [`FetchError::Http`] carrying the body's `message` if the body is JSON.
//! 2. Empty 2xx body → `data = null`.
//! 3. Non-JSON 2xx body → [`FetchError::Parse`].
//! 4. `"success": false` → [`FetchError::Http`] with the response status.
//! 5. An object with a `data` key → that value; anything else → the whole body.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::FetchError;
use crate::transport::HttpResponse;

/// Uniform view of a successful response.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    pub status: u16,
    pub data: Value,
    /// Top-level `message`, when the server sent one.
    pub message: Option<String>,
}

impl Envelope {
    pub fn from_response(response: HttpResponse) -> Result<Self, FetchError> {
        let status = response.status;
        let trimmed = response.body.trim();

        if !response.is_success() {
            let message = serde_json::from_str::<Value>(trimmed)
                .ok()
                .as_ref()
                .and_then(message_of);
            return Err(FetchError::Http { status, message });
        }

        if trimmed.is_empty() {
            return Ok(Self {
                status,
                data: Value::Null,
                message: None,
            });
        }

        let body: Value =
            serde_json::from_str(trimmed).map_err(|e| FetchError::Parse(e.to_string()))?;
        let message = message_of(&body);

        if body.get("success").and_then(Value::as_bool) == Some(false) {
            return Err(FetchError::Http { status, message });
        }

        let data = match body {
            Value::Object(mut map) if map.contains_key("data") => {
                map.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        };

        Ok(Self {
            status,
            data,
            message,
        })
    }

    /// Decode `data` into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, FetchError> {
        serde_json::from_value(self.data).map_err(|e| FetchError::Parse(e.to_string()))
    }
}

fn message_of(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
