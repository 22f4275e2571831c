//! Backend route table.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use store::Id;

/// Characters left as-is in an id path segment; `/`, `?`, `#` and `%` are escaped.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Canonical spelling of the appointments route.
pub const APPOINTMENTS_PATH: &str = "/api/v1/appointment/user";

/// Paths of every backend call, relative to the API base URL.
#[derive(Clone, Debug, PartialEq)]
pub struct Endpoints {
    appointments: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            appointments: APPOINTMENTS_PATH.to_string(),
        }
    }
}

impl Endpoints {
    /// Route table with an alternative appointments path (some deployments
    /// serve `/api/v1/appoitment/user`).
    pub fn with_appointments_path(path: impl Into<String>) -> Self {
        Self {
            appointments: path.into(),
        }
    }

    pub fn login(&self) -> &str {
        "/api/v1/auth/login"
    }

    pub fn missions(&self) -> &str {
        "/api/v1/mission/"
    }

    pub fn appointments(&self) -> &str {
        &self.appointments
    }

    pub fn notifications(&self) -> &str {
        "/api/v1/notification/"
    }

    pub fn notification_read(&self, id: &Id) -> String {
        format!("/api/v1/notification/read/{}", segment(id))
    }

    pub fn notification_delete(&self, id: &Id) -> String {
        format!("/api/v1/notification/delete/{}", segment(id))
    }

    pub fn department(&self) -> &str {
        "/api/v1/department/user"
    }

    pub fn update_user(&self, id: &Id) -> String {
        format!("/api/v1/users/update/{}", segment(id))
    }

    pub fn change_password(&self) -> &str {
        "/api/v1/users/changePassword"
    }
}

fn segment(id: &Id) -> String {
    match id {
        Id::Num(n) => n.to_string(),
        Id::Str(s) => utf8_percent_encode(s, SEGMENT).to_string(),
    }
}
