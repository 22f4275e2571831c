//! # Backend records
//!
//! Wire types for every resource the client reads or writes. Field names follow
//! the backend (`firstname`, `flag_url`, `createdAt`, ...). Everything a screen
//! can live without is optional so a sparse record still decodes.
//!
//! | Module | Types |
//! |--------|-------|
//! | [`mission`] | [`Mission`], [`Country`] |
//! | [`appointment`] | [`Appointment`], [`MissionRef`] |
//! | [`notification`] | [`Notification`] |
//! | [`department`] | [`Department`] |
//! | [`auth`] | [`LoginRequest`], [`LoginResponse`], [`ProfileUpdate`], [`PasswordChange`] |
//!
//! [`Person`] is shared: mission creators, appointment assigners, department
//! readers and members all use it.

pub mod appointment;
pub mod auth;
pub mod department;
pub mod mission;
pub mod notification;

pub use appointment::{Appointment, MissionRef};
pub use auth::{LoginRequest, LoginResponse, PasswordChange, ProfileUpdate};
pub use department::Department;
pub use mission::{Country, Mission};
pub use notification::Notification;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use store::models::null_as_default;
use store::Id;

/// A member of the organisation as embedded in other records.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub firstname: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lastname: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Person {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
            .trim()
            .to_string()
    }
}

/// Timestamp formats seen from the backend, besides RFC 3339. Read as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a backend timestamp: RFC 3339, a naive date-time, or a bare date.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|t| t.and_utc())
}

/// `null`, a missing key or an unreadable timestamp all decode as `None`, so
/// one odd date does not discard the record around it.
pub(crate) fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Value::as_str).and_then(parse_timestamp))
}
