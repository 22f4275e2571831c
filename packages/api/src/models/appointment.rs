use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store::models::null_as_default;
use store::Id;

use super::{lenient_timestamp, Person};

/// An assignment of the signed-in user to a mission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Id,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mission: Option<MissionRef>,
    #[serde(default)]
    pub assigner: Option<Person>,
}

/// The slice of a mission embedded in an appointment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionRef {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}
