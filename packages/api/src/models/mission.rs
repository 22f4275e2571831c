use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store::models::null_as_default;
use store::Id;

use super::{lenient_timestamp, Person};

/// A deployment listed on the missions tab.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: Id,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub creator: Option<Person>,
    #[serde(default)]
    pub country: Option<Country>,
}

/// Host country of a mission.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Country {
    #[serde(default)]
    pub common_name: Option<String>,
    #[serde(default)]
    pub official_name: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub capital: Option<String>,
    #[serde(default)]
    pub flag_url: Option<String>,
}
