use serde::{Deserialize, Serialize};
use store::models::null_as_default;
use store::Id;

use super::Person;

/// The signed-in user's unit, with its reader (commanding officer) and roster.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Department {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reader: Option<Person>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub members: Vec<Person>,
}

impl Department {
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}
