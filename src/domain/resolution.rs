use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Identifiable;

/// A goal set for one year, either shared or owned by one person.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resolution {
    pub id: Uuid,
    pub year: i32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl Resolution {
    pub fn new(year: i32, title: impl Into<String>, person: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            year,
            title: title.into(),
            person,
            completed: false,
        }
    }

    /// Case-insensitive owner match; `None` selects shared resolutions.
    pub fn belongs_to(&self, person: Option<&str>) -> bool {
        match (self.person.as_deref(), person) {
            (None, None) => true,
            (Some(owner), Some(wanted)) => owner.eq_ignore_ascii_case(wanted.trim()),
            _ => false,
        }
    }
}

impl Identifiable for Resolution {
    fn id(&self) -> Uuid {
        self.id
    }
}
