use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Identifiable, RecordStatus};

/// Label attached to expense items for grouping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub status: RecordStatus,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status: RecordStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_visible()
    }

    pub fn retire(&mut self) {
        self.status = RecordStatus::Obsolete;
    }
}

impl Identifiable for Category {
    fn id(&self) -> Uuid {
        self.id
    }
}
