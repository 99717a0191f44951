use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Identifiable, RecordStatus};

/// A monthly savings contribution, with any amount borrowed back out of it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Saving {
    pub id: Uuid,
    pub year: i32,
    pub month: u32,
    pub amount: Decimal,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub borrowed: Decimal,
    #[serde(default)]
    pub repaid: Decimal,
}

impl Saving {
    pub fn new(year: i32, month: u32, amount: Decimal, paid: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            year,
            month,
            amount,
            paid,
            status: RecordStatus::Active,
            borrowed: Decimal::ZERO,
            repaid: Decimal::ZERO,
        }
    }

    /// Borrowed amount not yet paid back.
    pub fn outstanding(&self) -> Decimal {
        self.borrowed - self.repaid
    }

    pub fn is_active(&self) -> bool {
        self.status.is_visible()
    }

    pub fn retire(&mut self) {
        self.status = RecordStatus::Obsolete;
    }
}

impl Identifiable for Saving {
    fn id(&self) -> Uuid {
        self.id
    }
}
