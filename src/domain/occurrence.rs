use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Identifiable, ItemKind};

/// Whether the user has marked an occurrence as received or paid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum OccurrenceStatus {
    #[default]
    Unconfirmed,
    Confirmed,
}

impl OccurrenceStatus {
    pub fn is_confirmed(self) -> bool {
        matches!(self, OccurrenceStatus::Confirmed)
    }
}

/// One concrete, dated instance of a recurring item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Occurrence {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub kind: ItemKind,
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(default)]
    pub status: OccurrenceStatus,
}

impl Occurrence {
    pub fn from_new(row: NewOccurrence) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent_id: row.parent_id,
            kind: row.kind,
            date: row.date,
            amount: row.amount,
            status: OccurrenceStatus::Unconfirmed,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.status.is_confirmed()
    }

    /// Marks the occurrence received/paid. Returns `false` if it already was.
    pub fn confirm(&mut self) -> bool {
        if self.is_confirmed() {
            return false;
        }
        self.status = OccurrenceStatus::Confirmed;
        true
    }
}

impl Identifiable for Occurrence {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Row produced by the synchronizer, always inserted unconfirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOccurrence {
    pub parent_id: Uuid,
    pub kind: ItemKind,
    pub date: NaiveDate,
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn confirmation_is_one_way() {
        let mut occurrence = Occurrence::from_new(NewOccurrence {
            parent_id: Uuid::new_v4(),
            kind: ItemKind::Expense,
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            amount: dec!(40),
        });
        assert!(!occurrence.is_confirmed());
        assert!(occurrence.confirm());
        assert!(!occurrence.confirm());
        assert_eq!(occurrence.status, OccurrenceStatus::Confirmed);
    }
}
