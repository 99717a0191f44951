use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{dates::parse_iso_date, Identifiable, ItemKind, RecordStatus, RecurrenceRule};

/// A recurring income or expense definition as entered by the user.
///
/// Dates and the rule code are kept exactly as stored; they are interpreted
/// lazily so that a malformed record only affects its own schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringItem {
    pub id: Uuid,
    pub kind: ItemKind,
    pub name: String,
    pub amount: Decimal,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub rule_code: u8,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default, alias = "note", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Expense category; incomes never carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    /// Who earns an income or owns an expense.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<String>,
}

impl RecurringItem {
    pub fn new(
        kind: ItemKind,
        name: impl Into<String>,
        amount: Decimal,
        start_date: impl Into<String>,
        rule_code: u8,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            name: name.into(),
            amount,
            start_date: start_date.into(),
            end_date: None,
            rule_code,
            status: RecordStatus::Active,
            description: None,
            category_id: None,
            person: None,
        }
    }

    pub fn with_end_date(mut self, end_date: impl Into<String>) -> Self {
        self.end_date = Some(end_date.into());
        self
    }

    pub fn start(&self) -> Option<NaiveDate> {
        parse_iso_date(&self.start_date)
    }

    /// Inclusive end bound. A missing or unparsable end date means "no end".
    pub fn end_bound(&self) -> Option<NaiveDate> {
        self.end_date.as_deref().and_then(parse_iso_date)
    }

    pub fn rule(&self) -> Option<RecurrenceRule> {
        RecurrenceRule::from_code(self.kind, self.rule_code)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_visible()
    }

    pub fn retire(&mut self) {
        self.status = RecordStatus::Obsolete;
    }
}

impl Identifiable for RecurringItem {
    fn id(&self) -> Uuid {
        self.id
    }
}
