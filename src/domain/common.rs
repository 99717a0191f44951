use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::FinanceError;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Which side of the book a recurring item sits on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Income,
    Expense,
}

impl ItemKind {
    pub const ALL: [ItemKind; 2] = [ItemKind::Income, ItemKind::Expense];

    /// Verb shown when an occurrence of this kind is confirmed.
    pub fn confirmed_label(self) -> &'static str {
        match self {
            ItemKind::Income => "Received",
            ItemKind::Expense => "Paid",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Income => f.write_str("income"),
            ItemKind::Expense => f.write_str("expense"),
        }
    }
}

/// Lifecycle of a recurring item. Retiring an item keeps its history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum RecordStatus {
    #[default]
    Active,
    Obsolete,
}

impl RecordStatus {
    /// Visibility filter applied by listings and by schedule generation.
    pub fn is_visible(self) -> bool {
        matches!(self, RecordStatus::Active)
    }
}

/// Half-open date range `[start, end)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, FinanceError> {
        if end <= start {
            return Err(FinanceError::InvalidInput(
                "window end must be after start".into(),
            ));
        }
        Ok(Self { start, end })
    }

    /// January 1 of `year` up to (excluding) January 1 of the next year.
    pub fn for_year(year: i32) -> Result<Self, FinanceError> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| FinanceError::InvalidInput(format!("year {year} out of range")))?;
        let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)
            .ok_or_else(|| FinanceError::InvalidInput(format!("year {year} out of range")))?;
        Self::new(start, end)
    }

    /// The calendar month `month` (1-12) of `year`.
    pub fn for_month(year: i32, month: u32) -> Result<Self, FinanceError> {
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            FinanceError::InvalidInput(format!("month {month} of {year} out of range"))
        })?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or_else(|| {
            FinanceError::InvalidInput(format!("month {month} of {year} out of range"))
        })?;
        Self::new(start, end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn year_window_covers_both_ends() {
        let window = DateWindow::for_year(2024).unwrap();
        assert!(window.contains(date(2024, 1, 1)));
        assert!(window.contains(date(2024, 12, 31)));
        assert!(!window.contains(date(2025, 1, 1)));
        assert!(!window.contains(date(2023, 12, 31)));
    }

    #[test]
    fn december_window_rolls_into_next_year() {
        let window = DateWindow::for_month(2024, 12).unwrap();
        assert_eq!(window.end, date(2025, 1, 1));
        assert!(DateWindow::for_month(2024, 13).is_err());
    }

    #[test]
    fn rejects_empty_window() {
        let day = date(2024, 5, 5);
        assert!(DateWindow::new(day, day).is_err());
    }

    #[test]
    fn obsolete_records_are_hidden() {
        assert!(RecordStatus::Active.is_visible());
        assert!(!RecordStatus::Obsolete.is_visible());
    }
}
