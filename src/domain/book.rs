use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    Category, DateWindow, ItemKind, NewOccurrence, Occurrence, RecurringItem, Resolution, Saving,
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// In-memory aggregate of recurring items, their occurrences and the side
/// records (categories, savings, resolutions) kept alongside them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceBook {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub items: Vec<RecurringItem>,
    #[serde(default)]
    pub occurrences: Vec<Occurrence>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub savings: Vec<Saving>,
    #[serde(default)]
    pub resolutions: Vec<Resolution>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "FinanceBook::schema_version_default")]
    pub schema_version: u8,
}

impl FinanceBook {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            items: Vec::new(),
            occurrences: Vec::new(),
            categories: Vec::new(),
            savings: Vec::new(),
            resolutions: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_item(&mut self, item: RecurringItem) -> Uuid {
        let id = item.id;
        self.items.push(item);
        self.touch();
        id
    }

    pub fn item(&self, id: Uuid) -> Option<&RecurringItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn item_mut(&mut self, id: Uuid) -> Option<&mut RecurringItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Items of `kind` that pass the visibility filter, in insertion order.
    pub fn active_items(&self, kind: ItemKind) -> impl Iterator<Item = &RecurringItem> + '_ {
        self.items
            .iter()
            .filter(move |item| item.kind == kind && item.is_active())
    }

    pub fn occurrence(&self, id: Uuid) -> Option<&Occurrence> {
        self.occurrences.iter().find(|occ| occ.id == id)
    }

    pub fn occurrence_mut(&mut self, id: Uuid) -> Option<&mut Occurrence> {
        self.occurrences.iter_mut().find(|occ| occ.id == id)
    }

    pub fn occurrence_on(&self, parent_id: Uuid, date: NaiveDate) -> Option<&Occurrence> {
        self.occurrences
            .iter()
            .find(|occ| occ.parent_id == parent_id && occ.date == date)
    }

    /// Occurrences inside `window`, optionally restricted to one kind, ordered by date.
    pub fn occurrences_in(&self, window: DateWindow, kind: Option<ItemKind>) -> Vec<&Occurrence> {
        let mut found: Vec<&Occurrence> = self
            .occurrences
            .iter()
            .filter(|occ| window.contains(occ.date))
            .filter(|occ| kind.map_or(true, |k| occ.kind == k))
            .collect();
        found.sort_by_key(|occ| (occ.date, occ.kind == ItemKind::Expense));
        found
    }

    /// Drops the unconfirmed occurrences of `parent_id` inside `window`.
    pub fn delete_unconfirmed(&mut self, parent_id: Uuid, window: DateWindow) -> usize {
        let before = self.occurrences.len();
        self.occurrences.retain(|occ| {
            occ.parent_id != parent_id || occ.is_confirmed() || !window.contains(occ.date)
        });
        let removed = before - self.occurrences.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }

    /// Inserts rows whose `(parent_id, date)` is not taken yet; the rest are skipped.
    pub fn insert_ignoring_duplicates(&mut self, rows: Vec<NewOccurrence>) -> usize {
        let mut taken: HashSet<(Uuid, NaiveDate)> = self
            .occurrences
            .iter()
            .map(|occ| (occ.parent_id, occ.date))
            .collect();
        let mut inserted = 0;
        for row in rows {
            if taken.insert((row.parent_id, row.date)) {
                self.occurrences.push(Occurrence::from_new(row));
                inserted += 1;
            }
        }
        if inserted > 0 {
            self.touch();
        }
        inserted
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn category_mut(&mut self, id: Uuid) -> Option<&mut Category> {
        self.categories.iter_mut().find(|category| category.id == id)
    }

    pub fn active_categories(&self) -> impl Iterator<Item = &Category> + '_ {
        self.categories.iter().filter(|category| category.is_active())
    }

    pub fn saving(&self, id: Uuid) -> Option<&Saving> {
        self.savings.iter().find(|saving| saving.id == id)
    }

    pub fn saving_mut(&mut self, id: Uuid) -> Option<&mut Saving> {
        self.savings.iter_mut().find(|saving| saving.id == id)
    }

    /// Active savings of `year`, ordered by month.
    pub fn savings_in(&self, year: i32) -> Vec<&Saving> {
        let mut found: Vec<&Saving> = self
            .savings
            .iter()
            .filter(|saving| saving.year == year && saving.is_active())
            .collect();
        found.sort_by_key(|saving| saving.month);
        found
    }

    pub fn resolution_mut(&mut self, id: Uuid) -> Option<&mut Resolution> {
        self.resolutions.iter_mut().find(|resolution| resolution.id == id)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(parent_id: Uuid, day: NaiveDate) -> NewOccurrence {
        NewOccurrence {
            parent_id,
            kind: ItemKind::Income,
            date: day,
            amount: dec!(100),
        }
    }

    #[test]
    fn duplicate_pairs_are_ignored() {
        let mut book = FinanceBook::new("Dupes");
        let parent = Uuid::new_v4();
        let inserted = book.insert_ignoring_duplicates(vec![
            row(parent, date(2024, 1, 1)),
            row(parent, date(2024, 1, 1)),
            row(parent, date(2024, 2, 1)),
        ]);
        assert_eq!(inserted, 2);
        assert_eq!(book.insert_ignoring_duplicates(vec![row(parent, date(2024, 2, 1))]), 0);
        assert_eq!(book.occurrences.len(), 2);
    }

    #[test]
    fn delete_keeps_confirmed_and_out_of_window_rows() {
        let mut book = FinanceBook::new("Delete");
        let parent = Uuid::new_v4();
        let other = Uuid::new_v4();
        book.insert_ignoring_duplicates(vec![
            row(parent, date(2024, 1, 1)),
            row(parent, date(2024, 6, 1)),
            row(parent, date(2025, 1, 1)),
            row(other, date(2024, 3, 1)),
        ]);
        let confirmed_id = book.occurrence_on(parent, date(2024, 6, 1)).unwrap().id;
        book.occurrence_mut(confirmed_id).unwrap().confirm();

        let removed = book.delete_unconfirmed(parent, DateWindow::for_year(2024).unwrap());

        assert_eq!(removed, 1);
        assert!(book.occurrence_on(parent, date(2024, 1, 1)).is_none());
        assert!(book.occurrence_on(parent, date(2024, 6, 1)).is_some());
        assert!(book.occurrence_on(parent, date(2025, 1, 1)).is_some());
        assert!(book.occurrence_on(other, date(2024, 3, 1)).is_some());
    }
}
