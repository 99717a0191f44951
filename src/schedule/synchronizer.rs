use tracing::{debug, error, info};
use uuid::Uuid;

use super::expander::expand_item;
use crate::{
    domain::{DateWindow, ItemKind, NewOccurrence, RecurringItem},
    storage::ScheduleStore,
};

/// Step of the per-item unit of work that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    ListItems,
    Delete,
    Insert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    pub item_id: Option<Uuid>,
    pub stage: SyncStage,
    pub message: String,
}

/// Outcome of synchronizing one kind of item for one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub kind: ItemKind,
    pub year: i32,
    pub items_processed: usize,
    pub items_skipped: usize,
    pub rows_deleted: usize,
    pub rows_inserted: usize,
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    fn new(kind: ItemKind, year: i32) -> Self {
        Self {
            kind,
            year,
            items_processed: 0,
            items_skipped: 0,
            rows_deleted: 0,
            rows_inserted: 0,
            failures: Vec::new(),
        }
    }

    fn fail(&mut self, item_id: Option<Uuid>, stage: SyncStage, message: String) {
        self.failures.push(SyncFailure {
            item_id,
            stage,
            message,
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearReport {
    pub year: i32,
    pub income: SyncReport,
    pub expense: SyncReport,
}

impl YearReport {
    pub fn rows_inserted(&self) -> usize {
        self.income.rows_inserted + self.expense.rows_inserted
    }

    pub fn rows_deleted(&self) -> usize {
        self.income.rows_deleted + self.expense.rows_deleted
    }

    pub fn failure_count(&self) -> usize {
        self.income.failures.len() + self.expense.failures.len()
    }
}

/// Materializes a year's occurrences for every active item, best effort.
///
/// Each item is an independent unit of work: stale unconfirmed rows are deleted
/// first, then the freshly expanded dates are inserted with duplicate-ignore
/// semantics so confirmed rows are never touched. Failures are logged and
/// recorded in the report; they never stop the batch.
pub struct ScheduleSynchronizer<'a, S: ScheduleStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ScheduleStore + ?Sized> ScheduleSynchronizer<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Regenerates incomes, then expenses, for `year`.
    pub fn generate_year(&self, year: i32) -> YearReport {
        info!(year, "generating schedules");
        let income = self.sync_kind(ItemKind::Income, year);
        let expense = self.sync_kind(ItemKind::Expense, year);
        let report = YearReport {
            year,
            income,
            expense,
        };
        info!(
            year,
            inserted = report.rows_inserted(),
            deleted = report.rows_deleted(),
            failures = report.failure_count(),
            "schedule generation finished"
        );
        report
    }

    /// Runs [`Self::generate_year`] for each distinct year, in ascending order.
    pub fn generate_years(&self, years: &[i32]) -> Vec<YearReport> {
        let mut ordered = years.to_vec();
        ordered.sort_unstable();
        ordered.dedup();
        ordered
            .into_iter()
            .map(|year| self.generate_year(year))
            .collect()
    }

    pub fn sync_kind(&self, kind: ItemKind, year: i32) -> SyncReport {
        let mut report = SyncReport::new(kind, year);
        let window = match DateWindow::for_year(year) {
            Ok(window) => window,
            Err(err) => {
                error!(year, %kind, %err, "cannot build year window");
                report.fail(None, SyncStage::ListItems, err.to_string());
                return report;
            }
        };
        let items = match self.store.active_items(kind) {
            Ok(items) => items,
            Err(err) => {
                error!(year, %kind, %err, "failed to fetch recurring items");
                report.fail(None, SyncStage::ListItems, err.to_string());
                return report;
            }
        };
        for item in &items {
            self.sync_item(item, year, window, &mut report);
        }
        report
    }

    fn sync_item(&self, item: &RecurringItem, year: i32, window: DateWindow, report: &mut SyncReport) {
        report.items_processed += 1;

        // Delete always precedes insert for the same item.
        match self.store.delete_unconfirmed(item.id, window) {
            Ok(removed) => report.rows_deleted += removed,
            Err(err) => {
                error!(item = %item.id, year, %err, "failed to delete unconfirmed occurrences");
                report.fail(Some(item.id), SyncStage::Delete, err.to_string());
            }
        }

        let Some(dates) = expand_item(item, year) else {
            report.items_skipped += 1;
            return;
        };
        let rows: Vec<NewOccurrence> = dates
            .into_iter()
            .map(|date| NewOccurrence {
                parent_id: item.id,
                kind: item.kind,
                date,
                amount: item.amount,
            })
            .collect();
        if rows.is_empty() {
            debug!(item = %item.id, year, "no occurrences in year");
            return;
        }

        let generated = rows.len();
        match self.store.insert_ignoring_duplicates(rows) {
            Ok(inserted) => {
                report.rows_inserted += inserted;
                debug!(item = %item.id, year, generated, inserted, "item synchronized");
            }
            Err(err) => {
                error!(item = %item.id, year, %err, "failed to insert occurrences");
                report.fail(Some(item.id), SyncStage::Insert, err.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::StoreError, storage::MockScheduleStore};
    use mockall::predicate::{always, eq};
    use rust_decimal_macros::dec;

    fn salary() -> RecurringItem {
        RecurringItem::new(ItemKind::Income, "Salary", dec!(2500), "2023-05-15", 1)
    }

    #[test]
    fn delete_failure_still_inserts() {
        let item = salary();
        let item_id = item.id;
        let mut store = MockScheduleStore::new();
        store
            .expect_active_items()
            .with(eq(ItemKind::Income))
            .returning(move |_| Ok(vec![item.clone()]));
        store
            .expect_delete_unconfirmed()
            .with(eq(item_id), always())
            .times(1)
            .returning(|_, _| Err(StoreError::Unavailable("timeout".into())));
        store
            .expect_insert_ignoring_duplicates()
            .times(1)
            .returning(|rows| {
                assert_eq!(rows.len(), 12);
                assert!(rows.iter().all(|row| row.amount == dec!(2500)));
                Ok(rows.len())
            });

        let report = ScheduleSynchronizer::new(&store).sync_kind(ItemKind::Income, 2024);

        assert_eq!(report.rows_inserted, 12);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].stage, SyncStage::Delete);
        assert_eq!(report.failures[0].item_id, Some(item_id));
    }

    #[test]
    fn insert_failure_does_not_stop_remaining_items() {
        let first = salary();
        let second = RecurringItem::new(ItemKind::Income, "Side gig", dec!(300), "2024-02-01", 3);
        let items = vec![first.clone(), second.clone()];
        let first_id = first.id;
        let mut store = MockScheduleStore::new();
        store
            .expect_active_items()
            .returning(move |_| Ok(items.clone()));
        store
            .expect_delete_unconfirmed()
            .times(2)
            .returning(|_, _| Ok(0));
        store
            .expect_insert_ignoring_duplicates()
            .times(2)
            .returning(move |rows| {
                if rows[0].parent_id == first_id {
                    Err(StoreError::Unavailable("constraint check failed".into()))
                } else {
                    Ok(rows.len())
                }
            });

        let report = ScheduleSynchronizer::new(&store).sync_kind(ItemKind::Income, 2024);

        assert_eq!(report.items_processed, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].stage, SyncStage::Insert);
        // Weekly from 2024-02-01 (a Thursday) through the end of the year.
        assert_eq!(report.rows_inserted, 48);
    }

    #[test]
    fn unparsable_start_deletes_but_never_inserts() {
        let broken = RecurringItem::new(ItemKind::Expense, "Broken", dec!(5), "soon", 1);
        let mut store = MockScheduleStore::new();
        store
            .expect_active_items()
            .returning(move |_| Ok(vec![broken.clone()]));
        store
            .expect_delete_unconfirmed()
            .times(1)
            .returning(|_, _| Ok(3));
        store.expect_insert_ignoring_duplicates().never();

        let report = ScheduleSynchronizer::new(&store).sync_kind(ItemKind::Expense, 2024);

        assert_eq!(report.items_skipped, 1);
        assert_eq!(report.rows_deleted, 3);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn empty_schedule_skips_insert() {
        let once = RecurringItem::new(ItemKind::Expense, "Laptop", dec!(1500), "2023-09-01", 4);
        let mut store = MockScheduleStore::new();
        store
            .expect_active_items()
            .returning(move |_| Ok(vec![once.clone()]));
        store.expect_delete_unconfirmed().returning(|_, _| Ok(0));
        store.expect_insert_ignoring_duplicates().never();

        let report = ScheduleSynchronizer::new(&store).sync_kind(ItemKind::Expense, 2024);
        assert_eq!(report.rows_inserted, 0);
        assert_eq!(report.items_skipped, 0);
    }

    #[test]
    fn listing_failure_for_incomes_still_runs_expenses() {
        let rent = RecurringItem::new(ItemKind::Expense, "Rent", dec!(1200), "2024-01-01", 1);
        let mut store = MockScheduleStore::new();
        store
            .expect_active_items()
            .with(eq(ItemKind::Income))
            .returning(|_| Err(StoreError::Unavailable("offline".into())));
        store
            .expect_active_items()
            .with(eq(ItemKind::Expense))
            .returning(move |_| Ok(vec![rent.clone()]));
        store.expect_delete_unconfirmed().returning(|_, _| Ok(0));
        store
            .expect_insert_ignoring_duplicates()
            .returning(|rows| Ok(rows.len()));

        let report = ScheduleSynchronizer::new(&store).generate_year(2024);

        assert_eq!(report.income.failures[0].stage, SyncStage::ListItems);
        assert_eq!(report.income.items_processed, 0);
        assert_eq!(report.expense.rows_inserted, 12);
        assert_eq!(report.failure_count(), 1);
    }

    #[test]
    fn generate_years_runs_each_year_once_in_order() {
        let mut store = MockScheduleStore::new();
        store.expect_active_items().times(4).returning(|_| Ok(Vec::new()));

        let reports = ScheduleSynchronizer::new(&store).generate_years(&[2025, 2024, 2025]);
        let years: Vec<i32> = reports.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2024, 2025]);
    }
}
