use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use super::{resolve_prefix, ServiceError, ServiceResult};
use crate::domain::{DateWindow, FinanceBook, ItemKind, OccurrenceStatus};

/// Occurrence joined with its parent item's name, for listings.
#[derive(Debug, Clone, PartialEq)]
pub struct OccurrenceView {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub name: String,
    pub kind: ItemKind,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub status: OccurrenceStatus,
}

pub struct OccurrenceService;

impl OccurrenceService {
    /// Marks an occurrence received/paid. Returns `false` if it already was.
    pub fn confirm(book: &mut FinanceBook, id: Uuid) -> ServiceResult<bool> {
        let occurrence = book
            .occurrence_mut(id)
            .ok_or_else(|| ServiceError::NotFound(format!("occurrence {id}")))?;
        let changed = occurrence.confirm();
        if changed {
            info!(occurrence = %id, date = %occurrence.date, "occurrence confirmed");
            book.touch();
        }
        Ok(changed)
    }

    /// Overrides the amount of a single occurrence. Unconfirmed rows are still
    /// replaced the next time their year is generated.
    pub fn set_amount(book: &mut FinanceBook, id: Uuid, amount: Decimal) -> ServiceResult<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(ServiceError::Invalid(
                "occurrence amount must be greater than zero".into(),
            ));
        }
        let occurrence = book
            .occurrence_mut(id)
            .ok_or_else(|| ServiceError::NotFound(format!("occurrence {id}")))?;
        let previous = std::mem::replace(&mut occurrence.amount, amount);
        info!(occurrence = %id, %previous, %amount, "occurrence amount changed");
        book.touch();
        Ok(previous)
    }

    pub fn resolve(book: &FinanceBook, prefix: &str) -> ServiceResult<Uuid> {
        resolve_prefix(book.occurrences.iter(), prefix, "occurrence")
    }

    pub fn list(
        book: &FinanceBook,
        window: DateWindow,
        kind: Option<ItemKind>,
    ) -> Vec<OccurrenceView> {
        book.occurrences_in(window, kind)
            .into_iter()
            .map(|occ| OccurrenceView {
                id: occ.id,
                parent_id: occ.parent_id,
                name: book
                    .item(occ.parent_id)
                    .map(|item| item.name.clone())
                    .unwrap_or_else(|| "(unknown item)".into()),
                kind: occ.kind,
                date: occ.date,
                amount: occ.amount,
                status: occ.status,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewOccurrence, RecurringItem};
    use rust_decimal_macros::dec;

    #[test]
    fn confirm_then_list_shows_status_and_name() {
        let mut book = FinanceBook::new("Occurrences");
        let item = RecurringItem::new(ItemKind::Expense, "Rent", dec!(1200), "2024-01-01", 1);
        let parent_id = book.add_item(item);
        book.insert_ignoring_duplicates(vec![NewOccurrence {
            parent_id,
            kind: ItemKind::Expense,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            amount: dec!(1200),
        }]);
        let id = book.occurrences[0].id;

        assert!(OccurrenceService::confirm(&mut book, id).unwrap());
        assert!(!OccurrenceService::confirm(&mut book, id).unwrap());

        let views = OccurrenceService::list(&book, DateWindow::for_year(2024).unwrap(), None);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].name, "Rent");
        assert_eq!(views[0].status, OccurrenceStatus::Confirmed);
    }

    #[test]
    fn set_amount_rejects_non_positive_values() {
        let mut book = FinanceBook::new("Occurrences");
        let parent_id = book.add_item(RecurringItem::new(
            ItemKind::Income,
            "Salary",
            dec!(3000),
            "2024-01-31",
            1,
        ));
        book.insert_ignoring_duplicates(vec![NewOccurrence {
            parent_id,
            kind: ItemKind::Income,
            date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            amount: dec!(3000),
        }]);
        let id = book.occurrences[0].id;

        for bad in [dec!(0), dec!(-5)] {
            assert!(matches!(
                OccurrenceService::set_amount(&mut book, id, bad),
                Err(ServiceError::Invalid(_))
            ));
        }
        assert_eq!(book.occurrences[0].amount, dec!(3000));

        let previous = OccurrenceService::set_amount(&mut book, id, dec!(3150.75)).unwrap();
        assert_eq!(previous, dec!(3000));
        assert_eq!(book.occurrences[0].amount, dec!(3150.75));
        assert!(!book.occurrences[0].is_confirmed());
    }

    #[test]
    fn confirm_unknown_id_fails() {
        let mut book = FinanceBook::new("Occurrences");
        assert!(matches!(
            OccurrenceService::confirm(&mut book, Uuid::new_v4()),
            Err(ServiceError::NotFound(_))
        ));
    }
}
