//! Monthly savings and the borrow/repay ledger kept on each entry.
//!
//! Borrowing is capped per year: everything borrowed from a year's savings
//! may not exceed half of what was actually paid in that year.

use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use super::{resolve_prefix, ServiceError, ServiceResult};
use crate::domain::{FinanceBook, Saving};

/// User-supplied fields for a savings entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SavingDraft {
    pub year: i32,
    pub month: u32,
    pub amount: Decimal,
    pub paid: bool,
}

/// Year-level figures shown next to the savings table.
#[derive(Debug, Clone, PartialEq)]
pub struct SavingsTotals {
    pub year: i32,
    /// Sum of paid contributions.
    pub saved: Decimal,
    /// Sum of contributions not paid yet.
    pub pending: Decimal,
    pub borrowed: Decimal,
    pub repaid: Decimal,
}

impl SavingsTotals {
    pub fn outstanding(&self) -> Decimal {
        self.borrowed - self.repaid
    }

    pub fn max_borrowable(&self) -> Decimal {
        self.saved / Decimal::TWO
    }

    pub fn available_to_borrow(&self) -> Decimal {
        (self.max_borrowable() - self.borrowed).max(Decimal::ZERO)
    }

    /// Paid savings as a percentage of `goal`, rounded to one decimal.
    pub fn goal_progress(&self, goal: Decimal) -> Decimal {
        if goal <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (self.saved / goal * Decimal::ONE_HUNDRED).round_dp(1)
    }
}

pub struct SavingsService;

impl SavingsService {
    pub fn add(book: &mut FinanceBook, draft: SavingDraft) -> ServiceResult<Uuid> {
        let saving = Saving::new(draft.year, draft.month, draft.amount, draft.paid);
        Self::validate(&saving)?;
        let id = saving.id;
        info!(saving = %id, year = saving.year, month = saving.month, "saving added");
        book.savings.push(saving);
        book.touch();
        Ok(id)
    }

    /// Applies `mutator` to the entry; the borrow ledger itself only moves
    /// through [`SavingsService::borrow`] and [`SavingsService::repay`].
    pub fn update<F>(book: &mut FinanceBook, id: Uuid, mutator: F) -> ServiceResult<()>
    where
        F: FnOnce(&mut Saving),
    {
        let saving = Self::active_mut(book, id)?;
        let mut candidate = saving.clone();
        mutator(&mut candidate);
        if candidate.id != id
            || candidate.borrowed != saving.borrowed
            || candidate.repaid != saving.repaid
        {
            return Err(ServiceError::Invalid(
                "saving id and borrow history cannot be edited".into(),
            ));
        }
        Self::validate(&candidate)?;
        *saving = candidate;
        book.touch();
        Ok(())
    }

    /// Soft-deletes the entry. Returns `false` if it was already removed.
    pub fn retire(book: &mut FinanceBook, id: Uuid) -> ServiceResult<bool> {
        let saving = book
            .saving_mut(id)
            .ok_or_else(|| ServiceError::NotFound(format!("saving {id}")))?;
        if !saving.is_active() {
            return Ok(false);
        }
        if saving.outstanding() > Decimal::ZERO {
            warn!(saving = %id, outstanding = %saving.outstanding(), "removing saving with unpaid loan");
        }
        saving.retire();
        book.touch();
        Ok(true)
    }

    pub fn list(book: &FinanceBook, year: i32) -> Vec<&Saving> {
        book.savings_in(year)
    }

    pub fn totals(book: &FinanceBook, year: i32) -> SavingsTotals {
        let mut totals = SavingsTotals {
            year,
            saved: Decimal::ZERO,
            pending: Decimal::ZERO,
            borrowed: Decimal::ZERO,
            repaid: Decimal::ZERO,
        };
        for saving in book.savings_in(year) {
            if saving.paid {
                totals.saved += saving.amount;
            } else {
                totals.pending += saving.amount;
            }
            totals.borrowed += saving.borrowed;
            totals.repaid += saving.repaid;
        }
        totals
    }

    /// Borrows `amount` against the entry. Returns what is still available
    /// to borrow in that year afterwards.
    pub fn borrow(book: &mut FinanceBook, id: Uuid, amount: Decimal) -> ServiceResult<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(ServiceError::Invalid(
                "borrow amount must be greater than zero".into(),
            ));
        }
        let year = Self::active_mut(book, id)?.year;
        let totals = Self::totals(book, year);
        let available = totals.available_to_borrow();
        if totals.borrowed + amount > totals.max_borrowable() {
            return Err(ServiceError::Invalid(format!(
                "cannot borrow {amount}: only {available} of {} may be borrowed in {year}",
                totals.max_borrowable()
            )));
        }
        let saving = Self::active_mut(book, id)?;
        saving.borrowed += amount;
        info!(saving = %id, %amount, "borrowed from savings");
        book.touch();
        Ok(available - amount)
    }

    /// Pays back part of a loan. Returns the entry's remaining balance.
    pub fn repay(book: &mut FinanceBook, id: Uuid, amount: Decimal) -> ServiceResult<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(ServiceError::Invalid(
                "repayment must be greater than zero".into(),
            ));
        }
        let saving = Self::active_mut(book, id)?;
        let outstanding = saving.outstanding();
        if amount > outstanding {
            return Err(ServiceError::Invalid(format!(
                "repayment {amount} exceeds the outstanding balance of {outstanding}"
            )));
        }
        saving.repaid += amount;
        let remaining = saving.outstanding();
        info!(saving = %id, %amount, %remaining, "savings loan repaid");
        book.touch();
        Ok(remaining)
    }

    pub fn resolve(book: &FinanceBook, prefix: &str) -> ServiceResult<Uuid> {
        resolve_prefix(
            book.savings.iter().filter(|saving| saving.is_active()),
            prefix,
            "saving",
        )
    }

    fn active_mut(book: &mut FinanceBook, id: Uuid) -> ServiceResult<&mut Saving> {
        book.saving_mut(id)
            .filter(|saving| saving.is_active())
            .ok_or_else(|| ServiceError::NotFound(format!("saving {id}")))
    }

    fn validate(saving: &Saving) -> ServiceResult<()> {
        if !(1..=9999).contains(&saving.year) {
            return Err(ServiceError::Invalid(format!("invalid year {}", saving.year)));
        }
        if !(1..=12).contains(&saving.month) {
            return Err(ServiceError::Invalid(format!(
                "month must be between 1 and 12, got {}",
                saving.month
            )));
        }
        if saving.amount <= Decimal::ZERO {
            return Err(ServiceError::Invalid(
                "saving amount must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn draft(month: u32, amount: Decimal, paid: bool) -> SavingDraft {
        SavingDraft {
            year: 2024,
            month,
            amount,
            paid,
        }
    }

    fn seeded() -> (FinanceBook, Uuid, Uuid) {
        let mut book = FinanceBook::new("Savings");
        let january = SavingsService::add(&mut book, draft(1, dec!(1000), true)).unwrap();
        let february = SavingsService::add(&mut book, draft(2, dec!(600), true)).unwrap();
        SavingsService::add(&mut book, draft(3, dec!(5000), false)).unwrap();
        (book, january, february)
    }

    #[test]
    fn borrowing_is_capped_at_half_of_paid_savings() {
        let (mut book, january, february) = seeded();
        assert_eq!(SavingsService::totals(&book, 2024).max_borrowable(), dec!(800));

        let left = SavingsService::borrow(&mut book, january, dec!(500)).unwrap();
        assert_eq!(left, dec!(300));

        let err = SavingsService::borrow(&mut book, february, dec!(300.01)).unwrap_err();
        assert!(matches!(err, ServiceError::Invalid(ref m) if m.contains("only 300")));
        assert_eq!(book.saving(february).unwrap().borrowed, dec!(0));

        assert_eq!(SavingsService::borrow(&mut book, february, dec!(300)).unwrap(), dec!(0));
        assert!(SavingsService::borrow(&mut book, january, dec!(0.01)).is_err());
        assert_eq!(SavingsService::totals(&book, 2024).borrowed, dec!(800));
    }

    #[test]
    fn cap_ignores_other_years_and_removed_entries() {
        let (mut book, january, _) = seeded();
        SavingsService::add(
            &mut book,
            SavingDraft {
                year: 2023,
                month: 12,
                amount: dec!(10000),
                paid: true,
            },
        )
        .unwrap();
        let march_paid = SavingsService::add(&mut book, draft(3, dec!(400), true)).unwrap();
        SavingsService::retire(&mut book, march_paid).unwrap();

        assert!(SavingsService::borrow(&mut book, january, dec!(801)).is_err());
        assert!(SavingsService::borrow(&mut book, march_paid, dec!(1)).is_err());
    }

    #[test]
    fn repayment_must_be_positive_and_within_the_balance() {
        let (mut book, january, february) = seeded();
        SavingsService::borrow(&mut book, january, dec!(400)).unwrap();

        assert!(SavingsService::repay(&mut book, january, dec!(0)).is_err());
        assert!(SavingsService::repay(&mut book, january, dec!(-10)).is_err());
        let err = SavingsService::repay(&mut book, january, dec!(400.50)).unwrap_err();
        assert!(matches!(err, ServiceError::Invalid(ref m) if m.contains("exceeds")));
        assert!(SavingsService::repay(&mut book, february, dec!(1)).is_err());

        assert_eq!(SavingsService::repay(&mut book, january, dec!(150)).unwrap(), dec!(250));
        assert_eq!(SavingsService::repay(&mut book, january, dec!(250)).unwrap(), dec!(0));
        let totals = SavingsService::totals(&book, 2024);
        assert_eq!(totals.outstanding(), dec!(0));
        assert_eq!(totals.repaid, dec!(400));
    }

    #[test]
    fn totals_split_paid_and_pending() {
        let (book, _, _) = seeded();
        let totals = SavingsService::totals(&book, 2024);
        assert_eq!(totals.saved, dec!(1600));
        assert_eq!(totals.pending, dec!(5000));
        assert_eq!(totals.goal_progress(dec!(100000)), dec!(1.6));
        assert_eq!(totals.goal_progress(dec!(0)), dec!(0));
    }

    #[test]
    fn update_validates_and_protects_the_loan_fields() {
        let (mut book, january, _) = seeded();
        assert!(SavingsService::update(&mut book, january, |s| s.month = 13).is_err());
        assert!(SavingsService::update(&mut book, january, |s| s.borrowed = dec!(5)).is_err());

        SavingsService::update(&mut book, january, |s| {
            s.amount = dec!(1200);
            s.paid = false;
        })
        .unwrap();
        let saving = book.saving(january).unwrap();
        assert_eq!(saving.amount, dec!(1200));
        assert!(!saving.paid);
        assert_eq!(SavingsService::list(&book, 2024).len(), 3);
    }

    #[test]
    fn add_rejects_bad_month_and_amount() {
        let mut book = FinanceBook::new("Savings");
        assert!(SavingsService::add(&mut book, draft(0, dec!(10), true)).is_err());
        assert!(SavingsService::add(&mut book, draft(5, dec!(0), true)).is_err());
        assert!(book.savings.is_empty());
    }
}
