use rust_decimal::Decimal;

use crate::domain::{DateWindow, FinanceBook, ItemKind};

/// Confirmed and still-expected totals over a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodSummary {
    pub window: DateWindow,
    pub received_income: Decimal,
    pub paid_expense: Decimal,
    pub expected_income: Decimal,
    pub expected_expense: Decimal,
}

impl PeriodSummary {
    /// Received income minus paid expenses.
    pub fn net(&self) -> Decimal {
        self.received_income - self.paid_expense
    }

    /// Net once every expected occurrence is settled.
    pub fn projected_net(&self) -> Decimal {
        self.net() + self.expected_income - self.expected_expense
    }
}

pub struct SummaryService;

impl SummaryService {
    pub fn summarize(book: &FinanceBook, window: DateWindow) -> PeriodSummary {
        let mut summary = PeriodSummary {
            window,
            received_income: Decimal::ZERO,
            paid_expense: Decimal::ZERO,
            expected_income: Decimal::ZERO,
            expected_expense: Decimal::ZERO,
        };
        for occ in book.occurrences_in(window, None) {
            let bucket = match (occ.kind, occ.is_confirmed()) {
                (ItemKind::Income, true) => &mut summary.received_income,
                (ItemKind::Income, false) => &mut summary.expected_income,
                (ItemKind::Expense, true) => &mut summary.paid_expense,
                (ItemKind::Expense, false) => &mut summary.expected_expense,
            };
            *bucket += occ.amount;
        }
        summary
    }
}
