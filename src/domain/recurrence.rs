use std::fmt;

use serde::{Deserialize, Serialize};

use super::ItemKind;

/// How often a recurring item produces occurrences.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RecurrenceRule {
    Monthly,
    SemiMonthly,
    Weekly,
    Daily,
    BiWeekly,
    OnceOnly,
}

// Stored codes differ between incomes and expenses; code 4 is Daily for one
// and OnceOnly for the other.
const INCOME_CODES: &[(u8, RecurrenceRule)] = &[
    (1, RecurrenceRule::Monthly),
    (2, RecurrenceRule::SemiMonthly),
    (3, RecurrenceRule::Weekly),
    (4, RecurrenceRule::Daily),
];

const EXPENSE_CODES: &[(u8, RecurrenceRule)] = &[
    (1, RecurrenceRule::Monthly),
    (2, RecurrenceRule::SemiMonthly),
    (3, RecurrenceRule::Weekly),
    (4, RecurrenceRule::OnceOnly),
    (5, RecurrenceRule::BiWeekly),
];

impl RecurrenceRule {
    pub const ALL: [RecurrenceRule; 6] = [
        RecurrenceRule::Monthly,
        RecurrenceRule::SemiMonthly,
        RecurrenceRule::Weekly,
        RecurrenceRule::Daily,
        RecurrenceRule::BiWeekly,
        RecurrenceRule::OnceOnly,
    ];

    fn table(kind: ItemKind) -> &'static [(u8, RecurrenceRule)] {
        match kind {
            ItemKind::Income => INCOME_CODES,
            ItemKind::Expense => EXPENSE_CODES,
        }
    }

    /// Maps a stored rule code to a rule. Unknown codes yield `None`.
    pub fn from_code(kind: ItemKind, code: u8) -> Option<Self> {
        Self::table(kind)
            .iter()
            .find(|(candidate, _)| *candidate == code)
            .map(|(_, rule)| *rule)
    }

    /// Inverse of [`RecurrenceRule::from_code`]; `None` when the kind has no such rule.
    pub fn code(self, kind: ItemKind) -> Option<u8> {
        Self::table(kind)
            .iter()
            .find(|(_, rule)| *rule == self)
            .map(|(code, _)| *code)
    }

    /// Looks a rule up by label or variant name, ignoring case and punctuation.
    pub fn from_name(raw: &str) -> Option<Self> {
        let wanted = normalize(raw);
        Self::ALL.into_iter().find(|rule| {
            normalize(rule.label()) == wanted || normalize(&format!("{rule:?}")) == wanted
        })
    }

    /// Rules selectable for a kind, in code order.
    pub fn choices(kind: ItemKind) -> Vec<(u8, RecurrenceRule)> {
        Self::table(kind).to_vec()
    }

    pub fn label(self) -> &'static str {
        match self {
            RecurrenceRule::Monthly => "Monthly",
            RecurrenceRule::SemiMonthly => "Semi-monthly",
            RecurrenceRule::Weekly => "Weekly",
            RecurrenceRule::Daily => "Daily",
            RecurrenceRule::BiWeekly => "Bi-weekly",
            RecurrenceRule::OnceOnly => "Once",
        }
    }
}

fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_four_depends_on_kind() {
        assert_eq!(
            RecurrenceRule::from_code(ItemKind::Income, 4),
            Some(RecurrenceRule::Daily)
        );
        assert_eq!(
            RecurrenceRule::from_code(ItemKind::Expense, 4),
            Some(RecurrenceRule::OnceOnly)
        );
    }

    #[test]
    fn unknown_codes_map_to_none() {
        assert_eq!(RecurrenceRule::from_code(ItemKind::Income, 5), None);
        assert_eq!(RecurrenceRule::from_code(ItemKind::Expense, 0), None);
        assert_eq!(RecurrenceRule::from_code(ItemKind::Expense, 9), None);
    }

    #[test]
    fn codes_round_trip_per_kind() {
        for kind in ItemKind::ALL {
            for (code, rule) in RecurrenceRule::choices(kind) {
                assert_eq!(rule.code(kind), Some(code));
            }
        }
        assert_eq!(RecurrenceRule::BiWeekly.code(ItemKind::Income), None);
        assert_eq!(RecurrenceRule::Daily.code(ItemKind::Expense), None);
    }

    #[test]
    fn names_match_labels_and_variants() {
        assert_eq!(
            RecurrenceRule::from_name("semi monthly"),
            Some(RecurrenceRule::SemiMonthly)
        );
        assert_eq!(
            RecurrenceRule::from_name("OnceOnly"),
            Some(RecurrenceRule::OnceOnly)
        );
        assert_eq!(RecurrenceRule::from_name("Bi-Weekly"), Some(RecurrenceRule::BiWeekly));
        assert_eq!(RecurrenceRule::from_name("yearly"), None);
    }
}
