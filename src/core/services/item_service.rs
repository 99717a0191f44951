use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use super::{resolve_prefix, ServiceError, ServiceResult};
use crate::domain::{
    dates::parse_iso_date, FinanceBook, ItemKind, RecurrenceRule, RecurringItem,
};

/// User-supplied fields for a new recurring item.
#[derive(Debug, Clone)]
pub struct ItemDraft {
    pub kind: ItemKind,
    pub name: String,
    pub amount: Decimal,
    pub start_date: String,
    pub end_date: Option<String>,
    pub rule_code: u8,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub person: Option<String>,
}

impl ItemDraft {
    fn into_item(self) -> RecurringItem {
        let mut item = RecurringItem::new(
            self.kind,
            self.name.trim(),
            self.amount,
            self.start_date.trim(),
            self.rule_code,
        );
        item.end_date = self
            .end_date
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty());
        item.description = self.description;
        item.category_id = self.category_id;
        item.person = self.person;
        item
    }
}

/// Create, edit, retire, and list recurring incomes and expenses.
pub struct ItemService;

impl ItemService {
    pub fn add(book: &mut FinanceBook, draft: ItemDraft) -> ServiceResult<Uuid> {
        let item = draft.into_item();
        Self::validate(book, &item)?;
        info!(item = %item.id, kind = %item.kind, name = %item.name, "recurring item added");
        Ok(book.add_item(item))
    }

    /// Applies `mutator` to the item, rejecting the change if the result is invalid.
    pub fn update<F>(book: &mut FinanceBook, id: Uuid, mutator: F) -> ServiceResult<()>
    where
        F: FnOnce(&mut RecurringItem),
    {
        let current = book
            .item(id)
            .ok_or_else(|| ServiceError::NotFound(format!("item {id}")))?;
        let mut candidate = current.clone();
        mutator(&mut candidate);
        if candidate.id != id || candidate.kind != current.kind {
            return Err(ServiceError::Invalid(
                "item id and kind cannot change".into(),
            ));
        }
        Self::validate(book, &candidate)?;
        if let Some(item) = book.item_mut(id) {
            *item = candidate;
        }
        book.touch();
        Ok(())
    }

    /// Soft-deletes the item. Returns `false` if it was already retired.
    pub fn retire(book: &mut FinanceBook, id: Uuid) -> ServiceResult<bool> {
        let item = book
            .item_mut(id)
            .ok_or_else(|| ServiceError::NotFound(format!("item {id}")))?;
        if !item.is_active() {
            return Ok(false);
        }
        item.retire();
        info!(item = %id, "recurring item retired");
        book.touch();
        Ok(true)
    }

    pub fn list(book: &FinanceBook, kind: ItemKind) -> Vec<&RecurringItem> {
        book.active_items(kind).collect()
    }

    /// Resolves an id prefix among the active items of `kind`.
    pub fn resolve(book: &FinanceBook, kind: ItemKind, prefix: &str) -> ServiceResult<Uuid> {
        resolve_prefix(book.active_items(kind), prefix, &kind.to_string())
    }

    fn validate(book: &FinanceBook, item: &RecurringItem) -> ServiceResult<()> {
        if item.name.trim().is_empty() {
            return Err(ServiceError::Invalid("name must not be empty".into()));
        }
        if item.amount.is_sign_negative() {
            return Err(ServiceError::Invalid("amount must not be negative".into()));
        }
        if RecurrenceRule::from_code(item.kind, item.rule_code).is_none() {
            let valid: Vec<String> = RecurrenceRule::choices(item.kind)
                .into_iter()
                .map(|(code, rule)| format!("{code}={rule}"))
                .collect();
            return Err(ServiceError::Invalid(format!(
                "unknown {} rule code {} (expected one of {})",
                item.kind,
                item.rule_code,
                valid.join(", ")
            )));
        }
        let start = parse_iso_date(&item.start_date).ok_or_else(|| {
            ServiceError::Invalid(format!("invalid start date `{}`", item.start_date))
        })?;
        if let Some(raw_end) = item.end_date.as_deref() {
            let end = parse_iso_date(raw_end)
                .ok_or_else(|| ServiceError::Invalid(format!("invalid end date `{raw_end}`")))?;
            if end < start {
                return Err(ServiceError::Invalid(
                    "end date must not precede start date".into(),
                ));
            }
        }
        if let Some(category_id) = item.category_id {
            if item.kind != ItemKind::Expense {
                return Err(ServiceError::Invalid(
                    "only expenses can have a category".into(),
                ));
            }
            if !book.category(category_id).is_some_and(|category| category.is_active()) {
                return Err(ServiceError::Invalid(format!(
                    "category {category_id} does not exist or was retired"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use rust_decimal_macros::dec;

    fn draft(kind: ItemKind, code: u8) -> ItemDraft {
        ItemDraft {
            kind,
            name: "Salary".into(),
            amount: dec!(2500),
            start_date: "2024-01-15".into(),
            end_date: None,
            rule_code: code,
            description: None,
            category_id: None,
            person: None,
        }
    }

    #[test]
    fn add_rejects_code_unknown_to_kind() {
        let mut book = FinanceBook::new("Items");
        let err = ItemService::add(&mut book, draft(ItemKind::Income, 5))
            .expect_err("bi-weekly is expense only");
        assert!(matches!(err, ServiceError::Invalid(ref m) if m.contains("rule code 5")));
        assert!(ItemService::add(&mut book, draft(ItemKind::Expense, 5)).is_ok());
    }

    #[test]
    fn add_rejects_end_before_start_and_blank_end_means_none() {
        let mut book = FinanceBook::new("Items");
        let mut bad = draft(ItemKind::Income, 1);
        bad.end_date = Some("2023-12-31".into());
        assert!(ItemService::add(&mut book, bad).is_err());

        let mut blank = draft(ItemKind::Income, 1);
        blank.end_date = Some("   ".into());
        let id = ItemService::add(&mut book, blank).unwrap();
        assert_eq!(book.item(id).unwrap().end_date, None);
    }

    #[test]
    fn update_keeps_previous_values_on_invalid_change() {
        let mut book = FinanceBook::new("Items");
        let id = ItemService::add(&mut book, draft(ItemKind::Expense, 1)).unwrap();
        let err = ItemService::update(&mut book, id, |item| item.amount = dec!(-1));
        assert!(err.is_err());
        assert_eq!(book.item(id).unwrap().amount, dec!(2500));

        ItemService::update(&mut book, id, |item| item.amount = dec!(2600)).unwrap();
        assert_eq!(book.item(id).unwrap().amount, dec!(2600));
    }

    #[test]
    fn categories_apply_to_active_expense_categories_only() {
        let mut book = FinanceBook::new("Items");
        let mut utilities = Category::new("Utilities");
        let utilities_id = utilities.id;
        book.categories.push(utilities.clone());
        utilities.retire();
        utilities.id = Uuid::new_v4();
        let retired_id = utilities.id;
        book.categories.push(utilities);

        let mut salary = draft(ItemKind::Income, 1);
        salary.category_id = Some(utilities_id);
        assert!(ItemService::add(&mut book, salary).is_err());

        let mut power = draft(ItemKind::Expense, 1);
        power.category_id = Some(retired_id);
        assert!(ItemService::add(&mut book, power.clone()).is_err());

        power.category_id = Some(utilities_id);
        let id = ItemService::add(&mut book, power).unwrap();
        assert_eq!(book.item(id).unwrap().category_id, Some(utilities_id));

        let err = ItemService::update(&mut book, id, |item| item.category_id = Some(Uuid::new_v4()));
        assert!(err.is_err());
        assert_eq!(book.item(id).unwrap().category_id, Some(utilities_id));
    }

    #[test]
    fn retire_hides_item_and_is_idempotent() {
        let mut book = FinanceBook::new("Items");
        let id = ItemService::add(&mut book, draft(ItemKind::Income, 1)).unwrap();
        assert!(ItemService::retire(&mut book, id).unwrap());
        assert!(!ItemService::retire(&mut book, id).unwrap());
        assert!(ItemService::list(&book, ItemKind::Income).is_empty());
        assert!(book.item(id).is_some());
    }

    #[test]
    fn resolve_by_prefix() {
        let mut book = FinanceBook::new("Items");
        let id = ItemService::add(&mut book, draft(ItemKind::Income, 1)).unwrap();
        let prefix = &id.to_string()[..8];
        assert_eq!(ItemService::resolve(&book, ItemKind::Income, prefix).unwrap(), id);
        assert!(matches!(
            ItemService::resolve(&book, ItemKind::Expense, prefix),
            Err(ServiceError::NotFound(_))
        ));
    }
}
