//! Expense categories: unique names among active entries, soft removal.

use tracing::info;
use uuid::Uuid;

use super::{resolve_prefix, ServiceError, ServiceResult};
use crate::domain::{Category, FinanceBook};

pub struct CategoryService;

impl CategoryService {
    pub fn add(book: &mut FinanceBook, name: &str) -> ServiceResult<Uuid> {
        let name = Self::validate_name(book, None, name)?;
        let category = Category::new(name);
        let id = category.id;
        info!(category = %id, name = %category.name, "category added");
        book.categories.push(category);
        book.touch();
        Ok(id)
    }

    pub fn rename(book: &mut FinanceBook, id: Uuid, name: &str) -> ServiceResult<()> {
        let name = Self::validate_name(book, Some(id), name)?;
        let category = book
            .category_mut(id)
            .filter(|category| category.is_active())
            .ok_or_else(|| ServiceError::NotFound(format!("category {id}")))?;
        category.name = name;
        book.touch();
        Ok(())
    }

    /// Hides the category from listings. Expenses keep their reference so
    /// history still groups correctly. Returns `false` if already retired.
    pub fn retire(book: &mut FinanceBook, id: Uuid) -> ServiceResult<bool> {
        let category = book
            .category_mut(id)
            .ok_or_else(|| ServiceError::NotFound(format!("category {id}")))?;
        if !category.is_active() {
            return Ok(false);
        }
        category.retire();
        info!(category = %id, "category retired");
        book.touch();
        Ok(true)
    }

    pub fn list(book: &FinanceBook) -> Vec<&Category> {
        book.active_categories().collect()
    }

    /// Finds an active category by exact name (case-insensitive) or by id prefix.
    pub fn resolve(book: &FinanceBook, needle: &str) -> ServiceResult<Uuid> {
        let wanted = needle.trim();
        if let Some(category) = book
            .active_categories()
            .find(|category| category.name.eq_ignore_ascii_case(wanted))
        {
            return Ok(category.id);
        }
        resolve_prefix(book.active_categories(), wanted, "category")
    }

    fn validate_name(book: &FinanceBook, exclude: Option<Uuid>, candidate: &str) -> ServiceResult<String> {
        let name = candidate.trim();
        if name.is_empty() {
            return Err(ServiceError::Invalid("category name must not be empty".into()));
        }
        let duplicate = book
            .active_categories()
            .any(|category| category.name.eq_ignore_ascii_case(name) && exclude != Some(category.id));
        if duplicate {
            return Err(ServiceError::Invalid(format!(
                "category `{name}` already exists"
            )));
        }
        Ok(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_rejects_blank_and_duplicate_names() {
        let mut book = FinanceBook::new("Categories");
        CategoryService::add(&mut book, "Groceries").unwrap();

        let err = CategoryService::add(&mut book, " groceries ").expect_err("duplicate fails");
        assert!(
            matches!(err, ServiceError::Invalid(ref message) if message.contains("already exists")),
            "unexpected error: {err:?}"
        );
        assert!(CategoryService::add(&mut book, "  ").is_err());
    }

    #[test]
    fn retired_names_can_be_reused_and_are_hidden() {
        let mut book = FinanceBook::new("Categories");
        let old = CategoryService::add(&mut book, "Travel").unwrap();
        assert!(CategoryService::retire(&mut book, old).unwrap());
        assert!(!CategoryService::retire(&mut book, old).unwrap());

        let new = CategoryService::add(&mut book, "Travel").unwrap();
        let listed: Vec<_> = CategoryService::list(&book).iter().map(|c| c.id).collect();
        assert_eq!(listed, vec![new]);
        assert_eq!(CategoryService::resolve(&book, "travel").unwrap(), new);
    }

    #[test]
    fn rename_checks_other_names_only() {
        let mut book = FinanceBook::new("Categories");
        let food = CategoryService::add(&mut book, "Food").unwrap();
        CategoryService::add(&mut book, "Fuel").unwrap();

        CategoryService::rename(&mut book, food, "FOOD").unwrap();
        assert_eq!(book.category(food).unwrap().name, "FOOD");
        assert!(CategoryService::rename(&mut book, food, "fuel").is_err());
    }
}
