//! Validated operations over a [`crate::domain::FinanceBook`].

pub mod category_service;
pub mod item_service;
pub mod occurrence_service;
pub mod resolution_service;
pub mod savings_service;
pub mod summary_service;

pub use category_service::CategoryService;
pub use item_service::{ItemDraft, ItemService};
pub use occurrence_service::{OccurrenceService, OccurrenceView};
pub use resolution_service::{ResolutionGroup, ResolutionService};
pub use savings_service::{SavingDraft, SavingsService, SavingsTotals};
pub use summary_service::{PeriodSummary, SummaryService};

use uuid::Uuid;

use crate::domain::Identifiable;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("`{0}` matches more than one record")]
    Ambiguous(String),
    #[error("{0}")]
    Invalid(String),
}

/// Finds the single record whose id starts with `prefix` (case-insensitive).
pub(crate) fn resolve_prefix<'a, T, I>(records: I, prefix: &str, what: &str) -> ServiceResult<Uuid>
where
    T: Identifiable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let needle = prefix.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return Err(ServiceError::Invalid(format!("{what} id is required")));
    }
    let mut matches = records
        .into_iter()
        .map(|record| record.id())
        .filter(|id| id.to_string().starts_with(&needle));
    match (matches.next(), matches.next()) {
        (Some(id), None) => Ok(id),
        (Some(_), Some(_)) => Err(ServiceError::Ambiguous(prefix.to_string())),
        (None, _) => Err(ServiceError::NotFound(format!("{what} `{prefix}`"))),
    }
}
