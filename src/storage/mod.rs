//! Persistence seam used by the schedule synchronizer and the services.

pub mod json_backend;
pub mod memory;

#[cfg(test)]
use mockall::automock;
use uuid::Uuid;

use crate::{
    domain::{DateWindow, FinanceBook, ItemKind, NewOccurrence, RecurringItem},
    errors::StoreError,
};

pub use json_backend::JsonStore;
pub use memory::MemoryStore;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Operations the schedule synchronizer needs from a backend.
#[cfg_attr(test, automock)]
pub trait ScheduleStore: Send + Sync {
    /// Items of `kind` passing [`crate::domain::RecordStatus::is_visible`].
    fn active_items(&self, kind: ItemKind) -> Result<Vec<RecurringItem>>;

    /// Removes unconfirmed occurrences of `parent_id` inside `window`, returning how many.
    fn delete_unconfirmed(&self, parent_id: Uuid, window: DateWindow) -> Result<usize>;

    /// Inserts rows, silently skipping any `(parent_id, date)` already present.
    fn insert_ignoring_duplicates(&self, rows: Vec<NewOccurrence>) -> Result<usize>;
}

/// Scoped read and write access to a whole book.
pub trait BookAccess {
    fn read<R>(&self, f: impl FnOnce(&FinanceBook) -> R) -> Result<R>;
    fn write<R>(&self, f: impl FnOnce(&mut FinanceBook) -> R) -> Result<R>;
}
