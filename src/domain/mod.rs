//! Record types shared by the schedule generator and the CRUD layer around it.
//!
//! Savings, resolutions and categories live in the same book but never feed
//! schedule generation.

pub mod book;
pub mod category;
pub mod common;
pub mod dates;
pub mod item;
pub mod occurrence;
pub mod recurrence;
pub mod resolution;
pub mod savings;

pub use book::{FinanceBook, CURRENT_SCHEMA_VERSION};
pub use category::Category;
pub use common::{DateWindow, Identifiable, ItemKind, RecordStatus};
pub use item::RecurringItem;
pub use occurrence::{NewOccurrence, Occurrence, OccurrenceStatus};
pub use recurrence::RecurrenceRule;
pub use resolution::Resolution;
pub use savings::Saving;
