use tracing::info;
use uuid::Uuid;

use super::{resolve_prefix, ServiceError, ServiceResult};
use crate::domain::{FinanceBook, Resolution};

/// Resolutions of one owner (or the shared ones when `person` is `None`).
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionGroup<'a> {
    pub person: Option<String>,
    pub resolutions: Vec<&'a Resolution>,
}

pub struct ResolutionService;

impl ResolutionService {
    pub fn add(
        book: &mut FinanceBook,
        year: i32,
        title: &str,
        person: Option<&str>,
    ) -> ServiceResult<Uuid> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ServiceError::Invalid("resolution title must not be empty".into()));
        }
        if !(1..=9999).contains(&year) {
            return Err(ServiceError::Invalid(format!("invalid year {year}")));
        }
        let person = person
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let resolution = Resolution::new(year, title, person);
        let id = resolution.id;
        info!(resolution = %id, year, "resolution added");
        book.resolutions.push(resolution);
        book.touch();
        Ok(id)
    }

    /// Flips the completed flag and returns the new value.
    pub fn toggle(book: &mut FinanceBook, id: Uuid) -> ServiceResult<bool> {
        let resolution = book
            .resolution_mut(id)
            .ok_or_else(|| ServiceError::NotFound(format!("resolution {id}")))?;
        resolution.completed = !resolution.completed;
        let completed = resolution.completed;
        book.touch();
        Ok(completed)
    }

    pub fn remove(book: &mut FinanceBook, id: Uuid) -> ServiceResult<Resolution> {
        let index = book
            .resolutions
            .iter()
            .position(|resolution| resolution.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("resolution {id}")))?;
        let removed = book.resolutions.remove(index);
        info!(resolution = %id, "resolution removed");
        book.touch();
        Ok(removed)
    }

    pub fn list(book: &FinanceBook, year: i32) -> Vec<&Resolution> {
        book.resolutions
            .iter()
            .filter(|resolution| resolution.year == year)
            .collect()
    }

    /// Shared resolutions first, then one group per person in name order.
    pub fn grouped(book: &FinanceBook, year: i32) -> Vec<ResolutionGroup<'_>> {
        let resolutions = Self::list(book, year);
        let mut people: Vec<&str> = resolutions
            .iter()
            .filter_map(|resolution| resolution.person.as_deref())
            .collect();
        people.sort_by_key(|name| name.to_lowercase());
        people.dedup_by(|a, b| a.eq_ignore_ascii_case(*b));

        let owners = std::iter::once(None).chain(people.into_iter().map(Some));
        owners
            .map(|owner| ResolutionGroup {
                person: owner.map(str::to_string),
                resolutions: resolutions
                    .iter()
                    .copied()
                    .filter(|resolution| resolution.belongs_to(owner))
                    .collect(),
            })
            .filter(|group| !group.resolutions.is_empty())
            .collect()
    }

    /// `(completed, total)` for the year.
    pub fn progress(book: &FinanceBook, year: i32) -> (usize, usize) {
        let resolutions = Self::list(book, year);
        let completed = resolutions.iter().filter(|r| r.completed).count();
        (completed, resolutions.len())
    }

    pub fn resolve(book: &FinanceBook, prefix: &str) -> ServiceResult<Uuid> {
        resolve_prefix(book.resolutions.iter(), prefix, "resolution")
    }
}
