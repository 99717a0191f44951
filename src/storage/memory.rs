use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use super::{BookAccess, Result, ScheduleStore};
use crate::{
    domain::{DateWindow, FinanceBook, ItemKind, NewOccurrence, RecurringItem},
    errors::StoreError,
};

/// Volatile store keeping a single book behind a mutex.
#[derive(Debug)]
pub struct MemoryStore {
    book: Mutex<FinanceBook>,
}

impl MemoryStore {
    pub fn new(book: FinanceBook) -> Self {
        Self {
            book: Mutex::new(book),
        }
    }

    pub fn empty(name: &str) -> Self {
        Self::new(FinanceBook::new(name))
    }

    fn lock(&self) -> Result<MutexGuard<'_, FinanceBook>> {
        self.book
            .lock()
            .map_err(|_| StoreError::Unavailable("book lock poisoned".into()))
    }

    pub fn snapshot(&self) -> Result<FinanceBook> {
        Ok(self.lock()?.clone())
    }

    /// Applies `f` to a copy of the book and swaps it in only when `commit` succeeds.
    pub(crate) fn transact<R>(
        &self,
        f: impl FnOnce(&mut FinanceBook) -> R,
        commit: impl FnOnce(&FinanceBook, &R) -> Result<()>,
    ) -> Result<R> {
        let mut guard = self.lock()?;
        let mut draft = guard.clone();
        let result = f(&mut draft);
        commit(&draft, &result)?;
        *guard = draft;
        Ok(result)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::empty("default")
    }
}

impl BookAccess for MemoryStore {
    fn read<R>(&self, f: impl FnOnce(&FinanceBook) -> R) -> Result<R> {
        let guard = self.lock()?;
        Ok(f(&guard))
    }

    fn write<R>(&self, f: impl FnOnce(&mut FinanceBook) -> R) -> Result<R> {
        let mut guard = self.lock()?;
        Ok(f(&mut guard))
    }
}

impl ScheduleStore for MemoryStore {
    fn active_items(&self, kind: ItemKind) -> Result<Vec<RecurringItem>> {
        self.read(|book| book.active_items(kind).cloned().collect())
    }

    fn delete_unconfirmed(&self, parent_id: Uuid, window: DateWindow) -> Result<usize> {
        self.write(|book| book.delete_unconfirmed(parent_id, window))
    }

    fn insert_ignoring_duplicates(&self, rows: Vec<NewOccurrence>) -> Result<usize> {
        self.write(|book| book.insert_ignoring_duplicates(rows))
    }
}
