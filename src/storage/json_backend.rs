use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};
use uuid::Uuid;

use super::{BookAccess, MemoryStore, Result, ScheduleStore};
use crate::{
    domain::{
        DateWindow, FinanceBook, ItemKind, NewOccurrence, RecurringItem, CURRENT_SCHEMA_VERSION,
    },
    errors::StoreError,
    utils::{ensure_dir, paths::PathResolver, write_atomic},
};

/// File-backed store: the book lives in memory and is rewritten after each change.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonStore {
    /// Opens `<root>/books/<name>.json`, creating an empty book when absent.
    pub fn open(root: Option<PathBuf>, name: &str) -> Result<Self> {
        let base = PathResolver::resolve_base(root);
        ensure_dir(&PathResolver::books_dir_in(&base))?;
        Self::open_path(PathResolver::book_file_in(&base, name), name)
    }

    /// Opens the book stored at `path`, creating an empty one named `name` when absent.
    pub fn open_path(path: PathBuf, name: &str) -> Result<Self> {
        let book = if path.exists() {
            let book = load_book_from_path(&path)?;
            debug!(path = %path.display(), items = book.items.len(), "loaded book");
            book
        } else {
            info!(path = %path.display(), "creating new book");
            let book = FinanceBook::new(name);
            save_book_to_path(&book, &path)?;
            book
        };
        Ok(Self {
            path,
            inner: MemoryStore::new(book),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> Result<FinanceBook> {
        self.inner.snapshot()
    }

    /// Runs `f` on a draft and keeps the change only once the draft is on disk.
    fn commit_if<R>(
        &self,
        f: impl FnOnce(&mut FinanceBook) -> R,
        changed: impl FnOnce(&R) -> bool,
    ) -> Result<R> {
        self.inner.transact(f, |draft, result| {
            if changed(result) {
                save_book_to_path(draft, &self.path)?;
            }
            Ok(())
        })
    }
}

impl BookAccess for JsonStore {
    fn read<R>(&self, f: impl FnOnce(&FinanceBook) -> R) -> Result<R> {
        self.inner.read(f)
    }

    fn write<R>(&self, f: impl FnOnce(&mut FinanceBook) -> R) -> Result<R> {
        self.commit_if(f, |_| true)
    }
}

impl ScheduleStore for JsonStore {
    fn active_items(&self, kind: ItemKind) -> Result<Vec<RecurringItem>> {
        self.inner.active_items(kind)
    }

    fn delete_unconfirmed(&self, parent_id: Uuid, window: DateWindow) -> Result<usize> {
        self.commit_if(
            |book| book.delete_unconfirmed(parent_id, window),
            |removed| *removed > 0,
        )
    }

    fn insert_ignoring_duplicates(&self, rows: Vec<NewOccurrence>) -> Result<usize> {
        self.commit_if(
            |book| book.insert_ignoring_duplicates(rows),
            |inserted| *inserted > 0,
        )
    }
}

/// Writes the book to `path` atomically as pretty JSON.
pub fn save_book_to_path(book: &FinanceBook, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(book)?;
    write_atomic(path, &json)
}

/// Reads a book from `path`, rejecting schema versions newer than this build.
pub fn load_book_from_path(path: &Path) -> Result<FinanceBook> {
    let data = fs::read_to_string(path)?;
    let book: FinanceBook = serde_json::from_str(&data)?;
    if book.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchema(book.schema_version));
    }
    Ok(book)
}
