#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use finance_tracker::{
    domain::{FinanceBook, ItemKind, RecurringItem},
    storage::{JsonStore, MemoryStore},
};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh application home directory that outlives the calling test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn open_json_store(name: &str) -> (PathBuf, JsonStore) {
    let home = temp_home();
    let store = JsonStore::open(Some(home.clone()), name).expect("open json store");
    (home, store)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn income(name: &str, amount: Decimal, start: &str, code: u8) -> RecurringItem {
    RecurringItem::new(ItemKind::Income, name, amount, start, code)
}

pub fn expense(name: &str, amount: Decimal, start: &str, code: u8) -> RecurringItem {
    RecurringItem::new(ItemKind::Expense, name, amount, start, code)
}

/// Memory store seeded with `items`.
pub fn memory_store(items: Vec<RecurringItem>) -> MemoryStore {
    let mut book = FinanceBook::new("test");
    for item in items {
        book.add_item(item);
    }
    MemoryStore::new(book)
}
