mod common;

use std::fs;

use common::{expense, income, open_json_store, temp_home};
use finance_tracker::{
    config::ConfigManager,
    core::services::{
        CategoryService, ItemDraft, ItemService, ResolutionService, SavingDraft, SavingsService,
    },
    domain::{FinanceBook, ItemKind, CURRENT_SCHEMA_VERSION},
    errors::StoreError,
    schedule::ScheduleSynchronizer,
    storage::{
        json_backend::{load_book_from_path, save_book_to_path},
        BookAccess, JsonStore,
    },
    utils::paths::PathResolver,
};
use rust_decimal_macros::dec;

#[test]
fn opening_a_missing_book_creates_it() {
    let (home, store) = open_json_store("Household Budget");
    let expected = PathResolver::book_file_in(&home, "Household Budget");
    assert_eq!(store.path(), expected.as_path());
    assert!(expected.ends_with("books/household-budget.json"));
    assert!(expected.exists());
}

#[test]
fn writes_survive_reopening() {
    let (home, store) = open_json_store("main");
    let (id, housing) = store
        .write(|book| {
            let housing = CategoryService::add(book, "Housing")?;
            let id = ItemService::add(
                book,
                ItemDraft {
                    kind: ItemKind::Expense,
                    name: "Rent".into(),
                    amount: dec!(1250.75),
                    start_date: "2024-01-01".into(),
                    end_date: Some("2024-12-31".into()),
                    rule_code: 1,
                    description: Some("landlord".into()),
                    category_id: Some(housing),
                    person: Some("Sam".into()),
                },
            )?;
            Ok::<_, finance_tracker::core::services::ServiceError>((id, housing))
        })
        .unwrap()
        .unwrap();
    drop(store);

    let reopened = JsonStore::open(Some(home), "main").unwrap();
    let book = reopened.snapshot().unwrap();
    let item = book.item(id).unwrap();
    assert_eq!(item.amount, dec!(1250.75));
    assert_eq!(item.end_date.as_deref(), Some("2024-12-31"));
    assert_eq!(item.description.as_deref(), Some("landlord"));
    assert_eq!(item.category_id, Some(housing));
    assert_eq!(item.person.as_deref(), Some("Sam"));
    assert_eq!(book.category(housing).unwrap().name, "Housing");
}

#[test]
fn savings_and_resolutions_survive_reopening() {
    let (home, store) = open_json_store("main");
    let saving = store
        .write(|book| {
            let id = SavingsService::add(
                book,
                SavingDraft {
                    year: 2024,
                    month: 4,
                    amount: dec!(800),
                    paid: true,
                },
            )
            .unwrap();
            SavingsService::borrow(book, id, dec!(300)).unwrap();
            SavingsService::repay(book, id, dec!(120)).unwrap();
            ResolutionService::add(book, 2024, "Emergency fund", Some("Sam")).unwrap();
            id
        })
        .unwrap();
    drop(store);

    let reopened = JsonStore::open(Some(home), "main").unwrap();
    let book = reopened.snapshot().unwrap();
    assert_eq!(book.saving(saving).unwrap().outstanding(), dec!(180));
    assert_eq!(SavingsService::totals(&book, 2024).available_to_borrow(), dec!(100));
    assert_eq!(ResolutionService::progress(&book, 2024), (0, 1));
}

#[test]
fn generated_occurrences_are_persisted() {
    let (home, store) = open_json_store("main");
    store
        .write(|book| {
            book.add_item(income("Salary", dec!(3000), "2024-01-15", 2));
            book.add_item(expense("Streaming", dec!(12.99), "2024-05-05", 4));
        })
        .unwrap();

    let report = ScheduleSynchronizer::new(&store).generate_year(2024);
    assert_eq!(report.rows_inserted(), 25);
    drop(store);

    let reopened = JsonStore::open(Some(home), "main").unwrap();
    let count = reopened.read(|book| book.occurrences.len()).unwrap();
    assert_eq!(count, 25);
}

#[test]
fn newer_schema_versions_are_rejected() {
    let home = temp_home();
    let path = home.join("future.json");
    let mut book = FinanceBook::new("future");
    book.schema_version = CURRENT_SCHEMA_VERSION + 1;
    save_book_to_path(&book, &path).unwrap();

    match load_book_from_path(&path) {
        Err(StoreError::UnsupportedSchema(version)) => {
            assert_eq!(version, CURRENT_SCHEMA_VERSION + 1)
        }
        other => panic!("expected schema rejection, got {other:?}"),
    }
}

#[test]
fn books_without_schema_version_load_as_current() {
    let home = temp_home();
    let path = home.join("legacy.json");
    let book = FinanceBook::new("legacy");
    let mut json = serde_json::to_value(&book).unwrap();
    json.as_object_mut().unwrap().remove("schema_version");
    fs::write(&path, serde_json::to_string(&json).unwrap()).unwrap();

    let loaded = load_book_from_path(&path).unwrap();
    assert_eq!(loaded.schema_version, CURRENT_SCHEMA_VERSION);
    assert_eq!(loaded.name, "legacy");
}

#[test]
fn corrupt_book_files_report_serialization_errors() {
    let home = temp_home();
    let path = home.join("broken.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(load_book_from_path(&path), Err(StoreError::Serde(_))));
}

#[test]
fn config_round_trips_through_disk() {
    let home = temp_home();
    let manager = ConfigManager::with_base_dir(home.clone()).unwrap();
    let mut config = manager.load().unwrap();
    config.set("currency", "eur").unwrap();
    config.set("active_book", "travel").unwrap();
    manager.save(&config).unwrap();

    let reloaded = ConfigManager::with_base_dir(home).unwrap().load().unwrap();
    assert_eq!(reloaded.currency, "EUR");
    assert_eq!(reloaded.active_book, "travel");
}
