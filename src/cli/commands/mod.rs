//! Command handlers, grouped by the records they work on.

pub mod category;
pub mod items;
pub mod resolution;
pub mod savings;
pub mod schedule;
pub mod system;

use std::str::FromStr;

use chrono::{Datelike, Local, Month};
use rust_decimal::Decimal;

use crate::{
    cli::{
        context::CommandError,
        registry::{CommandEntry, CommandRegistry},
    },
    domain::{DateWindow, ItemKind, RecurrenceRule},
};

const SHORT_ID: usize = 8;

pub(crate) fn all_entries() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(items::definitions());
    commands.extend(category::definitions());
    commands.extend(schedule::definitions());
    commands.extend(savings::definitions());
    commands.extend(resolution::definitions());
    commands.extend(system::definitions());
    commands
}

pub fn build_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    for entry in all_entries() {
        registry.register(entry);
    }
    registry.alias("quit", "exit");
    registry
}

pub(crate) fn parse_kind(raw: &str) -> Result<ItemKind, CommandError> {
    match raw.to_lowercase().as_str() {
        "income" | "incomes" => Ok(ItemKind::Income),
        "expense" | "expenses" => Ok(ItemKind::Expense),
        other => Err(CommandError::InvalidArguments(format!(
            "expected `income` or `expense`, got `{other}`"
        ))),
    }
}

pub(crate) fn parse_amount(raw: &str) -> Result<Decimal, CommandError> {
    Decimal::from_str(raw.trim())
        .map_err(|_| CommandError::InvalidArguments(format!("invalid amount `{raw}`")))
}

/// Accepts a numeric rule code or a rule name such as `monthly` or `bi-weekly`.
pub(crate) fn parse_rule(kind: ItemKind, raw: &str) -> Result<u8, CommandError> {
    if let Ok(code) = raw.trim().parse::<u8>() {
        return Ok(code);
    }
    let rule = RecurrenceRule::from_name(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "`{raw}` is not a {kind} rule; run `rules {kind}` for the list"
        ))
    })?;
    rule.code(kind).ok_or_else(|| {
        CommandError::InvalidArguments(format!("{rule} is not available for {kind} items"))
    })
}

pub(crate) fn parse_year(raw: &str) -> Result<i32, CommandError> {
    raw.parse::<i32>()
        .ok()
        .filter(|year| (1..=9999).contains(year))
        .ok_or_else(|| CommandError::InvalidArguments(format!("invalid year `{raw}`")))
}

/// The year given as the first argument, or the current one.
pub(crate) fn year_or_current(args: &[&str]) -> Result<i32, CommandError> {
    match args.first() {
        Some(raw) => parse_year(raw),
        None => Ok(Local::now().year()),
    }
}

/// Month number (`3`, `03`) or English name (`mar`, `March`).
pub(crate) fn parse_month(raw: &str) -> Result<u32, CommandError> {
    let numeric = raw.parse::<u32>().ok().filter(|month| (1..=12).contains(month));
    numeric
        .or_else(|| Month::from_str(raw).ok().map(|month| month.number_from_month()))
        .ok_or_else(|| CommandError::InvalidArguments(format!("invalid month `{raw}`")))
}

pub(crate) fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|number| Month::try_from(number).ok())
        .map(|month| month.name().to_string())
        .unwrap_or_else(|| format!("month {month}"))
}

pub(crate) fn window_for(year: i32, month: Option<u32>) -> Result<DateWindow, CommandError> {
    let window = match month {
        Some(month) => DateWindow::for_month(year, month)?,
        None => DateWindow::for_year(year)?,
    };
    Ok(window)
}

pub(crate) fn parse_flag(raw: &str, yes: &str, no: &str) -> Result<bool, CommandError> {
    let value = raw.trim().to_lowercase();
    if value == yes || matches!(value.as_str(), "yes" | "y" | "true") {
        Ok(true)
    } else if value == no || matches!(value.as_str(), "no" | "n" | "false") {
        Ok(false)
    } else {
        Err(CommandError::InvalidArguments(format!(
            "expected `{yes}` or `{no}`, got `{raw}`"
        )))
    }
}

pub(crate) fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub(crate) fn short_id(id: &str) -> String {
    id.chars().take(SHORT_ID).collect()
}
