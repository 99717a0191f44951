use tracing::warn;

use crate::{
    cli::{
        context::{CommandError, CommandResult, ShellContext},
        output,
        registry::CommandEntry,
    },
    core::services::{OccurrenceService, OccurrenceView, SummaryService},
    domain::dates::format_iso_date,
    schedule::{ScheduleSynchronizer, YearReport},
};

use super::{parse_amount, parse_kind, parse_month, parse_year, short_id, window_for};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "generate",
            "Regenerate unconfirmed occurrences for one or more years",
            "generate <year> [year ...]",
            cmd_generate,
        ),
        CommandEntry::new(
            "schedule",
            "List occurrences for a year or month",
            "schedule <year> [month] [income|expense]",
            cmd_schedule,
        ),
        CommandEntry::new(
            "confirm",
            "Mark an occurrence as received or paid",
            "confirm <occurrence-id>",
            cmd_confirm,
        ),
        CommandEntry::new(
            "amend",
            "Change the amount of a single occurrence",
            "amend <occurrence-id> <amount>",
            cmd_amend,
        ),
        CommandEntry::new(
            "summary",
            "Totals for a year or month",
            "summary <year> [month]",
            cmd_summary,
        ),
    ]
}

fn cmd_generate(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: generate <year> [year ...]".into(),
        ));
    }
    let years = args
        .iter()
        .map(|raw| parse_year(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let reports = ScheduleSynchronizer::new(&context.store).generate_years(&years);
    for report in &reports {
        print_year_report(report);
    }
    Ok(())
}

fn print_year_report(report: &YearReport) {
    output::success(format!(
        "Schedule for {} generated: {} new occurrence(s), {} unconfirmed replaced.",
        report.year,
        report.rows_inserted(),
        report.rows_deleted()
    ));
    let skipped = report.income.items_skipped + report.expense.items_skipped;
    if skipped > 0 {
        output::warning(format!(
            "{skipped} item(s) skipped because their start date could not be read."
        ));
    }
    if report.failure_count() > 0 {
        warn!(year = report.year, failures = report.failure_count(), "generation incomplete");
        output::warning(format!(
            "{} step(s) failed for {}; see the log for details.",
            report.failure_count(),
            report.year
        ));
    }
}

fn cmd_schedule(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((year, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: schedule <year> [month] [income|expense]".into(),
        ));
    };
    let year = parse_year(year)?;
    let mut month = None;
    let mut kind = None;
    for raw in rest {
        match parse_kind(raw) {
            Ok(parsed) => kind = Some(parsed),
            Err(_) => month = Some(parse_month(raw)?),
        }
    }
    let window = window_for(year, month)?;
    let views = context.with_book(|book| OccurrenceService::list(book, window, kind))?;
    if views.is_empty() {
        output::info("No occurrences in that period. Run `generate <year>` first.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = views
        .iter()
        .map(|view| occurrence_row(context, view))
        .collect();
    output::print_table(&["ID", "Date", "Kind", "Name", "Amount", "Status"], &rows);
    Ok(())
}

fn occurrence_row(context: &ShellContext, view: &OccurrenceView) -> Vec<String> {
    let status = if view.status.is_confirmed() {
        view.kind.confirmed_label()
    } else {
        "Expected"
    };
    vec![
        short_id(&view.id.to_string()),
        format_iso_date(view.date),
        view.kind.to_string(),
        view.name.clone(),
        context.format_amount(view.amount),
        status.to_string(),
    ]
}

fn cmd_confirm(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [prefix] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: confirm <occurrence-id>".into(),
        ));
    };
    let (changed, kind, date) = context.with_book_mut(|book| {
        let id = OccurrenceService::resolve(book, prefix)?;
        let changed = OccurrenceService::confirm(book, id)?;
        let (kind, date) = book
            .occurrence(id)
            .map(|occ| (occ.kind, occ.date))
            .ok_or_else(|| CommandError::InvalidArguments(format!("occurrence `{prefix}` vanished")))?;
        Ok((changed, kind, date))
    })?;
    if changed {
        output::success(format!(
            "{} {kind} on {date} marked {}.",
            short_id(prefix),
            kind.confirmed_label().to_lowercase()
        ));
    } else {
        output::info(format!("That {kind} on {date} was already confirmed."));
    }
    Ok(())
}

fn cmd_amend(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [prefix, amount] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: amend <occurrence-id> <amount>".into(),
        ));
    };
    let amount = parse_amount(amount)?;
    let (previous, confirmed, date) = context.with_book_mut(|book| {
        let id = OccurrenceService::resolve(book, prefix)?;
        let previous = OccurrenceService::set_amount(book, id, amount)?;
        let (confirmed, date) = book
            .occurrence(id)
            .map(|occ| (occ.is_confirmed(), occ.date))
            .ok_or_else(|| CommandError::InvalidArguments(format!("occurrence `{prefix}` vanished")))?;
        Ok((previous, confirmed, date))
    })?;
    output::success(format!(
        "Occurrence on {date} changed from {} to {}.",
        context.format_amount(previous),
        context.format_amount(amount)
    ));
    if !confirmed {
        output::hint("Unconfirmed amounts are reset by `generate`; confirm it to keep the change.");
    }
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (year, month) = match args {
        [year] => (parse_year(year)?, None),
        [year, month] => (parse_year(year)?, Some(parse_month(month)?)),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: summary <year> [month]".into(),
            ))
        }
    };
    let window = window_for(year, month)?;
    let summary = context.with_book(|book| SummaryService::summarize(book, window))?;
    let title = match month {
        Some(month) => format!("Summary {year}-{month:02}"),
        None => format!("Summary {year}"),
    };
    output::section(title);
    let rows = vec![
        vec!["Received income".to_string(), context.format_amount(summary.received_income)],
        vec!["Paid expenses".to_string(), context.format_amount(summary.paid_expense)],
        vec!["Expected income".to_string(), context.format_amount(summary.expected_income)],
        vec!["Expected expenses".to_string(), context.format_amount(summary.expected_expense)],
        vec!["Net".to_string(), context.format_amount(summary.net())],
        vec!["Projected net".to_string(), context.format_amount(summary.projected_net())],
    ];
    output::print_table(&["Metric", "Amount"], &rows);
    Ok(())
}
