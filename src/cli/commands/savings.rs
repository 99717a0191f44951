use rust_decimal::Decimal;

use crate::{
    cli::{
        context::{CommandError, CommandResult, ShellContext},
        output,
        registry::CommandEntry,
    },
    core::services::{SavingDraft, SavingsService},
    domain::Saving,
};

use super::{
    month_name, parse_amount, parse_flag, parse_month, parse_year, short_id, year_or_current,
};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "savings",
        "Track monthly savings and borrow against them",
        "savings <list|add|edit|borrow|repay|remove> ...\n  savings list [year]\n  savings add <year> <month> <amount> [paid|pending]\n  savings edit <id> <month|amount|status> <value>\n  savings borrow <id> <amount>\n  savings repay <id> <amount>\n  savings remove <id>",
        cmd_savings,
    )]
}

fn cmd_savings(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.split_first() {
        Some((&"list", rest)) => handle_list(context, rest),
        None => handle_list(context, &[]),
        Some((&"add", rest)) => handle_add(context, rest),
        Some((&"edit", rest)) => handle_edit(context, rest),
        Some((&"borrow", rest)) => handle_borrow(context, rest),
        Some((&"repay", rest)) => handle_repay(context, rest),
        Some((&"remove", rest)) => handle_remove(context, rest),
        Some((other, _)) => Err(CommandError::InvalidArguments(format!(
            "unknown savings action `{other}`"
        ))),
    }
}

fn handle_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let year = year_or_current(args)?;
    let (savings, totals) = context.with_book(|book| {
        let savings: Vec<Saving> = SavingsService::list(book, year).into_iter().cloned().collect();
        (savings, SavingsService::totals(book, year))
    })?;

    output::section(format!("Savings {year}"));
    if savings.is_empty() {
        output::info(format!("No savings recorded for {year}."));
    } else {
        let dash_if_zero = |amount: Decimal| {
            if amount.is_zero() {
                "-".to_string()
            } else {
                context.format_amount(amount)
            }
        };
        let rows: Vec<Vec<String>> = savings
            .iter()
            .map(|saving| {
                vec![
                    short_id(&saving.id.to_string()),
                    month_name(saving.month),
                    context.format_amount(saving.amount),
                    (if saving.paid { "Paid" } else { "Pending" }).to_string(),
                    dash_if_zero(saving.borrowed),
                    dash_if_zero(saving.repaid),
                    dash_if_zero(saving.outstanding()),
                ]
            })
            .collect();
        output::print_table(
            &["ID", "Month", "Amount", "Status", "Borrowed", "Paid back", "Outstanding"],
            &rows,
        );
    }

    let goal = context.config.savings_goal;
    let rows = vec![
        vec!["Total saved".to_string(), context.format_amount(totals.saved)],
        vec!["Pending".to_string(), context.format_amount(totals.pending)],
        vec!["Outstanding borrowed".to_string(), context.format_amount(totals.outstanding())],
        vec![
            "Available to borrow".to_string(),
            format!(
                "{} (max {})",
                context.format_amount(totals.available_to_borrow()),
                context.format_amount(totals.max_borrowable())
            ),
        ],
        vec![
            "Yearly goal".to_string(),
            format!("{:.1}% of {}", totals.goal_progress(goal), context.format_amount(goal)),
        ],
    ];
    output::print_table(&["Metric", "Amount"], &rows);
    Ok(())
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [year, month, amount, rest @ ..] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: savings add <year> <month> <amount> [paid|pending]".into(),
        ));
    };
    let paid = match rest {
        [] => false,
        [status] => parse_flag(status, "paid", "pending")?,
        _ => {
            return Err(CommandError::InvalidArguments(
                "too many arguments for `savings add`".into(),
            ))
        }
    };
    let draft = SavingDraft {
        year: parse_year(year)?,
        month: parse_month(month)?,
        amount: parse_amount(amount)?,
        paid,
    };
    let label = format!("{} {}", month_name(draft.month), draft.year);
    let id = context.with_book_mut(|book| Ok(SavingsService::add(book, draft)?))?;
    output::success(format!("Saving for {label} added ({}).", short_id(&id.to_string())));
    Ok(())
}

fn handle_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [prefix, field, value] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: savings edit <id> <month|amount|status> <value>".into(),
        ));
    };
    let edit: Box<dyn FnOnce(&mut Saving)> = match field.to_lowercase().as_str() {
        "month" => {
            let month = parse_month(value)?;
            Box::new(move |saving: &mut Saving| saving.month = month)
        }
        "amount" => {
            let amount = parse_amount(value)?;
            Box::new(move |saving: &mut Saving| saving.amount = amount)
        }
        "status" | "paid" => {
            let paid = parse_flag(value, "paid", "pending")?;
            Box::new(move |saving: &mut Saving| saving.paid = paid)
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown field `{other}`"
            )))
        }
    };
    context.with_book_mut(|book| {
        let id = SavingsService::resolve(book, prefix)?;
        Ok(SavingsService::update(book, id, edit)?)
    })?;
    output::success("Saving updated.");
    Ok(())
}

fn handle_borrow(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [prefix, amount] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: savings borrow <id> <amount>".into(),
        ));
    };
    let amount = parse_amount(amount)?;
    let available = context.with_book_mut(|book| {
        let id = SavingsService::resolve(book, prefix)?;
        Ok(SavingsService::borrow(book, id, amount)?)
    })?;
    output::success(format!(
        "Borrowed {}. Still available this year: {}.",
        context.format_amount(amount),
        context.format_amount(available)
    ));
    Ok(())
}

fn handle_repay(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [prefix, amount] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: savings repay <id> <amount>".into(),
        ));
    };
    let amount = parse_amount(amount)?;
    let remaining = context.with_book_mut(|book| {
        let id = SavingsService::resolve(book, prefix)?;
        Ok(SavingsService::repay(book, id, amount)?)
    })?;
    if remaining.is_zero() {
        output::success(format!("Repaid {}. Loan settled.", context.format_amount(amount)));
    } else {
        output::success(format!(
            "Repaid {}. Outstanding: {}.",
            context.format_amount(amount),
            context.format_amount(remaining)
        ));
    }
    Ok(())
}

fn handle_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [prefix] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: savings remove <id>".into(),
        ));
    };
    let (id, label, outstanding) = context.with_book(|book| {
        SavingsService::resolve(book, prefix).map(|id| {
            let saving = book.saving(id);
            let label = saving
                .map(|s| format!("{} {}", month_name(s.month), s.year))
                .unwrap_or_default();
            let outstanding = saving.map(Saving::outstanding).unwrap_or_default();
            (id, label, outstanding)
        })
    })??;
    if outstanding > Decimal::ZERO {
        output::warning(format!(
            "{label} still has {} borrowed and not paid back.",
            context.format_amount(outstanding)
        ));
    }
    if !context.confirm(&format!("Remove the saving for {label}?"))? {
        output::info("Nothing changed.");
        return Ok(());
    }
    context.with_book_mut(|book| Ok(SavingsService::retire(book, id)?))?;
    output::success(format!("Removed the saving for {label}."));
    Ok(())
}
