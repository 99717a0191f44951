use crate::{
    cli::{
        context::{CommandError, CommandResult, ShellContext},
        output,
        registry::CommandEntry,
    },
    core::services::{CategoryService, ItemDraft, ItemService},
    domain::{ItemKind, RecurrenceRule, RecurringItem},
};

use super::{optional, parse_amount, parse_kind, parse_rule, short_id};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "income",
            "Manage recurring income",
            "income <add|list|edit|retire> ...\n  income add <name> <amount> <rule> <start> [end]\n  income edit <id> <name|amount|rule|start|end|description|person> <value>\n  income retire <id>",
            cmd_income,
        ),
        CommandEntry::new(
            "expense",
            "Manage recurring expenses",
            "expense <add|list|edit|retire> ...\n  expense add <name> <amount> <rule> <start> [end]\n  expense edit <id> <name|amount|rule|start|end|description|person|category> <value>\n  expense retire <id>",
            cmd_expense,
        ),
        CommandEntry::new(
            "rules",
            "Show recurrence rule codes",
            "rules [income|expense]",
            cmd_rules,
        ),
    ]
}

fn cmd_income(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    item_command(context, ItemKind::Income, args)
}

fn cmd_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    item_command(context, ItemKind::Expense, args)
}

fn item_command(context: &mut ShellContext, kind: ItemKind, args: &[&str]) -> CommandResult {
    match args.split_first() {
        Some((&"add", rest)) => add_item(context, kind, rest),
        Some((&"list", _)) | None => list_items(context, kind),
        Some((&"edit", rest)) => edit_item(context, kind, rest),
        Some((&"retire", rest)) => retire_item(context, kind, rest),
        Some((other, _)) => Err(CommandError::InvalidArguments(format!(
            "unknown {kind} action `{other}` (expected add, list, edit or retire)"
        ))),
    }
}

fn add_item(context: &mut ShellContext, kind: ItemKind, args: &[&str]) -> CommandResult {
    let [name, amount, rule, start, rest @ ..] = args else {
        return Err(CommandError::InvalidArguments(format!(
            "usage: {kind} add <name> <amount> <rule> <start> [end]"
        )));
    };
    if rest.len() > 1 {
        return Err(CommandError::InvalidArguments(
            "too many arguments; quote names containing spaces".into(),
        ));
    }
    let draft = ItemDraft {
        kind,
        name: (*name).to_string(),
        amount: parse_amount(amount)?,
        start_date: (*start).to_string(),
        end_date: rest.first().map(|end| (*end).to_string()),
        rule_code: parse_rule(kind, rule)?,
        description: None,
        category_id: None,
        person: None,
    };
    let id = context.with_book_mut(|book| Ok(ItemService::add(book, draft)?))?;
    output::success(format!("Added {kind} `{name}` ({}).", short_id(&id.to_string())));
    Ok(())
}

fn list_items(context: &mut ShellContext, kind: ItemKind) -> CommandResult {
    let rows: Vec<Vec<String>> = context.with_book(|book| {
        ItemService::list(book, kind)
            .into_iter()
            .map(|item| {
                // Expenses are grouped by category, incomes by who earns them.
                let owner = match kind {
                    ItemKind::Expense => item
                        .category_id
                        .and_then(|id| book.category(id))
                        .map(|category| category.name.clone()),
                    ItemKind::Income => item.person.clone(),
                };
                vec![
                    short_id(&item.id.to_string()),
                    item.name.clone(),
                    context.format_amount(item.amount),
                    item.rule()
                        .map(|rule| rule.label().to_string())
                        .unwrap_or_else(|| format!("code {}", item.rule_code)),
                    item.start_date.clone(),
                    item.end_date.clone().unwrap_or_else(|| "-".into()),
                    owner.unwrap_or_else(|| "-".into()),
                ]
            })
            .collect()
    })?;
    if rows.is_empty() {
        output::info(format!("No active {kind} items."));
        return Ok(());
    }
    let owner_header = match kind {
        ItemKind::Expense => "Category",
        ItemKind::Income => "Person",
    };
    output::print_table(
        &["ID", "Name", "Amount", "Rule", "Start", "End", owner_header],
        &rows,
    );
    Ok(())
}

fn edit_item(context: &mut ShellContext, kind: ItemKind, args: &[&str]) -> CommandResult {
    let [prefix, field, value] = args else {
        return Err(CommandError::InvalidArguments(format!(
            "usage: {kind} edit <id> <field> <value> (see `help {kind}`)"
        )));
    };
    let field = field.to_lowercase();
    let value = (*value).to_string();
    let edit: Box<dyn FnOnce(&mut RecurringItem)> = match field.as_str() {
        "name" => Box::new(move |item: &mut RecurringItem| item.name = value),
        "amount" => {
            let amount = parse_amount(&value)?;
            Box::new(move |item: &mut RecurringItem| item.amount = amount)
        }
        "rule" => {
            let code = parse_rule(kind, &value)?;
            Box::new(move |item: &mut RecurringItem| item.rule_code = code)
        }
        "start" => Box::new(move |item: &mut RecurringItem| item.start_date = value),
        "end" => Box::new(move |item: &mut RecurringItem| item.end_date = optional(value)),
        "description" | "note" => {
            Box::new(move |item: &mut RecurringItem| item.description = optional(value))
        }
        "person" => Box::new(move |item: &mut RecurringItem| item.person = optional(value)),
        "category" => {
            let category_id = match optional(value) {
                Some(needle) => {
                    Some(context.with_book(|book| CategoryService::resolve(book, &needle))??)
                }
                None => None,
            };
            Box::new(move |item: &mut RecurringItem| item.category_id = category_id)
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown field `{other}`"
            )))
        }
    };
    let name = context.with_book_mut(|book| {
        let id = ItemService::resolve(book, kind, prefix)?;
        ItemService::update(book, id, edit)?;
        Ok(book.item(id).map(|item| item.name.clone()).unwrap_or_default())
    })?;
    output::success(format!("Updated {kind} `{name}`."));
    if matches!(field.as_str(), "amount" | "rule" | "start" | "end") {
        output::hint("Run `generate <year>` to refresh its unconfirmed occurrences.");
    }
    Ok(())
}

fn retire_item(context: &mut ShellContext, kind: ItemKind, args: &[&str]) -> CommandResult {
    let [prefix] = args else {
        return Err(CommandError::InvalidArguments(format!(
            "usage: {kind} retire <id>"
        )));
    };
    let (id, name) = context.with_book(|book| {
        ItemService::resolve(book, kind, prefix)
            .map(|id| (id, book.item(id).map(|item| item.name.clone()).unwrap_or_default()))
    })??;
    if !context.confirm(&format!("Retire {kind} `{name}`?"))? {
        output::info("Nothing changed.");
        return Ok(());
    }
    context.with_book_mut(|book| Ok(ItemService::retire(book, id)?))?;
    output::success(format!("Retired {kind} `{name}`. Confirmed history is kept."));
    Ok(())
}

fn cmd_rules(_context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let kinds = match args.first() {
        Some(raw) => vec![parse_kind(raw)?],
        None => ItemKind::ALL.to_vec(),
    };
    for kind in kinds {
        output::section(format!("{kind} rules"));
        let rows: Vec<Vec<String>> = RecurrenceRule::choices(kind)
            .into_iter()
            .map(|(code, rule)| vec![code.to_string(), rule.label().to_string()])
            .collect();
        output::print_table(&["Code", "Rule"], &rows);
    }
    Ok(())
}
