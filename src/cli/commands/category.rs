use crate::{
    cli::{
        context::{CommandError, CommandResult, ShellContext},
        output,
        registry::CommandEntry,
    },
    core::services::CategoryService,
    domain::ItemKind,
};

use super::short_id;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "category",
        "Manage expense categories",
        "category <add|list|rename|retire> ...\n  category add <name>\n  category rename <id|name> <new name>\n  category retire <id|name>",
        cmd_category,
    )]
}

fn cmd_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.split_first() {
        Some((&"add", rest)) => handle_add(context, rest),
        Some((&"list", _)) | None => handle_list(context),
        Some((&"rename", rest)) => handle_rename(context, rest),
        Some((&"retire", rest)) | Some((&"remove", rest)) => handle_retire(context, rest),
        Some((other, _)) => Err(CommandError::InvalidArguments(format!(
            "unknown category subcommand `{other}`"
        ))),
    }
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: category add <name> (quote names containing spaces)".into(),
        ));
    };
    let id = context.with_book_mut(|book| Ok(CategoryService::add(book, name)?))?;
    output::success(format!("Added category `{}` ({}).", name.trim(), short_id(&id.to_string())));
    Ok(())
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let rows: Vec<Vec<String>> = context.with_book(|book| {
        CategoryService::list(book)
            .into_iter()
            .map(|category| {
                let used = book
                    .active_items(ItemKind::Expense)
                    .filter(|item| item.category_id == Some(category.id))
                    .count();
                vec![
                    short_id(&category.id.to_string()),
                    category.name.clone(),
                    used.to_string(),
                ]
            })
            .collect()
    })?;
    if rows.is_empty() {
        output::info("No categories yet. Add one with `category add <name>`.");
        return Ok(());
    }
    output::print_table(&["ID", "Name", "Expenses"], &rows);
    Ok(())
}

fn handle_rename(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [needle, name] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: category rename <id|name> <new name>".into(),
        ));
    };
    context.with_book_mut(|book| {
        let id = CategoryService::resolve(book, needle)?;
        Ok(CategoryService::rename(book, id, name)?)
    })?;
    output::success(format!("Category renamed to `{}`.", name.trim()));
    Ok(())
}

fn handle_retire(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [needle] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: category retire <id|name>".into(),
        ));
    };
    let (id, name) = context.with_book(|book| {
        CategoryService::resolve(book, needle).map(|id| {
            let name = book.category(id).map(|c| c.name.clone()).unwrap_or_default();
            (id, name)
        })
    })??;
    if !context.confirm(&format!("Retire category `{name}`?"))? {
        output::info("Nothing changed.");
        return Ok(());
    }
    context.with_book_mut(|book| Ok(CategoryService::retire(book, id)?))?;
    output::success(format!("Retired category `{name}`. Expenses keep their label."));
    Ok(())
}
