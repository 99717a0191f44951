use crate::{
    cli::{
        context::{CommandError, CommandResult, ShellContext},
        output,
        registry::CommandEntry,
    },
    core::services::ResolutionService,
};

use super::{parse_year, short_id, year_or_current};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "resolution",
        "Yearly resolutions, shared or per person",
        "resolution <list|add|toggle|remove> ...\n  resolution list [year]\n  resolution add <year> <title> [person]\n  resolution toggle <id>\n  resolution remove <id>",
        cmd_resolution,
    )]
}

fn cmd_resolution(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.split_first() {
        Some((&"list", rest)) => handle_list(context, rest),
        None => handle_list(context, &[]),
        Some((&"add", rest)) => handle_add(context, rest),
        Some((&"toggle", rest)) | Some((&"done", rest)) => handle_toggle(context, rest),
        Some((&"remove", rest)) => handle_remove(context, rest),
        Some((other, _)) => Err(CommandError::InvalidArguments(format!(
            "unknown resolution action `{other}`"
        ))),
    }
}

fn handle_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let year = year_or_current(args)?;
    let (groups, (completed, total)) = context.with_book(|book| {
        let groups: Vec<(Option<String>, Vec<Vec<String>>)> = ResolutionService::grouped(book, year)
            .into_iter()
            .map(|group| {
                let rows = group
                    .resolutions
                    .iter()
                    .map(|resolution| {
                        vec![
                            short_id(&resolution.id.to_string()),
                            (if resolution.completed { "[x]" } else { "[ ]" }).to_string(),
                            resolution.title.clone(),
                        ]
                    })
                    .collect();
                (group.person, rows)
            })
            .collect();
        (groups, ResolutionService::progress(book, year))
    })?;

    if groups.is_empty() {
        output::info(format!("No resolutions for {year}."));
        return Ok(());
    }
    for (person, rows) in groups {
        output::section(person.unwrap_or_else(|| "Shared".into()));
        output::print_table(&["ID", "Done", "Resolution"], &rows);
    }
    let rate = completed as f64 * 100.0 / total as f64;
    output::info(format!("{completed} of {total} completed ({rate:.1}%)."));
    Ok(())
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (year, title, person) = match args {
        [year, title] => (parse_year(year)?, *title, None),
        [year, title, person] => (parse_year(year)?, *title, Some(*person)),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: resolution add <year> <title> [person] (quote titles containing spaces)"
                    .into(),
            ))
        }
    };
    let id = context.with_book_mut(|book| Ok(ResolutionService::add(book, year, title, person)?))?;
    output::success(format!(
        "Resolution for {year} added ({}).",
        short_id(&id.to_string())
    ));
    Ok(())
}

fn handle_toggle(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [prefix] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: resolution toggle <id>".into(),
        ));
    };
    let completed = context.with_book_mut(|book| {
        let id = ResolutionService::resolve(book, prefix)?;
        Ok(ResolutionService::toggle(book, id)?)
    })?;
    if completed {
        output::success("Resolution marked complete.");
    } else {
        output::info("Resolution reopened.");
    }
    Ok(())
}

fn handle_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [prefix] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: resolution remove <id>".into(),
        ));
    };
    let id = context.with_book(|book| ResolutionService::resolve(book, prefix))??;
    if !context.confirm("Are you sure you want to delete this resolution?")? {
        output::info("Nothing changed.");
        return Ok(());
    }
    let removed = context.with_book_mut(|book| Ok(ResolutionService::remove(book, id)?))?;
    output::success(format!("Deleted resolution `{}`.", removed.title));
    Ok(())
}
