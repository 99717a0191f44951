use crate::{
    cli::{
        context::{CommandError, CommandResult, ShellContext},
        output,
        registry::CommandEntry,
    },
    config::CONFIG_KEYS,
    utils::build_info,
};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "config",
            "Show or change preferences",
            "config [show | set <key> <value>]",
            cmd_config,
        ),
        CommandEntry::new("version", "Show build information", "version", cmd_version),
        CommandEntry::new(
            "help",
            "List commands or show usage for one",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Leave the shell", "exit", cmd_exit),
    ]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            let rows: Vec<Vec<String>> = context
                .config
                .entries()
                .into_iter()
                .map(|(key, value)| vec![key.to_string(), value])
                .collect();
            output::print_table(&["Key", "Value"], &rows);
            output::info(format!("Stored at {}", context.config_manager.path().display()));
            Ok(())
        }
        ["set", key, value] => {
            context.set_config_value(key, value)?;
            output::success(format!("Configuration updated: {key} = {value}."));
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(format!(
            "usage: config [show | set <key> <value>] (keys: {})",
            CONFIG_KEYS.join(", ")
        ))),
    }
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let metadata = build_info::current();
    output::info(metadata.summary());
    output::info(format!("rustc: {}", metadata.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        return match context.registry.get(&name.to_lowercase()) {
            Some(entry) => {
                output::section(entry.name);
                println!("{}", entry.description);
                println!("usage: {}", entry.usage);
                Ok(())
            }
            None => {
                context.suggest_command(name);
                Ok(())
            }
        };
    }
    output::section("Commands");
    let rows: Vec<Vec<String>> = context
        .registry
        .list()
        .into_iter()
        .map(|entry| vec![entry.name.to_string(), entry.description.to_string()])
        .collect();
    output::print_table(&["Command", "Description"], &rows);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::info("Exiting shell.");
    Err(CommandError::ExitRequested)
}
