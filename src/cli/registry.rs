use std::collections::HashMap;

use crate::cli::context::{CommandResult, ShellContext};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

/// Commands keyed by name, remembering registration order for `help`.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandEntry>,
    aliases: HashMap<&'static str, &'static str>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: CommandEntry) {
        let name = entry.name;
        if self.commands.insert(name, entry).is_none() {
            self.order.push(name);
        }
    }

    /// Makes `alias` dispatch to the already-registered `target`.
    pub fn alias(&mut self, alias: &'static str, target: &'static str) {
        if self.commands.contains_key(target) {
            self.aliases.insert(alias, target);
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        let key = self.aliases.get(name).copied().unwrap_or(name);
        self.commands.get(key)
    }

    pub fn list(&self) -> Vec<&CommandEntry> {
        self.order
            .iter()
            .filter_map(|name| self.commands.get(name))
            .collect()
    }

    /// Primary names followed by aliases.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order
            .iter()
            .copied()
            .chain(self.aliases.keys().copied())
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut ShellContext, _: &[&str]) -> CommandResult {
        Ok(())
    }

    #[test]
    fn keeps_registration_order() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandEntry::new("zeta", "", "", noop));
        registry.register(CommandEntry::new("alpha", "", "", noop));
        let names: Vec<_> = registry.list().iter().map(|entry| entry.name).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn aliases_resolve_to_their_target() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandEntry::new("exit", "Leave", "exit", noop));
        registry.alias("quit", "exit");
        registry.alias("bye", "missing");
        assert_eq!(registry.get("quit").map(|entry| entry.name), Some("exit"));
        assert!(registry.get("bye").is_none());
        assert!(registry.names().any(|name| name == "quit"));
    }
}
