use std::collections::HashMap;

use crate::cli::core::{CommandResult, ShellContext};

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

/// Commands in registration order. Lookups ignore case and resolve aliases.
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

    /// Makes `alias` resolve to the registered command `target`. Returns
    /// `false` when `target` is unknown or `alias` shadows a command.
    pub fn alias(&mut self, alias: &'static str, target: &'static str) -> bool {
        if !self.commands.contains_key(target) || self.commands.contains_key(alias) {
            return false;
        }
        self.aliases.insert(alias, target);
        true
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        let name = name.trim().to_lowercase();
        let name = self.aliases.get(name.as_str()).copied().unwrap_or(name.as_str());
        self.commands.get(name)
    }

    /// Aliases pointing at `name`, sorted for display.
    pub fn aliases_of(&self, name: &str) -> Vec<&'static str> {
        let mut found: Vec<_> = self
            .aliases
            .iter()
            .filter(|(_, target)| **target == name)
            .map(|(alias, _)| *alias)
            .collect();
        found.sort_unstable();
        found
    }

    pub fn list(&self) -> Vec<&CommandEntry> {
        self.order
            .iter()
            .filter_map(|name| self.commands.get(name))
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
        Ok(())
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.register(CommandEntry::new("history", "List records", "history <kind>", noop));
        registry.register(CommandEntry::new("exit", "Exit", "exit", noop));
        registry
    }

    #[test]
    fn lookup_ignores_case_and_surrounding_space() {
        let registry = registry();
        assert_eq!(registry.get("HISTORY").map(|entry| entry.name), Some("history"));
        assert_eq!(registry.get(" Exit ").map(|entry| entry.name), Some("exit"));
        assert!(registry.get("sumary").is_none());
    }

    #[test]
    fn aliases_resolve_to_their_command() {
        let mut registry = registry();
        assert!(registry.alias("quit", "exit"));
        assert!(registry.alias("ls", "history"));
        assert!(!registry.alias("gone", "missing"));
        assert!(!registry.alias("exit", "history"));

        assert_eq!(registry.get("Quit").map(|entry| entry.name), Some("exit"));
        assert!(registry.handler("LS").is_some());
        assert_eq!(registry.aliases_of("exit"), ["quit"]);
        assert_eq!(registry.names().collect::<Vec<_>>(), ["history", "exit"]);
    }
}
