use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use clap::Command;
use serde::Serialize;

use super::CommandOptions;
use crate::errors::{LedgerError, Result};
use crate::output::OutputSink;
use crate::server::LedgerServer;

/// A subcommand implementation.
///
/// Handlers read from the server, write to `out`, and return accessor
/// failures unchanged; the driver decides how to report them.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn run(
        &self,
        server: &dyn LedgerServer,
        options: &CommandOptions,
        out: &mut dyn OutputSink,
    ) -> Result<()>;
}

/// Metadata for a registered command.
#[derive(Clone)]
pub struct CommandMeta {
    pub name: String,
    pub description: String,
    pub aliases: Vec<String>,
    /// Advisory: the command has no destructive side effects and may run
    /// without confirmation.
    pub safe: bool,
    pub command: Command,
    pub handler: Arc<dyn CommandHandler>,
}

impl std::fmt::Debug for CommandMeta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandMeta")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("aliases", &self.aliases)
            .field("safe", &self.safe)
            .finish_non_exhaustive()
    }
}

/// Name-keyed command table, populated once at startup.
pub struct CommandRegistry {
    commands: HashMap<String, CommandMeta>,
    aliases: HashMap<String, String>,
    root: Command,
}

impl CommandRegistry {
    /// Creates a new registry with the given root command.
    pub fn new(root: Command) -> Self {
        Self {
            commands: HashMap::new(),
            aliases: HashMap::new(),
            root,
        }
    }

    /// Registers a command. Fails with `DuplicateCommand` if the name or one
    /// of its aliases is already taken, including by a built-in subcommand of
    /// the root.
    pub fn register(&mut self, meta: CommandMeta) -> Result<()> {
        let builtin = |name: &str| {
            self.root
                .get_subcommands()
                .any(|sub| sub.get_name() == name || sub.get_all_aliases().any(|a| a == name))
        };
        let taken = |name: &str| {
            self.commands.contains_key(name) || self.aliases.contains_key(name) || builtin(name)
        };
        if let Some(clash) = std::iter::once(&meta.name)
            .chain(meta.aliases.iter())
            .find(|name| taken(name.as_str()))
        {
            return Err(LedgerError::DuplicateCommand(clash.clone()));
        }

        for alias in &meta.aliases {
            self.aliases.insert(alias.clone(), meta.name.clone());
        }
        tracing::trace!(command = %meta.name, safe = meta.safe, "registered command");
        self.commands.insert(meta.name.clone(), meta);
        Ok(())
    }

    /// Finds a command by name or alias.
    pub fn lookup(&self, name: &str) -> Option<&CommandMeta> {
        let canonical = self.aliases.get(name).map(String::as_str).unwrap_or(name);
        self.commands.get(canonical)
    }

    /// All registered commands, sorted by name.
    pub fn list(&self) -> Vec<&CommandMeta> {
        let mut cmds: Vec<&CommandMeta> = self.commands.values().collect();
        cmds.sort_by(|a, b| a.name.cmp(&b.name));
        cmds
    }

    /// Writes a human-readable listing, one command per line.
    pub fn list_commands(&self, out: &mut dyn OutputSink) -> Result<()> {
        for cmd in self.list() {
            let suffix = if cmd.safe { "" } else { " [unsafe]" };
            out.write_line(&format!("  {:<20} {}{}", cmd.name, cmd.description, suffix))?;
        }
        Ok(())
    }

    /// Writes the listing as pretty-printed JSON.
    pub fn list_commands_json(&self, out: &mut dyn OutputSink) -> Result<()> {
        let entries: Vec<CommandJsonEntry> = self
            .list()
            .into_iter()
            .map(|m| CommandJsonEntry {
                name: m.name.clone(),
                description: m.description.clone(),
                aliases: m.aliases.clone(),
                safe: m.safe,
            })
            .collect();
        out.write_block(&crate::json::pretty_print(&entries)?)
    }

    /// Builds the clap root with every registered command attached, in name order.
    pub fn build_root(&self) -> Command {
        let mut root = self.root.clone();
        for meta in self.list() {
            root = root.subcommand(meta.command.clone());
        }
        root
    }

    /// Returns the number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns a sorted list of all registered command names.
    pub fn command_names(&self) -> Vec<String> {
        self.list().into_iter().map(|m| m.name.clone()).collect()
    }

    /// Returns true if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// JSON-serializable entry for command listing.
#[derive(Debug, Serialize)]
struct CommandJsonEntry {
    name: String,
    description: String,
    aliases: Vec<String>,
    safe: bool,
}

/// Builder for constructing `CommandMeta` instances.
pub struct CommandBuilder {
    name: String,
    description: String,
    aliases: Vec<String>,
    safe: bool,
    command: Option<Command>,
    handler: Arc<dyn CommandHandler>,
}

impl CommandBuilder {
    /// Creates a new builder with the given command name and handler.
    pub fn new(name: &str, handler: impl CommandHandler + 'static) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            aliases: Vec::new(),
            safe: false,
            command: None,
            handler: Arc::new(handler),
        }
    }

    /// Creates a builder from an existing clap Command, extracting name,
    /// description and aliases.
    pub fn from_clap(cmd: Command, handler: impl CommandHandler + 'static) -> Self {
        let name = cmd.get_name().to_string();
        let description = cmd
            .get_about()
            .map(|s| s.to_string())
            .unwrap_or_default();
        let aliases = cmd.get_all_aliases().map(str::to_string).collect();
        Self {
            name,
            description,
            aliases,
            safe: false,
            command: Some(cmd),
            handler: Arc::new(handler),
        }
    }

    /// Sets the command description.
    pub fn description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    /// Adds aliases.
    pub fn aliases(mut self, aliases: &[&str]) -> Self {
        for alias in aliases {
            if !self.aliases.iter().any(|a| a == alias) {
                self.aliases.push(alias.to_string());
            }
        }
        self
    }

    /// Marks the command as safe to run without confirmation.
    pub fn safe(mut self) -> Self {
        self.safe = true;
        self
    }

    /// Builds the `CommandMeta`, creating a basic clap Command if none was
    /// provided via `from_clap`.
    pub fn build(self) -> CommandMeta {
        let mut command = self.command.unwrap_or_else(|| {
            let mut cmd = Command::new(self.name.clone());
            if !self.description.is_empty() {
                cmd = cmd.about(self.description.clone());
            }
            cmd
        });
        let existing: Vec<String> = command.get_all_aliases().map(str::to_string).collect();
        let missing: Vec<String> = self
            .aliases
            .iter()
            .filter(|a| !existing.contains(a))
            .cloned()
            .collect();
        if !missing.is_empty() {
            command = command.aliases(missing);
        }

        CommandMeta {
            name: self.name,
            description: self.description,
            aliases: self.aliases,
            safe: self.safe,
            command,
            handler: self.handler,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MemorySink;

    struct Noop;

    #[async_trait]
    impl CommandHandler for Noop {
        async fn run(
            &self,
            _server: &dyn LedgerServer,
            _options: &CommandOptions,
            out: &mut dyn OutputSink,
        ) -> Result<()> {
            out.write_line("noop")
        }
    }

    fn make_root() -> Command {
        Command::new("ledger-tool")
    }

    fn make_meta(name: &str) -> CommandMeta {
        CommandBuilder::new(name, Noop)
            .description(&format!("{} command", name))
            .build()
    }

    #[test]
    fn test_register_and_lookup() {
        let mut reg = CommandRegistry::new(make_root());
        reg.register(make_meta("info")).unwrap();
        reg.register(make_meta("ledger")).unwrap();

        assert_eq!(reg.len(), 2);
        assert!(!reg.is_empty());
        assert_eq!(reg.lookup("info").unwrap().name, "info");
        assert!(reg.lookup("print").is_none());
    }

    #[test]
    fn test_duplicate_detection() {
        let mut reg = CommandRegistry::new(make_root());
        reg.register(make_meta("info")).unwrap();
        let err = reg.register(make_meta("info")).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateCommand(ref name) if name == "info"));
        assert!(err.to_string().contains("Duplicate"));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_builtin_subcommand_name_is_taken() {
        use crate::cli::{create_root_command, LIST_COMMAND};

        let mut reg = CommandRegistry::new(create_root_command());
        let err = reg
            .register(CommandBuilder::new(LIST_COMMAND, Noop).safe().build())
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateCommand(ref name) if name == LIST_COMMAND));

        let err = reg
            .register(CommandBuilder::new("list", Noop).aliases(&[LIST_COMMAND]).build())
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateCommand(ref name) if name == LIST_COMMAND));
        assert!(reg.is_empty());

        reg.register(make_meta("info")).unwrap();
        let matches = reg.build_root().try_get_matches_from(["ledger-tool", "info"]).unwrap();
        assert_eq!(matches.subcommand_name(), Some("info"));
    }

    #[test]
    fn test_alias_clash_is_duplicate() {
        let mut reg = CommandRegistry::new(make_root());
        reg.register(CommandBuilder::new("info", Noop).aliases(&["i"]).build())
            .unwrap();
        let err = reg
            .register(CommandBuilder::new("inspect", Noop).aliases(&["i"]).build())
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateCommand(ref name) if name == "i"));
        assert!(reg.lookup("inspect").is_none());
    }

    #[test]
    fn test_lookup_by_alias() {
        let mut reg = CommandRegistry::new(make_root());
        reg.register(CommandBuilder::new("info", Noop).aliases(&["i", "status"]).build())
            .unwrap();
        assert_eq!(reg.lookup("status").unwrap().name, "info");
    }

    #[test]
    fn test_list_is_sorted() {
        let mut reg = CommandRegistry::new(make_root());
        for name in ["print", "info", "ledger"] {
            reg.register(make_meta(name)).unwrap();
        }
        let names: Vec<_> = reg.list().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["info", "ledger", "print"]);
        assert_eq!(reg.command_names(), ["info", "ledger", "print"]);
    }

    #[test]
    fn test_list_commands_marks_unsafe() {
        let mut reg = CommandRegistry::new(make_root());
        reg.register(CommandBuilder::new("info", Noop).safe().build())
            .unwrap();
        reg.register(make_meta("wipe")).unwrap();

        let mut sink = MemorySink::new();
        reg.list_commands(&mut sink).unwrap();
        assert_eq!(sink.lines().len(), 2);
        assert!(!sink.lines()[0].contains("[unsafe]"));
        assert!(sink.lines()[1].contains("wipe"));
        assert!(sink.lines()[1].ends_with("[unsafe]"));
    }

    #[test]
    fn test_list_commands_json() {
        let mut reg = CommandRegistry::new(make_root());
        reg.register(CommandBuilder::new("info", Noop).safe().build())
            .unwrap();

        let mut sink = MemorySink::new();
        reg.list_commands_json(&mut sink).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&sink.contents()).unwrap();
        assert_eq!(parsed[0]["name"], "info");
        assert_eq!(parsed[0]["safe"], true);
    }

    #[test]
    fn test_builder_from_clap() {
        let cmd = Command::new("info").about("Show status").alias("i");
        let meta = CommandBuilder::from_clap(cmd, Noop)
            .aliases(&["i", "status"])
            .safe()
            .build();

        assert_eq!(meta.name, "info");
        assert_eq!(meta.description, "Show status");
        assert_eq!(meta.aliases, vec!["i", "status"]);
        assert!(meta.safe);
        let clap_aliases: Vec<_> = meta.command.get_all_aliases().collect();
        assert_eq!(clap_aliases, vec!["i", "status"]);
    }

    #[test]
    fn test_builder_defaults() {
        let meta = CommandBuilder::new("test-cmd", Noop).build();
        assert_eq!(meta.name, "test-cmd");
        assert!(meta.description.is_empty());
        assert!(meta.aliases.is_empty());
        assert!(!meta.safe);
    }

    #[test]
    fn test_build_root_attaches_subcommands() {
        let mut reg = CommandRegistry::new(make_root());
        reg.register(make_meta("info")).unwrap();
        reg.register(make_meta("ledger")).unwrap();

        let root = reg.build_root();
        let sub_names: Vec<_> = root
            .get_subcommands()
            .map(|c| c.get_name().to_string())
            .collect();
        assert_eq!(sub_names, vec!["info", "ledger"]);
        assert_eq!(reg.len(), 2);
    }
}
