//! Routing an argument vector through the command tree.
//!
//! Each level parses its own flags into a fresh registry, builds a
//! [`Context`] that shares the root registry as its global view, runs its
//! before hook, then routes on the first positional argument:
//!
//! 1. a known child runs one level down,
//! 2. `help` shows help for the named node without re-entering dispatch,
//! 3. an unknown token goes to the App's not-found hook when one is set,
//! 4. anything else runs the level's own action.
//!
//! Version and help flags are checked once, at the root.

use tracing::debug;

use crate::app::App;
use crate::command::{BeforeHook, Command, Subcommand};
use crate::context::Context;
use crate::env::EnvSource;
use crate::error::{FlagError, Result, RunError};
use crate::help::{AppHelp, CommandHelp, HELP_COMMAND, HelpTopic, VersionInfo};
use crate::registry::{FlagSet, Registry};

pub(crate) struct Dispatcher<'a> {
    app: &'a App,
    exec: String,
    env: &'a dyn EnvSource,
}

impl<'a> Dispatcher<'a> {
    pub(crate) fn new(app: &'a App, exec: String, env: &'a dyn EnvSource) -> Self {
        Self { app, exec, env }
    }

    fn usage(&self, source: FlagError) -> RunError {
        debug!(exec = %self.exec, error = %source, "incorrect usage");
        RunError::Usage {
            exec: self.exec.clone(),
            source,
        }
    }

    fn print(&self, topic: HelpTopic) -> Result<()> {
        self.app.printer.print(&topic)?;
        Ok(())
    }

    fn before(&self, hook: Option<&BeforeHook>, ctx: &Context<'_>, level: &str) -> Result<()> {
        let Some(hook) = hook else {
            return Ok(());
        };
        hook(ctx).map_err(|reason| {
            debug!(level = %level, reason = %reason, "before hook rejected run");
            RunError::BeforeRejected {
                level: level.to_string(),
                reason,
            }
        })
    }

    /// Calls the not-found hook if one is configured.
    fn not_found(&self, ctx: &Context<'_>, name: &str) -> bool {
        match &self.app.command_not_found {
            Some(hook) => {
                debug!(command = name, "command not found");
                hook(ctx, name);
                true
            }
            None => false,
        }
    }

    fn registry(
        &self,
        name: &str,
        set: std::result::Result<FlagSet, FlagError>,
    ) -> Result<Registry> {
        let set = set.map_err(|e| self.usage(e))?;
        let registry = set.normalize().map_err(|e| self.usage(e))?;
        debug!(level = name, args = ?registry.args(), "parsed level");
        Ok(registry)
    }

    pub(crate) fn run(&self, tokens: &[String]) -> Result<()> {
        let app = self.app;
        let flags = app.root_flags();
        let set = FlagSet::build(&app.name, &flags, self.env).and_then(|mut set| {
            set.parse(tokens)?;
            Ok(set)
        });
        let global = self.registry(&app.name, set)?;
        let ctx = Context::new(app, &global);

        if ctx.global_bool("version") {
            return self.print(HelpTopic::Version(VersionInfo::from_app(app)));
        }
        if ctx.global_bool("help") {
            return self.print(HelpTopic::App(AppHelp::from_app(app)));
        }

        self.before(app.before.as_ref(), &ctx, &app.name)?;

        let args = ctx.args();
        if let Some(name) = args.first() {
            if let Some(command) = app.command(name) {
                return self.run_command(command, &ctx);
            }
            if name == HELP_COMMAND {
                return self.help(&ctx, args.tail(), None);
            }
            if self.not_found(&ctx, name) {
                return Ok(());
            }
        }

        match &app.action {
            Some(action) => {
                action(&ctx);
                Ok(())
            }
            None => self.print(HelpTopic::App(AppHelp::from_app(app))),
        }
    }

    fn run_command(&self, command: &Command, parent: &Context<'_>) -> Result<()> {
        debug!(command = %command.name, "dispatching command");
        let tokens = parent.args().tail();

        let mut children = command.subcommand_names();
        if !children.is_empty() {
            children.push(HELP_COMMAND);
        }
        let set = FlagSet::build(&command.name, &command.flags, self.env).and_then(|mut set| {
            set.parse_interspersed(tokens, &children)?;
            Ok(set)
        });
        let local = self.registry(&command.name, set)?;
        let ctx = parent.for_command(command, &local);

        self.before(command.before.as_ref(), &ctx, &command.name)?;

        if !command.subcommands.is_empty() {
            let args = ctx.args();
            if let Some(name) = args.first() {
                if let Some(sub) = command.subcommand(name) {
                    return self.run_subcommand(command, sub, &ctx);
                }
                if name == HELP_COMMAND {
                    return self.help(&ctx, args.tail(), Some(command));
                }
                if self.not_found(&ctx, name) {
                    return Ok(());
                }
            }
        }

        match &command.action {
            Some(action) => {
                action(&ctx);
                Ok(())
            }
            None => self.print(HelpTopic::Command(CommandHelp::from_command(self.app, command))),
        }
    }

    fn run_subcommand(&self, command: &Command, sub: &Subcommand, parent: &Context<'_>) -> Result<()> {
        debug!(command = %command.name, subcommand = %sub.name, "dispatching subcommand");
        let tokens = parent.args().tail();

        let set = FlagSet::build(&sub.name, &sub.flags, self.env).and_then(|mut set| {
            set.parse_interspersed(tokens, &[])?;
            Ok(set)
        });
        let local = self.registry(&sub.name, set)?;
        let ctx = parent.for_subcommand(sub, &local);

        let level = format!("{} {}", command.name, sub.name);
        self.before(sub.before.as_ref(), &ctx, &level)?;

        match &sub.action {
            Some(action) => {
                action(&ctx);
                Ok(())
            }
            None => self.print(HelpTopic::Command(CommandHelp::from_subcommand(
                self.app, command, sub,
            ))),
        }
    }

    /// The `help` pseudo-command: looks a node up and prints its help.
    fn help(&self, ctx: &Context<'_>, topics: &[String], scope: Option<&Command>) -> Result<()> {
        debug!(topics = ?topics, scope = ?scope.map(|c| &c.name), "showing help");
        let app = self.app;

        let (command, rest) = match scope {
            Some(command) => (command, topics),
            None => match topics.split_first() {
                None => return self.print(HelpTopic::App(AppHelp::from_app(app))),
                Some((name, rest)) => match app.command(name) {
                    Some(command) => (command, rest),
                    None => return self.unknown_topic(ctx, name),
                },
            },
        };

        match rest.first() {
            None => self.print(HelpTopic::Command(CommandHelp::from_command(app, command))),
            Some(name) => match command.subcommand(name) {
                Some(sub) => self.print(HelpTopic::Command(CommandHelp::from_subcommand(
                    app, command, sub,
                ))),
                None => self.unknown_topic(ctx, name),
            },
        }
    }

    fn unknown_topic(&self, ctx: &Context<'_>, name: &str) -> Result<()> {
        if self.not_found(ctx, name) {
            return Ok(());
        }
        self.print(HelpTopic::UnknownTopic {
            name: name.to_string(),
        })
    }
}
