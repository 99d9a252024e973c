//! Commands and subcommands.
//!
//! A [`Command`] hangs off the [`App`](crate::App) and may carry one level of
//! [`Subcommand`]s. Both are plain configuration with public fields and
//! chained `with_*` builders.

use std::fmt;

use crate::context::Context;
use crate::flag::FlagSpec;

/// Handler run when a dispatch level is selected.
pub type Action = Box<dyn Fn(&Context<'_>)>;

/// Hook run after a level's flags are parsed and before routing continues.
/// Returning `Err` stops the run.
pub type BeforeHook = Box<dyn Fn(&Context<'_>) -> Result<(), String>>;

/// Hook run when a positional token names no known command.
pub type NotFoundHook = Box<dyn Fn(&Context<'_>, &str)>;

/// A leaf command below a [`Command`].
///
/// # Examples
///
/// ```
/// use cmdtree_core::{FlagSpec, Subcommand};
///
/// let add = Subcommand::new("add")
///     .with_summary("attach a tag")
///     .with_flag(FlagSpec::string("color, c", "blue"));
/// assert!(add.has_name("add"));
/// assert_eq!(add.flags.len(), 1);
/// ```
#[derive(Default)]
pub struct Subcommand {
    pub name: String,
    /// One-line summary shown in listings.
    pub summary: String,
    pub usage: String,
    /// Longer explanation shown in the subcommand's own help.
    pub description: String,
    pub before: Option<BeforeHook>,
    /// Without an action, selecting the subcommand prints its help.
    pub action: Option<Action>,
    pub flags: Vec<FlagSpec>,
}

impl Subcommand {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = summary.to_string();
        self
    }

    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    pub fn with_flag(mut self, flag: FlagSpec) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn with_before(mut self, hook: impl Fn(&Context<'_>) -> Result<(), String> + 'static) -> Self {
        self.before = Some(Box::new(hook));
        self
    }

    pub fn with_action(mut self, action: impl Fn(&Context<'_>) + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.name == name
    }
}

impl fmt::Debug for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subcommand")
            .field("name", &self.name)
            .field("summary", &self.summary)
            .field("flags", &self.flags)
            .field("before", &self.before.is_some())
            .field("action", &self.action.is_some())
            .finish_non_exhaustive()
    }
}

/// A named command directly below the App.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Command, FlagSpec, Subcommand};
///
/// let tag = Command::new("tag")
///     .with_summary("manage tags")
///     .with_flag(FlagSpec::bool("dry-run"))
///     .with_subcommand(Subcommand::new("add"))
///     .with_subcommand(Subcommand::new("rm"));
///
/// assert!(tag.subcommand("rm").is_some());
/// assert!(tag.subcommand("r").is_none());
/// assert_eq!(tag.subcommand_names(), vec!["add", "rm"]);
/// ```
#[derive(Default)]
pub struct Command {
    pub name: String,
    pub summary: String,
    pub usage: String,
    pub description: String,
    pub before: Option<BeforeHook>,
    /// Without an action, selecting the command prints its help.
    pub action: Option<Action>,
    pub flags: Vec<FlagSpec>,
    pub subcommands: Vec<Subcommand>,
}

impl Command {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = summary.to_string();
        self
    }

    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    pub fn with_flag(mut self, flag: FlagSpec) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn with_subcommand(mut self, sub: Subcommand) -> Self {
        self.subcommands.push(sub);
        self
    }

    pub fn with_before(mut self, hook: impl Fn(&Context<'_>) -> Result<(), String> + 'static) -> Self {
        self.before = Some(Box::new(hook));
        self
    }

    pub fn with_action(mut self, action: impl Fn(&Context<'_>) + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    /// Exact name match; prefixes never match.
    pub fn has_name(&self, name: &str) -> bool {
        self.name == name
    }

    /// Finds a subcommand by name, first declared wins.
    pub fn subcommand(&self, name: &str) -> Option<&Subcommand> {
        self.subcommands.iter().find(|s| s.has_name(name))
    }

    pub fn subcommand_names(&self) -> Vec<&str> {
        self.subcommands.iter().map(|s| s.name.as_str()).collect()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("summary", &self.summary)
            .field("flags", &self.flags)
            .field("subcommands", &self.subcommands)
            .field("before", &self.before.is_some())
            .field("action", &self.action.is_some())
            .finish_non_exhaustive()
    }
}
