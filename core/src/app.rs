//! The application root.

use std::fmt;

use crate::command::{Action, BeforeHook, Command, NotFoundHook};
use crate::context::Context;
use crate::dispatch::Dispatcher;
use crate::env::{EnvSource, ProcessEnv};
use crate::error::{Result, RunError};
use crate::flag::FlagSpec;
use crate::help::{HelpPrinter, TextPrinter};
use crate::validate::validate_app;

/// Root of a command tree plus the hooks that drive one run.
///
/// # Examples
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use cmdtree_core::{App, FlagSpec};
///
/// let greeting = Rc::new(RefCell::new(String::new()));
/// let sink = Rc::clone(&greeting);
///
/// let app = App::new("greet")
///     .with_flag(FlagSpec::string("name", "bob").with_description("a name to say"))
///     .with_action(move |c| *sink.borrow_mut() = format!("Hello {}", c.string("name")));
///
/// app.run(["greet", "--name", "Jeremy"]).unwrap();
/// assert_eq!(*greeting.borrow(), "Hello Jeremy");
/// ```
pub struct App {
    pub name: String,
    /// Program name used in usage hints; defaults to the first argument.
    pub exec: Option<String>,
    pub description: String,
    pub usage: String,
    pub version: String,
    pub author: String,
    pub email: String,
    /// Global flags, visible to every level through `global_*` accessors.
    pub flags: Vec<FlagSpec>,
    pub commands: Vec<Command>,
    pub before: Option<BeforeHook>,
    /// Runs when no command matched; prints app help when unset.
    pub action: Option<Action>,
    pub command_not_found: Option<NotFoundHook>,
    pub printer: Box<dyn HelpPrinter>,
}

impl App {
    /// Creates an App with default description, usage and version.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            exec: None,
            description: "A new application".to_string(),
            usage: format!("{name} [options] <command>"),
            version: "0.0.0".to_string(),
            author: String::new(),
            email: String::new(),
            flags: Vec::new(),
            commands: Vec::new(),
            before: None,
            action: None,
            command_not_found: None,
            printer: Box::new(TextPrinter),
        }
    }

    pub fn with_exec(mut self, exec: &str) -> Self {
        self.exec = Some(exec.to_string());
        self
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Sets the author shown in app help; `email` may be empty.
    pub fn with_author(mut self, author: &str, email: &str) -> Self {
        self.author = author.to_string();
        self.email = email.to_string();
        self
    }

    pub fn with_flag(mut self, flag: FlagSpec) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn with_command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    pub fn with_before(mut self, hook: impl Fn(&Context<'_>) -> std::result::Result<(), String> + 'static) -> Self {
        self.before = Some(Box::new(hook));
        self
    }

    pub fn with_action(mut self, action: impl Fn(&Context<'_>) + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    pub fn with_command_not_found(mut self, hook: impl Fn(&Context<'_>, &str) + 'static) -> Self {
        self.command_not_found = Some(Box::new(hook));
        self
    }

    /// Replaces the help/version printer.
    pub fn with_printer(mut self, printer: impl HelpPrinter + 'static) -> Self {
        self.printer = Box::new(printer);
        self
    }

    /// Finds a command by exact name, first declared wins.
    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.has_name(name))
    }

    /// The App's flags plus the built-in `help, h` and `version` booleans.
    ///
    /// A built-in is left out entirely when the App already declares any of
    /// its names.
    pub fn root_flags(&self) -> Vec<FlagSpec> {
        let mut flags = self.flags.clone();
        let builtins = [
            FlagSpec::bool("help, h").with_description("show help"),
            FlagSpec::bool("version").with_description("print the version"),
        ];
        for builtin in builtins {
            let taken = builtin
                .names
                .iter()
                .any(|name| self.flags.iter().any(|f| f.has_name(name)));
            if !taken {
                flags.push(builtin);
            }
        }
        flags
    }

    /// Runs the App against `args`, reading overrides from the process
    /// environment. `args[0]` is the program name.
    pub fn run<I, S>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run_with_env(args, &ProcessEnv)
    }

    /// Runs the App with an explicit environment source.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Config`] for a malformed tree,
    /// [`RunError::Usage`] for parse or normalization failures at any
    /// level, [`RunError::BeforeRejected`] when a before hook declines and
    /// [`RunError::Output`] when the printer fails.
    pub fn run_with_env<I, S>(&self, args: I, env: &dyn EnvSource) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();

        if let Some(err) = validate_app(self).into_iter().next() {
            return Err(RunError::Config(err));
        }

        let exec = self
            .exec
            .clone()
            .or_else(|| args.first().cloned())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| self.name.clone());

        Dispatcher::new(self, exec, env).run(args.get(1..).unwrap_or(&[]))
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("flags", &self.flags)
            .field("commands", &self.commands)
            .field("before", &self.before.is_some())
            .field("action", &self.action.is_some())
            .field("command_not_found", &self.command_not_found.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_command_lookup() {
        let app = App::new("test")
            .with_command(Command::new("foobar"))
            .with_command(Command::new("batbaz"));

        for (name, expected) in [
            ("foobar", true),
            ("batbaz", true),
            ("b", false),
            ("f", false),
            ("bat", false),
            ("nothing", false),
        ] {
            assert_eq!(app.command(name).is_some(), expected, "{name}");
        }
    }

    #[test]
    fn test_root_flags_skip_declared_builtins() {
        let app = App::new("test").with_flag(FlagSpec::string("host, h", "localhost"));
        let names: Vec<Vec<String>> = app.root_flags().into_iter().map(|f| f.names).collect();
        assert_eq!(
            names,
            vec![
                vec!["host".to_string(), "h".to_string()],
                vec!["version".to_string()],
            ]
        );

        let app = App::new("test").with_flag(FlagSpec::string("help", "topics"));
        let names: Vec<Vec<String>> = app.root_flags().into_iter().map(|f| f.names).collect();
        assert_eq!(
            names,
            vec![vec!["help".to_string()], vec!["version".to_string()]]
        );
    }

    #[test]
    fn test_defaults() {
        let app = App::new("greet");
        assert_eq!(app.usage, "greet [options] <command>");
        assert_eq!(app.version, "0.0.0");
        assert!(app.action.is_none());
    }
}
