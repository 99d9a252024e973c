//! Typed flags and nested command dispatch.
//!
//! This crate turns a process argument vector into a call to the right
//! handler with the right flag values in scope:
//!
//! - [`FlagSpec`]: a flag declaration with one or more alias names, a
//!   kind, a default and an optional environment override.
//! - [`FlagSet`] / [`Registry`]: per-level flag storage. One [`Cell`] backs
//!   every alias of a flag; [`FlagSet::normalize`] rejects conflicting alias
//!   usage and freezes the set into an immutable [`Registry`].
//! - [`Context`]: the typed read view a handler receives, with separate
//!   local and global (`global_*`) accessors.
//! - [`App`], [`Command`], [`Subcommand`]: the command tree with before
//!   hooks, actions and a not-found hook.
//! - [`HelpTopic`] / [`HelpPrinter`]: structural help handed to a
//!   configurable printer.
//!
//! Tree validation ([`validate_app`]) runs before any parsing and catches
//! duplicate flags, duplicate commands and malformed names.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use cmdtree_core::*;
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//!
//! let app = App::new("todo")
//!     .with_flag(FlagSpec::bool("verbose, V"))
//!     .with_command(
//!         Command::new("add")
//!             .with_flag(FlagSpec::int("priority, p", 0))
//!             .with_action(move |c| {
//!                 sink.borrow_mut().push(format!(
//!                     "{} p{} verbose={}",
//!                     c.args().first().unwrap_or(""),
//!                     c.int("priority"),
//!                     c.global_bool("verbose"),
//!                 ));
//!             }),
//!     );
//!
//! app.run(["todo", "-V", "add", "milk", "-p", "2"]).unwrap();
//! assert_eq!(seen.borrow().as_slice(), ["milk p2 verbose=true"]);
//!
//! let err = app.run(["todo", "add", "--nope"]).unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "incorrect usage: flag provided but not defined: -nope (type 'todo help' for info)"
//! );
//! ```

mod app;
mod command;
mod context;
mod dispatch;
mod duration;
mod env;
mod error;
mod flag;
mod help;
mod registry;
mod validate;

pub use app::App;
pub use command::{Action, BeforeHook, Command, NotFoundHook, Subcommand};
pub use context::{Args, Context};
pub use duration::{format_duration, parse_duration};
pub use env::{EnvSource, ProcessEnv};
pub use error::{FlagError, Result, RunError};
pub use flag::{
    FlagKind, FlagSpec, FlagValue, GenericClone, GenericValue, parse_bool, split_names,
};
pub use help::{
    AppHelp, CommandHelp, CommandSummary, FlagHelp, HELP_COMMAND, HELP_SUMMARY, HelpPrinter,
    HelpTopic, TextPrinter, VersionInfo, render_text,
};
pub use registry::{Cell, FlagSet, Registry};
pub use validate::{ValidationError, validate_app};
