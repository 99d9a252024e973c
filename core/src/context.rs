//! Typed, read-only view handed to actions and hooks.
//!
//! A [`Context`] pairs the registry of the dispatch level that is running
//! (local) with the registry the [`App`] built from its own flags (global).
//! Plain accessors read only the local registry, `global_*` accessors read
//! only the global one. Missing names and kind mismatches yield the kind's
//! zero value.

use std::time::Duration;

use crate::app::App;
use crate::command::{Command, Subcommand};
use crate::flag::{FlagKind, FlagValue, GenericValue};
use crate::registry::Registry;

/// Residual positional arguments of one dispatch level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Args<'r>(&'r [String]);

impl<'r> Args<'r> {
    pub fn new(args: &'r [String]) -> Self {
        Self(args)
    }

    /// Returns `true` if there is at least one positional argument.
    pub fn present(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn first(&self) -> Option<&'r str> {
        self.0.first().map(String::as_str)
    }

    /// All arguments but the first.
    pub fn tail(&self) -> &'r [String] {
        self.0.get(1..).unwrap_or(&[])
    }

    pub fn get(&self, n: usize) -> Option<&'r str> {
        self.0.get(n).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'r str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &'r [String] {
        self.0
    }
}

fn bool_of(registry: &Registry, name: &str) -> bool {
    match registry.lookup(name) {
        Some(cell) if cell.kind().is_bool() => matches!(cell.value(), FlagValue::Bool(true)),
        _ => false,
    }
}

fn string_of<'r>(registry: &'r Registry, name: &str) -> &'r str {
    match registry.value(name) {
        Some(FlagValue::String(s)) => s,
        _ => "",
    }
}

fn int_of(registry: &Registry, name: &str) -> i64 {
    match registry.value(name) {
        Some(FlagValue::Int(v)) => *v,
        _ => 0,
    }
}

fn float_of(registry: &Registry, name: &str) -> f64 {
    match registry.value(name) {
        Some(FlagValue::Float(v)) => *v,
        _ => 0.0,
    }
}

fn duration_of(registry: &Registry, name: &str) -> Duration {
    match registry.value(name) {
        Some(FlagValue::Duration(v)) => *v,
        _ => Duration::ZERO,
    }
}

fn generic_of<'r>(registry: &'r Registry, name: &str) -> Option<&'r dyn GenericValue> {
    match registry.value(name) {
        Some(FlagValue::Generic(v)) => Some(v.as_ref()),
        _ => None,
    }
}

fn int_slice_of<'r>(registry: &'r Registry, name: &str) -> &'r [i64] {
    match registry.value(name) {
        Some(FlagValue::IntList(v)) => v,
        _ => &[],
    }
}

fn string_slice_of<'r>(registry: &'r Registry, name: &str) -> &'r [String] {
    match registry.value(name) {
        Some(FlagValue::StringList(v)) => v,
        _ => &[],
    }
}

/// What an action sees of the run.
#[derive(Debug, Clone, Copy)]
pub struct Context<'r> {
    app: &'r App,
    command: Option<&'r Command>,
    subcommand: Option<&'r Subcommand>,
    local: &'r Registry,
    global: &'r Registry,
}

impl<'r> Context<'r> {
    /// Context for the App's own level, where local and global coincide.
    pub fn new(app: &'r App, registry: &'r Registry) -> Self {
        Self {
            app,
            command: None,
            subcommand: None,
            local: registry,
            global: registry,
        }
    }

    pub(crate) fn for_command(&self, command: &'r Command, local: &'r Registry) -> Self {
        Self {
            app: self.app,
            command: Some(command),
            subcommand: None,
            local,
            global: self.global,
        }
    }

    pub(crate) fn for_subcommand(&self, subcommand: &'r Subcommand, local: &'r Registry) -> Self {
        Self {
            app: self.app,
            command: self.command,
            subcommand: Some(subcommand),
            local,
            global: self.global,
        }
    }

    pub fn app(&self) -> &'r App {
        self.app
    }

    /// The matched command, if dispatch went below the App.
    pub fn command(&self) -> Option<&'r Command> {
        self.command
    }

    pub fn subcommand(&self) -> Option<&'r Subcommand> {
        self.subcommand
    }

    /// Registry of the level that is running.
    pub fn local(&self) -> &'r Registry {
        self.local
    }

    /// Registry built from the App's flags.
    pub fn global(&self) -> &'r Registry {
        self.global
    }

    /// Positional arguments left after this level's flags.
    pub fn args(&self) -> Args<'r> {
        Args::new(self.local.args())
    }

    /// Returns the kind of a local flag, if declared.
    pub fn kind_of(&self, name: &str) -> Option<FlagKind> {
        self.local.lookup(name).map(|c| c.kind())
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.local.is_set(name)
    }

    pub fn bool(&self, name: &str) -> bool {
        bool_of(self.local, name)
    }

    /// Reads a boolean-default-true flag; `false` when not declared.
    pub fn bool_t(&self, name: &str) -> bool {
        bool_of(self.local, name)
    }

    pub fn string(&self, name: &str) -> &'r str {
        string_of(self.local, name)
    }

    pub fn int(&self, name: &str) -> i64 {
        int_of(self.local, name)
    }

    pub fn float(&self, name: &str) -> f64 {
        float_of(self.local, name)
    }

    pub fn duration(&self, name: &str) -> Duration {
        duration_of(self.local, name)
    }

    pub fn generic(&self, name: &str) -> Option<&'r dyn GenericValue> {
        generic_of(self.local, name)
    }

    pub fn int_slice(&self, name: &str) -> &'r [i64] {
        int_slice_of(self.local, name)
    }

    pub fn string_slice(&self, name: &str) -> &'r [String] {
        string_slice_of(self.local, name)
    }

    pub fn global_is_set(&self, name: &str) -> bool {
        self.global.is_set(name)
    }

    pub fn global_bool(&self, name: &str) -> bool {
        bool_of(self.global, name)
    }

    pub fn global_bool_t(&self, name: &str) -> bool {
        bool_of(self.global, name)
    }

    pub fn global_string(&self, name: &str) -> &'r str {
        string_of(self.global, name)
    }

    pub fn global_int(&self, name: &str) -> i64 {
        int_of(self.global, name)
    }

    pub fn global_float(&self, name: &str) -> f64 {
        float_of(self.global, name)
    }

    pub fn global_duration(&self, name: &str) -> Duration {
        duration_of(self.global, name)
    }

    pub fn global_generic(&self, name: &str) -> Option<&'r dyn GenericValue> {
        generic_of(self.global, name)
    }

    pub fn global_int_slice(&self, name: &str) -> &'r [i64] {
        int_slice_of(self.global, name)
    }

    pub fn global_string_slice(&self, name: &str) -> &'r [String] {
        string_slice_of(self.global, name)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::flag::FlagSpec;
    use crate::registry::FlagSet;

    fn registry(specs: &[FlagSpec], tokens: &[&str]) -> Registry {
        let mut set = FlagSet::build("test", specs, &HashMap::new()).unwrap();
        set.parse(tokens).unwrap();
        set.normalize().unwrap()
    }

    #[test]
    fn test_args_helpers() {
        let raw = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let args = Args::new(&raw);
        assert!(args.present());
        assert_eq!(args.first(), Some("a"));
        assert_eq!(args.tail(), ["b", "c"]);
        assert_eq!(args.get(2), Some("c"));
        assert_eq!(args.len(), 3);

        let empty = Args::new(&[]);
        assert!(!empty.present());
        assert_eq!(empty.first(), None);
        assert!(empty.tail().is_empty());
    }

    #[test]
    fn test_typed_accessors() {
        let app = App::new("test");
        let specs = [
            FlagSpec::bool("myflag"),
            FlagSpec::bool_t("color"),
            FlagSpec::string("name", "bob"),
            FlagSpec::int("count", 0),
            FlagSpec::float("height", 1.5),
            FlagSpec::duration("wait", Duration::ZERO),
            FlagSpec::int_slice("id", vec![]),
            FlagSpec::string_slice::<&str>("tag", vec![]),
        ];
        let reg = registry(
            &specs,
            &[
                "-myflag", "-color", "-count", "12", "-wait", "1s", "-id", "4", "-tag", "x", "rest",
            ],
        );
        let ctx = Context::new(&app, &reg);

        assert!(ctx.bool("myflag"));
        assert!(!ctx.bool_t("color"));
        assert_eq!(ctx.string("name"), "bob");
        assert_eq!(ctx.int("count"), 12);
        assert_eq!(ctx.float("height"), 1.5);
        assert_eq!(ctx.duration("wait"), Duration::from_secs(1));
        assert_eq!(ctx.int_slice("id"), [4]);
        assert_eq!(ctx.string_slice("tag"), ["x"]);
        assert_eq!(ctx.args().first(), Some("rest"));
        assert!(ctx.is_set("count"));
        assert!(!ctx.is_set("name"));
    }

    #[test]
    fn test_missing_and_mismatched_names_yield_zero_values() {
        let app = App::new("test");
        let reg = registry(&[FlagSpec::string("name", "bob")], &[]);
        let ctx = Context::new(&app, &reg);

        assert!(!ctx.bool("nope"));
        assert!(!ctx.bool_t("nope"));
        assert_eq!(ctx.string("nope"), "");
        assert_eq!(ctx.int("name"), 0);
        assert_eq!(ctx.float("name"), 0.0);
        assert_eq!(ctx.duration("name"), Duration::ZERO);
        assert!(ctx.generic("name").is_none());
        assert!(ctx.int_slice("name").is_empty());
        assert!(ctx.string_slice("name").is_empty());
    }

    #[test]
    fn test_local_and_global_are_never_merged() {
        let app = App::new("test");
        let global = registry(
            &[FlagSpec::string("region", "eu"), FlagSpec::int("shared", 1)],
            &["-shared", "10"],
        );
        let local = registry(&[FlagSpec::int("shared", 2)], &[]);
        let root = Context::new(&app, &global);
        let command = Command::new("deploy");
        let ctx = root.for_command(&command, &local);

        assert_eq!(ctx.string("region"), "");
        assert_eq!(ctx.global_string("region"), "eu");
        assert_eq!(ctx.int("shared"), 2);
        assert_eq!(ctx.global_int("shared"), 10);
        assert!(ctx.global_is_set("shared"));
        assert_eq!(ctx.command().map(|c| c.name.as_str()), Some("deploy"));
    }
}
