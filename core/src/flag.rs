//! Flag declarations.
//!
//! A [`FlagSpec`] describes one logical option: its alias names, its
//! [`FlagKind`], a default [`FlagValue`], a description and an optional
//! environment variable that overrides the default. Specs are immutable
//! configuration; every dispatch level seeds fresh storage from them.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::duration::{format_duration, parse_duration};
use crate::env::EnvSource;

/// A user-defined value type parsed from text.
///
/// Implementors only need `Display`, `Debug`, `Clone` and [`set`](Self::set);
/// boxing and cloning come from a blanket impl.
///
/// # Examples
///
/// ```
/// use std::fmt;
/// use cmdtree_core::GenericValue;
///
/// #[derive(Debug, Clone, Default)]
/// struct Port(u16);
///
/// impl fmt::Display for Port {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "{}", self.0)
///     }
/// }
///
/// impl GenericValue for Port {
///     fn set(&mut self, value: &str) -> Result<(), String> {
///         self.0 = value.parse().map_err(|e| format!("{e}"))?;
///         Ok(())
///     }
/// }
///
/// let mut port = Port::default();
/// port.set("8080").unwrap();
/// assert_eq!(port.to_string(), "8080");
/// ```
pub trait GenericValue: fmt::Display + fmt::Debug + GenericClone {
    /// Replaces the value with the parse of `value`.
    fn set(&mut self, value: &str) -> Result<(), String>;
}

/// Object-safe cloning for boxed [`GenericValue`]s.
pub trait GenericClone {
    fn clone_box(&self) -> Box<dyn GenericValue>;
}

impl<T: GenericValue + Clone + 'static> GenericClone for T {
    fn clone_box(&self) -> Box<dyn GenericValue> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn GenericValue> {
    fn clone(&self) -> Self {
        (**self).clone_box()
    }
}

/// The closed set of flag kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlagKind {
    /// Presence sets `true`.
    Bool,
    /// Defaults to `true`; presence sets `false`.
    BoolT,
    String,
    Int,
    Float,
    Duration,
    /// A [`GenericValue`] supplied by the caller.
    Generic,
    /// Repeated integer flag; every occurrence is kept.
    IntSlice,
    /// Repeated string flag; every occurrence is kept.
    StringSlice,
}

impl FlagKind {
    /// Returns `true` if the flag consumes a value token.
    pub fn takes_value(self) -> bool {
        !matches!(self, FlagKind::Bool | FlagKind::BoolT)
    }

    /// Returns `true` for kinds that accumulate occurrences.
    pub fn is_list(self) -> bool {
        matches!(self, FlagKind::IntSlice | FlagKind::StringSlice)
    }

    /// Returns `true` for both boolean kinds.
    pub fn is_bool(self) -> bool {
        matches!(self, FlagKind::Bool | FlagKind::BoolT)
    }

    /// Parses a whole textual value for this kind.
    ///
    /// List kinds read a comma-separated list. Generic kinds parse into a
    /// copy of `template`.
    pub(crate) fn parse(self, text: &str, template: &FlagValue) -> Result<FlagValue, String> {
        match self {
            FlagKind::Bool | FlagKind::BoolT => parse_bool(text).map(FlagValue::Bool),
            FlagKind::String => Ok(FlagValue::String(text.to_string())),
            FlagKind::Int => parse_int(text).map(FlagValue::Int),
            FlagKind::Float => parse_float(text).map(FlagValue::Float),
            FlagKind::Duration => parse_duration(text).map(FlagValue::Duration),
            FlagKind::Generic => {
                let mut value = match template {
                    FlagValue::Generic(inner) => inner.clone(),
                    other => return Err(format!("generic flag seeded with {other:?}")),
                };
                value.set(text)?;
                Ok(FlagValue::Generic(value))
            }
            FlagKind::IntSlice => split_list(text)
                .map(parse_int)
                .collect::<Result<Vec<_>, _>>()
                .map(FlagValue::IntList),
            FlagKind::StringSlice => Ok(FlagValue::StringList(
                split_list(text).map(String::from).collect(),
            )),
        }
    }
}

fn split_list(text: &str) -> impl Iterator<Item = &str> {
    text.split(',').map(str::trim).filter(|item| !item.is_empty())
}

/// Parses the boolean spellings `1 t T TRUE true True 0 f F FALSE false False`.
pub fn parse_bool(text: &str) -> Result<bool, String> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(format!("invalid boolean {text:?}")),
    }
}

pub(crate) fn parse_int(text: &str) -> Result<i64, String> {
    text.parse::<i64>().map_err(|e| e.to_string())
}

pub(crate) fn parse_float(text: &str) -> Result<f64, String> {
    text.parse::<f64>().map_err(|e| e.to_string())
}

/// Typed storage for one flag.
#[derive(Debug, Clone)]
pub enum FlagValue {
    Bool(bool),
    String(String),
    Int(i64),
    Float(f64),
    Duration(Duration),
    Generic(Box<dyn GenericValue>),
    IntList(Vec<i64>),
    StringList(Vec<String>),
}

impl PartialEq for FlagValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FlagValue::Bool(a), FlagValue::Bool(b)) => a == b,
            (FlagValue::String(a), FlagValue::String(b)) => a == b,
            (FlagValue::Int(a), FlagValue::Int(b)) => a == b,
            (FlagValue::Float(a), FlagValue::Float(b)) => a == b,
            (FlagValue::Duration(a), FlagValue::Duration(b)) => a == b,
            (FlagValue::Generic(a), FlagValue::Generic(b)) => a.to_string() == b.to_string(),
            (FlagValue::IntList(a), FlagValue::IntList(b)) => a == b,
            (FlagValue::StringList(a), FlagValue::StringList(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Bool(v) => write!(f, "{v}"),
            FlagValue::String(v) => f.write_str(v),
            FlagValue::Int(v) => write!(f, "{v}"),
            FlagValue::Float(v) => write!(f, "{v}"),
            FlagValue::Duration(v) => f.write_str(&format_duration(*v)),
            FlagValue::Generic(v) => write!(f, "{v}"),
            FlagValue::IntList(items) => {
                let items: Vec<String> = items.iter().map(i64::to_string).collect();
                f.write_str(&items.join(","))
            }
            FlagValue::StringList(items) => f.write_str(&items.join(",")),
        }
    }
}

/// Splits a comma-separated name list into trimmed, non-empty aliases.
///
/// ```
/// use cmdtree_core::split_names;
///
/// assert_eq!(split_names("serve, s"), vec!["serve", "s"]);
/// assert!(split_names(" , ").is_empty());
/// ```
pub fn split_names(names: &str) -> Vec<String> {
    names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// Declaration of one logical flag.
///
/// Construct with one of the kind constructors, then chain
/// [`with_description`](Self::with_description) and
/// [`with_env`](Self::with_env).
///
/// # Examples
///
/// ```
/// use cmdtree_core::{FlagKind, FlagSpec};
///
/// let serve = FlagSpec::string("serve, s", "localhost")
///     .with_description("address to listen on")
///     .with_env("APP_SERVE");
/// assert_eq!(serve.names, vec!["serve", "s"]);
/// assert_eq!(serve.kind, FlagKind::String);
/// assert_eq!(serve.to_string(), "-serve, -s 'localhost'\taddress to listen on [$APP_SERVE]");
/// ```
#[derive(Debug, Clone)]
pub struct FlagSpec {
    /// Alias names, primary name first.
    pub names: Vec<String>,
    pub kind: FlagKind,
    /// Value used when neither the environment nor the command line supply one.
    pub default: FlagValue,
    pub description: String,
    /// Environment variable that overrides the default.
    pub env_key: Option<String>,
}

impl FlagSpec {
    fn new(names: &str, kind: FlagKind, default: FlagValue) -> Self {
        Self {
            names: split_names(names),
            kind,
            default,
            description: String::new(),
            env_key: None,
        }
    }

    /// Boolean flag, `false` unless present.
    pub fn bool(names: &str) -> Self {
        Self::new(names, FlagKind::Bool, FlagValue::Bool(false))
    }

    /// Boolean flag, `true` unless present.
    pub fn bool_t(names: &str) -> Self {
        Self::new(names, FlagKind::BoolT, FlagValue::Bool(true))
    }

    pub fn string(names: &str, default: impl Into<String>) -> Self {
        Self::new(names, FlagKind::String, FlagValue::String(default.into()))
    }

    pub fn int(names: &str, default: i64) -> Self {
        Self::new(names, FlagKind::Int, FlagValue::Int(default))
    }

    pub fn float(names: &str, default: f64) -> Self {
        Self::new(names, FlagKind::Float, FlagValue::Float(default))
    }

    pub fn duration(names: &str, default: Duration) -> Self {
        Self::new(names, FlagKind::Duration, FlagValue::Duration(default))
    }

    /// Flag backed by a caller-supplied [`GenericValue`]; `value` is the default.
    pub fn generic(names: &str, value: impl GenericValue + 'static) -> Self {
        Self::new(names, FlagKind::Generic, FlagValue::Generic(Box::new(value)))
    }

    pub fn int_slice(names: &str, default: Vec<i64>) -> Self {
        Self::new(names, FlagKind::IntSlice, FlagValue::IntList(default))
    }

    pub fn string_slice<S: Into<String>>(names: &str, default: Vec<S>) -> Self {
        let default = default.into_iter().map(Into::into).collect();
        Self::new(names, FlagKind::StringSlice, FlagValue::StringList(default))
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    /// Sets the environment variable that overrides the default.
    pub fn with_env(mut self, key: &str) -> Self {
        self.env_key = Some(key.to_string());
        self
    }

    /// Returns the primary (first) name.
    pub fn name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or("")
    }

    /// Checks if any alias equals `name`.
    pub fn has_name(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Resolves the starting value: the environment override when present
    /// and parseable, otherwise the default.
    pub fn seed(&self, env: &dyn EnvSource) -> FlagValue {
        let Some(key) = self.env_key.as_deref() else {
            return self.default.clone();
        };
        match env.var(key) {
            Some(raw) if !raw.is_empty() => match self.kind.parse(&raw, &self.default) {
                Ok(value) => {
                    debug!(flag = self.name(), env = key, "seeded from environment");
                    value
                }
                Err(e) => {
                    debug!(flag = self.name(), env = key, error = %e, "ignoring unparsable environment override");
                    self.default.clone()
                }
            },
            _ => self.default.clone(),
        }
    }

    /// Returns the names and quoted default, e.g. `-serve, -s 'localhost'`.
    ///
    /// Booleans and empty defaults show names only.
    pub fn synopsis(&self) -> String {
        let default = self.default.to_string();
        if self.kind.is_bool() || default.is_empty() {
            self.prefixed_names()
        } else {
            format!("{} '{}'", self.prefixed_names(), default)
        }
    }

    /// Returns the names rendered as `-a, -b`.
    pub fn prefixed_names(&self) -> String {
        self.names
            .iter()
            .map(|n| format!("-{n}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FlagSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.synopsis(), self.description)?;
        if let Some(key) = &self.env_key {
            write!(f, " [${key}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[derive(Debug, Clone, Default)]
    struct Csv(Vec<String>);

    impl fmt::Display for Csv {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0.join(","))
        }
    }

    impl GenericValue for Csv {
        fn set(&mut self, value: &str) -> Result<(), String> {
            self.0 = value.split(',').map(String::from).collect();
            Ok(())
        }
    }

    #[test]
    fn test_names_are_split_and_trimmed() {
        let flag = FlagSpec::bool("help, h");
        assert_eq!(flag.names, vec!["help", "h"]);
        assert_eq!(flag.name(), "help");
        assert!(flag.has_name("h"));
        assert!(!flag.has_name("he"));
    }

    #[test]
    fn test_bool_help_output() {
        assert_eq!(FlagSpec::bool("help").to_string(), "-help\t");
        assert_eq!(FlagSpec::bool("h").to_string(), "-h\t");
    }

    #[test]
    fn test_string_help_output() {
        assert_eq!(FlagSpec::string("help", "").to_string(), "-help\t");
        assert_eq!(
            FlagSpec::string("test", "Something").to_string(),
            "-test 'Something'\t"
        );
    }

    #[test]
    fn test_numeric_help_output() {
        assert_eq!(FlagSpec::int("h", 0).to_string(), "-h '0'\t");
        assert_eq!(FlagSpec::float("h", 0.0).to_string(), "-h '0'\t");
        assert_eq!(
            FlagSpec::duration("h", Duration::ZERO).to_string(),
            "-h '0s'\t"
        );
    }

    #[test]
    fn test_env_hint_suffix() {
        for flag in [
            FlagSpec::string("test", "x").with_env("APP_FOO"),
            FlagSpec::int("test", 0).with_env("APP_FOO"),
            FlagSpec::bool_t("test").with_env("APP_FOO"),
        ] {
            assert!(flag.to_string().ends_with(" [$APP_FOO]"), "{flag}");
        }
    }

    #[test]
    fn test_seed_prefers_environment() {
        let vars = env(&[("APP_COUNT", "7"), ("APP_TIMEOUT", "2h3m6s")]);
        let count = FlagSpec::int("count", 1).with_env("APP_COUNT");
        assert_eq!(count.seed(&vars), FlagValue::Int(7));

        let timeout = FlagSpec::duration("timeout", Duration::ZERO).with_env("APP_TIMEOUT");
        assert_eq!(
            timeout.seed(&vars),
            FlagValue::Duration(Duration::from_secs(7386))
        );
    }

    #[test]
    fn test_seed_falls_back_on_bad_or_empty_environment() {
        let vars = env(&[("APP_COUNT", "lots"), ("APP_NAME", "")]);
        let count = FlagSpec::int("count", 1).with_env("APP_COUNT");
        assert_eq!(count.seed(&vars), FlagValue::Int(1));

        let name = FlagSpec::string("name", "bob").with_env("APP_NAME");
        assert_eq!(name.seed(&vars), FlagValue::String("bob".into()));

        let missing = FlagSpec::string("name", "bob").with_env("APP_MISSING");
        assert_eq!(missing.seed(&vars), FlagValue::String("bob".into()));
    }

    #[test]
    fn test_seed_lists_and_generic_from_environment() {
        let vars = env(&[("APP_IDS", "1, 2,3"), ("APP_TAGS", "a,b"), ("APP_CSV", "x,y")]);
        let ids = FlagSpec::int_slice("ids", vec![]).with_env("APP_IDS");
        assert_eq!(ids.seed(&vars), FlagValue::IntList(vec![1, 2, 3]));

        let tags = FlagSpec::string_slice::<&str>("tags", vec![]).with_env("APP_TAGS");
        assert_eq!(
            tags.seed(&vars),
            FlagValue::StringList(vec!["a".into(), "b".into()])
        );

        let csv = FlagSpec::generic("csv", Csv::default()).with_env("APP_CSV");
        assert_eq!(csv.seed(&vars).to_string(), "x,y");
        // The declared default is never mutated by seeding.
        assert_eq!(csv.default.to_string(), "");
    }

    #[test]
    fn test_parse_bool_spellings() {
        for text in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(text), Ok(true));
        }
        for text in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(text), Ok(false));
        }
        assert!(parse_bool("yes").is_err());
    }
}
