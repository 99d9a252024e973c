//! Flag storage, argument parsing and alias normalization.
//!
//! Each dispatch level builds a [`FlagSet`] from its [`FlagSpec`]s, parses
//! its slice of the argument vector into it, then consumes it with
//! [`FlagSet::normalize`] to obtain an immutable [`Registry`].
//!
//! All aliases of one spec share a single [`Cell`]; the alias index maps
//! every name to it. Normalization therefore never copies values between
//! aliases. It validates that the parse used the group consistently.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::env::EnvSource;
use crate::error::FlagError;
use crate::flag::{FlagKind, FlagSpec, FlagValue, parse_bool, parse_int};

/// Storage shared by every alias of one flag.
#[derive(Debug, Clone)]
pub struct Cell {
    names: Vec<String>,
    kind: FlagKind,
    seed: FlagValue,
    value: FlagValue,
    visited: Vec<String>,
}

impl Cell {
    fn new(spec: &FlagSpec, seed: FlagValue) -> Self {
        Self {
            names: spec.names.clone(),
            kind: spec.kind,
            value: seed.clone(),
            seed,
            visited: Vec::new(),
        }
    }

    /// All alias names of the group, primary first.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn kind(&self) -> FlagKind {
        self.kind
    }

    /// The resolved value.
    pub fn value(&self) -> &FlagValue {
        &self.value
    }

    /// The value before parsing: environment override, else default.
    pub fn seed(&self) -> &FlagValue {
        &self.seed
    }

    /// Returns `true` if the argument vector supplied this flag.
    pub fn is_set(&self) -> bool {
        !self.visited.is_empty()
    }

    /// Aliases used on the command line, in first-use order.
    pub fn visited(&self) -> &[String] {
        &self.visited
    }

    fn visit(&mut self, alias: &str) {
        if !self.visited.iter().any(|v| v == alias) {
            self.visited.push(alias.to_string());
        }
    }

    fn set_text(&mut self, text: &str) -> Result<(), String> {
        if self.kind.is_list() {
            let first = self.visited.is_empty();
            match &mut self.value {
                FlagValue::IntList(items) => {
                    let item = parse_int(text)?;
                    if first {
                        items.clear();
                    }
                    items.push(item);
                }
                FlagValue::StringList(items) => {
                    if first {
                        items.clear();
                    }
                    items.push(text.to_string());
                }
                other => return Err(format!("list flag holds {other:?}")),
            }
            return Ok(());
        }
        self.value = self.kind.parse(text, &self.value)?;
        Ok(())
    }
}

/// Rejects names that could never be typed as a flag token.
pub(crate) fn check_name(name: &str) -> Result<(), FlagError> {
    if name.starts_with('-') || name.contains('=') || name.contains(char::is_whitespace) {
        return Err(FlagError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Mutable flag storage for one dispatch level, before normalization.
#[derive(Debug, Clone)]
pub struct FlagSet {
    name: String,
    cells: Vec<Cell>,
    index: HashMap<String, usize>,
    args: Vec<String>,
}

impl FlagSet {
    /// Registers every alias of every spec, seeding each group from the
    /// environment or its default.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::DuplicateFlag`] if two specs share a name,
    /// [`FlagError::EmptyName`] for a spec without names and
    /// [`FlagError::InvalidName`] for names that cannot appear on a command
    /// line.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use cmdtree_core::{FlagSet, FlagSpec, FlagValue};
    ///
    /// let specs = [FlagSpec::string("serve, s", "localhost")];
    /// let mut set = FlagSet::build("app", &specs, &HashMap::new()).unwrap();
    /// set.parse(&["-s", "0.0.0.0", "rest"]).unwrap();
    /// let registry = set.normalize().unwrap();
    ///
    /// assert_eq!(registry.value("serve"), Some(&FlagValue::String("0.0.0.0".into())));
    /// assert_eq!(registry.args(), ["rest"]);
    /// ```
    pub fn build(name: &str, specs: &[FlagSpec], env: &dyn EnvSource) -> Result<Self, FlagError> {
        let mut cells = Vec::with_capacity(specs.len());
        let mut index = HashMap::new();

        for spec in specs {
            if spec.names.is_empty() {
                return Err(FlagError::EmptyName);
            }
            for alias in &spec.names {
                check_name(alias)?;
                if index.insert(alias.clone(), cells.len()).is_some() {
                    return Err(FlagError::DuplicateFlag(alias.clone()));
                }
            }
            cells.push(Cell::new(spec, spec.seed(env)));
        }

        debug!(level = name, flags = cells.len(), "built flag set");
        Ok(Self {
            name: name.to_string(),
            cells,
            index,
            args: Vec::new(),
        })
    }

    /// Parses flag tokens until the first positional token or `--`.
    ///
    /// Everything from the first positional onwards becomes the residual
    /// argument list.
    pub fn parse<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<(), FlagError> {
        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i].as_ref();
            if token.len() < 2 || !token.starts_with('-') {
                break;
            }

            let mut body = &token[1..];
            if let Some(rest) = body.strip_prefix('-') {
                if rest.is_empty() {
                    // "--" terminates flags
                    i += 1;
                    break;
                }
                body = rest;
            }
            if body.is_empty() || body.starts_with('-') || body.starts_with('=') {
                return Err(FlagError::BadSyntax(token.to_string()));
            }

            let (name, inline) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (body, None),
            };
            let Some(&slot) = self.index.get(name) else {
                return Err(FlagError::UnknownFlag(name.to_string()));
            };
            i += 1;

            let cell = &mut self.cells[slot];
            let invalid = |text: &str, reason: String| FlagError::InvalidValue {
                flag: name.to_string(),
                value: text.to_string(),
                reason,
            };

            if cell.kind.is_bool() {
                let value = match inline {
                    Some(text) => parse_bool(text).map_err(|reason| invalid(text, reason))?,
                    None => cell.kind == FlagKind::Bool,
                };
                cell.value = FlagValue::Bool(value);
            } else {
                let text = match inline {
                    Some(text) => text,
                    None => {
                        let Some(next) = tokens.get(i) else {
                            return Err(FlagError::MissingValue(name.to_string()));
                        };
                        i += 1;
                        next.as_ref()
                    }
                };
                cell.set_text(text).map_err(|reason| invalid(text, reason))?;
            }
            cell.visit(name);
        }

        self.args = tokens[i..].iter().map(|t| t.as_ref().to_string()).collect();
        Ok(())
    }

    /// Parses command-level tokens, allowing positionals before flags.
    ///
    /// Tokens before the first flag-like token are kept as leading
    /// positionals and the rest is parsed as flags, so
    /// `<positional> -flag value` behaves like `-flag value <positional>`.
    /// The residual list keeps the user's order. When the first token is one
    /// of `children`, nothing is reordered and parsing stops right there.
    pub fn parse_interspersed<S: AsRef<str>>(
        &mut self,
        tokens: &[S],
        children: &[&str],
    ) -> Result<(), FlagError> {
        let routes_to_child = tokens
            .first()
            .is_some_and(|t| children.contains(&t.as_ref()));
        let first_flag = tokens.iter().position(|t| t.as_ref().starts_with('-'));

        match first_flag {
            Some(split) if split > 0 && !routes_to_child => {
                self.parse(&tokens[split..])?;
                let mut args: Vec<String> =
                    tokens[..split].iter().map(|t| t.as_ref().to_string()).collect();
                args.append(&mut self.args);
                self.args = args;
                Ok(())
            }
            _ => self.parse(tokens),
        }
    }

    /// Reconciles alias groups and freezes the set.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::Normalization`] when two different aliases of
    /// one non-list flag were supplied, or when a generic value does not
    /// survive being handed to its sibling aliases in textual form. List
    /// flags accumulate occurrences from every alias.
    pub fn normalize(self) -> Result<Registry, FlagError> {
        for cell in &self.cells {
            if cell.visited.len() > 1 && !cell.kind.is_list() {
                return Err(FlagError::Normalization(format!(
                    "cannot use two forms of the same flag: {} {}",
                    cell.visited[0], cell.visited[1]
                )));
            }
            let Some(used) = cell.visited.first() else {
                continue;
            };
            if cell.names.len() < 2 {
                continue;
            }

            if cell.kind == FlagKind::Generic {
                let rendered = cell.value.to_string();
                if let Err(reason) = cell.kind.parse(&rendered, &cell.seed) {
                    let sibling = cell.names.iter().find(|n| *n != used).unwrap_or(used);
                    return Err(FlagError::Normalization(format!(
                        "invalid value {rendered:?} for flag -{sibling}: {reason}"
                    )));
                }
            }
            trace!(level = %self.name, flag = %used, aliases = ?cell.names, "normalized alias group");
        }

        Ok(Registry {
            name: self.name,
            cells: self.cells,
            index: self.index,
            args: self.args,
        })
    }
}

/// Immutable, normalized flag values plus residual positional arguments.
#[derive(Debug, Clone)]
pub struct Registry {
    name: String,
    cells: Vec<Cell>,
    index: HashMap<String, usize>,
    args: Vec<String>,
}

impl Registry {
    /// Name of the dispatch level that built this registry.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Finds the cell registered under any alias `name`.
    pub fn lookup(&self, name: &str) -> Option<&Cell> {
        self.index.get(name).map(|&slot| &self.cells[slot])
    }

    /// Returns the resolved value for `name`.
    pub fn value(&self, name: &str) -> Option<&FlagValue> {
        self.lookup(name).map(Cell::value)
    }

    /// Returns `true` if the argument vector supplied `name` or an alias of it.
    pub fn is_set(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(Cell::is_set)
    }

    /// Residual positional arguments.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Iterates over every registered alias.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cells
            .iter()
            .flat_map(|c| c.names.iter().map(String::as_str))
    }
}
