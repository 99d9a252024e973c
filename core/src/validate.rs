//! Command tree validation.
//!
//! Catches structural mistakes in an [`App`] before any argument is parsed:
//! empty names, flag names that could never match, duplicate flags within
//! one scope and duplicate commands or subcommands.
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::*;
//!
//! let app = App::new("todo")
//!     .with_flag(FlagSpec::bool("verbose, V"))
//!     .with_command(Command::new("add"));
//! assert!(validate_app(&app).is_empty());
//!
//! // Invalid: the same command declared twice
//! let bad = App::new("todo")
//!     .with_command(Command::new("add"))
//!     .with_command(Command::new("add"));
//! assert_eq!(validate_app(&bad), vec![ValidationError::DuplicateCommand("add".into())]);
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::registry::check_name;
use crate::{App, Command, FlagSpec};

/// Command tree validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// App name is empty or whitespace-only.
    #[error("app name cannot be empty")]
    EmptyAppName,
    /// A command or subcommand has an empty name.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// A command or subcommand name contains whitespace or starts with `-`.
    #[error("invalid command name: {0:?}")]
    InvalidCommandName(String),
    /// A flag declaration has no names after splitting.
    #[error("flag must define at least one name")]
    MissingFlagName,
    /// A flag name starts with `-`, contains `=` or whitespace.
    #[error("invalid flag name: {0:?}")]
    InvalidFlagName(String),
    /// Two flags in the same scope share a name.
    #[error("duplicate flag in scope: {0}")]
    DuplicateFlag(String),
    /// Two commands share a name.
    #[error("duplicate command: {0}")]
    DuplicateCommand(String),
    /// Two subcommands of one command share a name.
    #[error("duplicate subcommand in {command}: {name}")]
    DuplicateSubcommand { command: String, name: String },
}

/// Validates the whole tree, stopping at the first problem.
pub fn validate_app(app: &App) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if app.name.trim().is_empty() {
        errors.push(ValidationError::EmptyAppName);
        return errors;
    }

    errors.extend(validate_flags(&app.flags));
    if !errors.is_empty() {
        return errors;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for command in &app.commands {
        if let Some(err) = check_command_name(&command.name) {
            errors.push(err);
            return errors;
        }
        if !seen.insert(command.name.as_str()) {
            errors.push(ValidationError::DuplicateCommand(command.name.clone()));
            return errors;
        }
        errors.extend(validate_command(command));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

fn validate_command(command: &Command) -> Vec<ValidationError> {
    let mut errors = validate_flags(&command.flags);
    if !errors.is_empty() {
        return errors;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for sub in &command.subcommands {
        if let Some(err) = check_command_name(&sub.name) {
            errors.push(err);
            return errors;
        }
        if !seen.insert(sub.name.as_str()) {
            errors.push(ValidationError::DuplicateSubcommand {
                command: command.name.clone(),
                name: sub.name.clone(),
            });
            return errors;
        }
        errors.extend(validate_flags(&sub.flags));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

fn check_command_name(name: &str) -> Option<ValidationError> {
    if name.trim().is_empty() {
        return Some(ValidationError::EmptyCommandName);
    }
    if name.starts_with('-') || name.contains(char::is_whitespace) {
        return Some(ValidationError::InvalidCommandName(name.to_string()));
    }
    None
}

fn validate_flags(flags: &[FlagSpec]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for flag in flags {
        if flag.names.is_empty() {
            errors.push(ValidationError::MissingFlagName);
            return errors;
        }

        for name in &flag.names {
            if check_name(name).is_err() {
                errors.push(ValidationError::InvalidFlagName(name.clone()));
                return errors;
            }
            if !seen.insert(name.as_str()) {
                errors.push(ValidationError::DuplicateFlag(name.clone()));
                return errors;
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Subcommand;

    #[test]
    fn test_validate_accepts_valid_tree() {
        let app = App::new("todo")
            .with_flag(FlagSpec::bool("verbose, V"))
            .with_command(
                Command::new("tag")
                    .with_flag(FlagSpec::bool("verbose"))
                    .with_subcommand(Subcommand::new("add").with_flag(FlagSpec::bool("verbose"))),
            );
        assert!(validate_app(&app).is_empty());
    }

    #[test]
    fn test_validate_rejects_empty_app_name() {
        assert_eq!(
            validate_app(&App::new("  ")),
            vec![ValidationError::EmptyAppName]
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_alias_across_flags() {
        let app = App::new("todo")
            .with_flag(FlagSpec::bool("verbose, v"))
            .with_flag(FlagSpec::string("version-file, v", ""));
        assert_eq!(
            validate_app(&app),
            vec![ValidationError::DuplicateFlag("v".into())]
        );
    }

    #[test]
    fn test_validate_rejects_bad_flag_names() {
        let app = App::new("todo").with_flag(FlagSpec::bool("--verbose"));
        assert_eq!(
            validate_app(&app),
            vec![ValidationError::InvalidFlagName("--verbose".into())]
        );

        let app = App::new("todo").with_flag(FlagSpec::bool(","));
        assert_eq!(validate_app(&app), vec![ValidationError::MissingFlagName]);
    }

    #[test]
    fn test_validate_flag_names_match_registry_rules() {
        for name in ["-v", "a=b", "two words", "tab\there"] {
            let app = App::new("todo").with_command(
                Command::new("add").with_flag(FlagSpec::string(name, "")),
            );
            assert_eq!(
                validate_app(&app),
                vec![ValidationError::InvalidFlagName(name.into())]
            );
            assert!(check_name(name).is_err());
        }
        assert!(check_name("dry-run").is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_subcommand() {
        let app = App::new("todo").with_command(
            Command::new("tag")
                .with_subcommand(Subcommand::new("add"))
                .with_subcommand(Subcommand::new("add")),
        );
        assert_eq!(
            validate_app(&app),
            vec![ValidationError::DuplicateSubcommand {
                command: "tag".into(),
                name: "add".into(),
            }]
        );
    }

    #[test]
    fn test_validate_rejects_bad_command_names() {
        let app = App::new("todo").with_command(Command::new(""));
        assert_eq!(validate_app(&app), vec![ValidationError::EmptyCommandName]);

        let app = App::new("todo").with_command(Command::new("-x"));
        assert_eq!(
            validate_app(&app),
            vec![ValidationError::InvalidCommandName("-x".into())]
        );
    }
}
