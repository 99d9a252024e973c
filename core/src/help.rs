//! Structural help data and the printer seam.
//!
//! Dispatch never formats help itself. It builds a [`HelpTopic`] snapshot of
//! the relevant part of the tree and hands it to the App's
//! [`HelpPrinter`]. [`TextPrinter`] is the default; other renderers plug in
//! through [`App::with_printer`](crate::App::with_printer).

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::app::App;
use crate::command::{Command, Subcommand};
use crate::flag::{FlagKind, FlagSpec};

/// Name of the built-in help pseudo-command.
pub const HELP_COMMAND: &str = "help";

/// Summary shown for the built-in help pseudo-command.
pub const HELP_SUMMARY: &str = "Shows a list of commands or help for one command";

/// One flag as shown in help output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagHelp {
    pub names: Vec<String>,
    pub kind: FlagKind,
    /// Default rendered as text; empty for booleans.
    pub default: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_key: Option<String>,
    /// Names plus quoted default, e.g. `-name, -n 'bob'`.
    pub synopsis: String,
}

impl From<&FlagSpec> for FlagHelp {
    fn from(spec: &FlagSpec) -> Self {
        Self {
            names: spec.names.clone(),
            kind: spec.kind,
            default: if spec.kind.is_bool() {
                String::new()
            } else {
                spec.default.to_string()
            },
            description: spec.description.clone(),
            env_key: spec.env_key.clone(),
            synopsis: spec.synopsis(),
        }
    }
}

/// Name and one-line summary of a command or subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSummary {
    pub name: String,
    pub summary: String,
}

/// Help for the whole application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppHelp {
    pub name: String,
    pub version: String,
    pub description: String,
    pub usage: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    pub commands: Vec<CommandSummary>,
    pub flags: Vec<FlagHelp>,
}

impl AppHelp {
    /// Snapshot of `app`, including built-in flags and the `help` pseudo-command.
    pub fn from_app(app: &App) -> Self {
        let mut commands: Vec<CommandSummary> = app
            .commands
            .iter()
            .map(|c| CommandSummary {
                name: c.name.clone(),
                summary: c.summary.clone(),
            })
            .collect();
        if app.command(HELP_COMMAND).is_none() {
            commands.push(CommandSummary {
                name: HELP_COMMAND.to_string(),
                summary: HELP_SUMMARY.to_string(),
            });
        }
        Self {
            name: app.name.clone(),
            version: app.version.clone(),
            description: app.description.clone(),
            usage: app.usage.clone(),
            author: app.author.clone(),
            email: app.email.clone(),
            commands,
            flags: app.root_flags().iter().map(FlagHelp::from).collect(),
        }
    }
}

/// Help for one command or subcommand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandHelp {
    /// Full invocation path, e.g. `["todo", "tag", "add"]`.
    pub path: Vec<String>,
    pub name: String,
    pub summary: String,
    pub usage: String,
    pub description: String,
    pub flags: Vec<FlagHelp>,
    pub subcommands: Vec<CommandSummary>,
}

impl CommandHelp {
    pub fn from_command(app: &App, command: &Command) -> Self {
        Self {
            path: vec![app.name.clone(), command.name.clone()],
            name: command.name.clone(),
            summary: command.summary.clone(),
            usage: command.usage.clone(),
            description: command.description.clone(),
            flags: command.flags.iter().map(FlagHelp::from).collect(),
            subcommands: command
                .subcommands
                .iter()
                .map(|s| CommandSummary {
                    name: s.name.clone(),
                    summary: s.summary.clone(),
                })
                .collect(),
        }
    }

    pub fn from_subcommand(app: &App, command: &Command, subcommand: &Subcommand) -> Self {
        Self {
            path: vec![
                app.name.clone(),
                command.name.clone(),
                subcommand.name.clone(),
            ],
            name: subcommand.name.clone(),
            summary: subcommand.summary.clone(),
            usage: subcommand.usage.clone(),
            description: subcommand.description.clone(),
            flags: subcommand.flags.iter().map(FlagHelp::from).collect(),
            subcommands: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub name: String,
    pub version: String,
}

impl VersionInfo {
    pub fn from_app(app: &App) -> Self {
        Self {
            name: app.name.clone(),
            version: app.version.clone(),
        }
    }
}

/// Everything dispatch may ask a printer to show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "topic", rename_all = "snake_case")]
pub enum HelpTopic {
    App(AppHelp),
    Command(CommandHelp),
    Version(VersionInfo),
    /// `help <name>` named nothing in the tree.
    UnknownTopic { name: String },
}

/// Output seam for help and version text.
pub trait HelpPrinter {
    fn print(&self, topic: &HelpTopic) -> io::Result<()>;
}

/// Default printer: plain text on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextPrinter;

impl HelpPrinter for TextPrinter {
    fn print(&self, topic: &HelpTopic) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(render_text(topic).as_bytes())?;
        out.flush()
    }
}

fn push_columns(out: &mut String, rows: &[(String, String)]) {
    let width = rows.iter().map(|(left, _)| left.len()).max().unwrap_or(0);
    for (left, right) in rows {
        if right.is_empty() {
            out.push_str(&format!("   {left}\n"));
        } else {
            out.push_str(&format!("   {left:<width$}  {right}\n"));
        }
    }
}

fn flag_rows(flags: &[FlagHelp]) -> Vec<(String, String)> {
    flags
        .iter()
        .map(|f| {
            let mut right = f.description.clone();
            if let Some(key) = &f.env_key {
                right.push_str(&format!(" [${key}]"));
            }
            (f.synopsis.clone(), right.trim_start().to_string())
        })
        .collect()
}

fn command_rows(commands: &[CommandSummary]) -> Vec<(String, String)> {
    commands
        .iter()
        .map(|c| (c.name.clone(), c.summary.clone()))
        .collect()
}

/// Renders a topic as plain text.
///
/// ```
/// use cmdtree_core::{render_text, HelpTopic, VersionInfo};
///
/// let topic = HelpTopic::Version(VersionInfo { name: "greet".into(), version: "1.2.0".into() });
/// assert_eq!(render_text(&topic), "greet version 1.2.0\n");
/// ```
pub fn render_text(topic: &HelpTopic) -> String {
    let mut out = String::new();
    match topic {
        HelpTopic::App(app) => {
            out.push_str(&format!("{}, v{}\n", app.name, app.version));
            if !app.description.is_empty() {
                out.push_str(&format!("{}\n", app.description));
            }
            out.push_str(&format!("\nUSAGE:\n   {}\n", app.usage));
            if !app.commands.is_empty() {
                out.push_str("\nCOMMANDS:\n");
                push_columns(&mut out, &command_rows(&app.commands));
                out.push_str(&format!(
                    "\n   Use '{} help <command> [<subcommand>]' for more\n   information about a command or subcommand.\n",
                    app.name
                ));
            }
            if !app.flags.is_empty() {
                out.push_str("\nOPTIONS:\n");
                push_columns(&mut out, &flag_rows(&app.flags));
            }
            if !app.author.is_empty() {
                out.push_str(&format!("\nAUTHOR:\n   {}", app.author));
                if !app.email.is_empty() {
                    out.push_str(&format!(" <{}>", app.email));
                }
                out.push('\n');
            }
        }
        HelpTopic::Command(command) => {
            out.push_str(&command.path.join(" "));
            if !command.summary.is_empty() {
                out.push_str(&format!(" - {}", command.summary));
            }
            out.push('\n');
            if !command.usage.is_empty() {
                out.push_str(&format!("\nUSAGE:\n   {}\n", command.usage));
            }
            if !command.description.is_empty() {
                out.push_str(&format!("\nDESCRIPTION:\n   {}\n", command.description));
            }
            if !command.subcommands.is_empty() {
                out.push_str("\nSUBCOMMANDS:\n");
                push_columns(&mut out, &command_rows(&command.subcommands));
            }
            if !command.flags.is_empty() {
                out.push_str("\nOPTIONS:\n");
                push_columns(&mut out, &flag_rows(&command.flags));
            }
        }
        HelpTopic::Version(info) => {
            out.push_str(&format!("{} version {}\n", info.name, info.version));
        }
        HelpTopic::UnknownTopic { name } => {
            out.push_str(&format!("No help topic for '{name}'\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_app() -> App {
        App::new("greet")
            .with_version("1.0.0")
            .with_flag(FlagSpec::string("name, n", "bob").with_description("a name to say"))
            .with_command(
                Command::new("describeit")
                    .with_summary("use it to see a description")
                    .with_usage("greet describeit")
                    .with_description("This is how we describe describeit the function")
                    .with_subcommand(Subcommand::new("deep").with_summary("go deeper")),
            )
    }

    #[test]
    fn test_app_help_lists_builtins() {
        let help = AppHelp::from_app(&sample_app());
        let names: Vec<&str> = help.commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["describeit", "help"]);
        let flags: Vec<&str> = help.flags.iter().map(|f| f.names[0].as_str()).collect();
        assert_eq!(flags, vec!["name", "help", "version"]);
    }

    #[test]
    fn test_render_app_text() {
        let text = render_text(&HelpTopic::App(AppHelp::from_app(&sample_app())));
        assert!(text.starts_with("greet, v1.0.0\nA new application\n"));
        assert!(text.contains("COMMANDS:\n   describeit  use it to see a description\n"));
        assert!(text.contains("-name, -n 'bob'  a name to say\n"));
        assert!(text.contains("Use 'greet help <command> [<subcommand>]'"));
    }

    #[test]
    fn test_render_app_author() {
        let text = render_text(&HelpTopic::App(AppHelp::from_app(&sample_app())));
        assert!(!text.contains("AUTHOR:"));

        let app = sample_app().with_author("Jeremy Saenz", "jeremy@example.com");
        let help = AppHelp::from_app(&app);
        assert!(render_text(&HelpTopic::App(help.clone()))
            .ends_with("\nAUTHOR:\n   Jeremy Saenz <jeremy@example.com>\n"));

        let json = serde_json::to_value(HelpTopic::App(help)).unwrap();
        assert_eq!(json["author"], "Jeremy Saenz");
        let bare = serde_json::to_value(HelpTopic::App(AppHelp::from_app(&sample_app()))).unwrap();
        assert!(bare.get("email").is_none());
    }

    #[test]
    fn test_render_command_text() {
        let app = sample_app();
        let help = CommandHelp::from_command(&app, &app.commands[0]);
        let text = render_text(&HelpTopic::Command(help));
        assert!(text.starts_with("greet describeit - use it to see a description\n"));
        assert!(text.contains("DESCRIPTION:\n   This is how we describe"));
        assert!(text.contains("SUBCOMMANDS:\n   deep  go deeper\n"));
    }

    #[test]
    fn test_topic_serializes_with_tag() {
        let topic = HelpTopic::UnknownTopic {
            name: "nope".into(),
        };
        let json = serde_json::to_value(&topic).unwrap();
        assert_eq!(json, serde_json::json!({"topic": "unknown_topic", "name": "nope"}));
    }
}
