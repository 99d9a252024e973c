//! Output formatting for help topics.

use std::fmt;
use std::str::FromStr;

use cmdtree_core::{AppHelp, CommandHelp, CommandSummary, FlagHelp, HelpTopic, render_text};
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};

/// Supported output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
    Table,
    #[default]
    Text,
}

impl OutputFormat {
    /// Returns `true` for formats meant to be read by people.
    pub fn is_prose(self) -> bool {
        matches!(
            self,
            OutputFormat::Markdown | OutputFormat::Table | OutputFormat::Text
        )
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "table" => Ok(OutputFormat::Table),
            "text" | "plain" => Ok(OutputFormat::Text),
            _ => Err(RenderError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Table => "table",
            OutputFormat::Text => "text",
        };
        f.write_str(name)
    }
}

/// Formats a help topic in the requested output format.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{HelpTopic, VersionInfo};
/// use cmdtree_render::{OutputFormat, format_topic};
///
/// let topic = HelpTopic::Version(VersionInfo { name: "todo".into(), version: "1.0.0".into() });
/// let json = format_topic(&topic, OutputFormat::Json).unwrap();
/// assert!(json.contains("\"topic\": \"version\""));
/// assert_eq!(format_topic(&topic, OutputFormat::Text).unwrap(), "todo version 1.0.0\n");
/// ```
pub fn format_topic(topic: &HelpTopic, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(topic)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(topic)?),
        OutputFormat::Markdown => Ok(topic_to_markdown(topic)),
        OutputFormat::Table => Ok(topic_to_table(topic)),
        OutputFormat::Text => Ok(render_text(topic)),
    }
}

fn flag_description(flag: &FlagHelp) -> String {
    match &flag.env_key {
        Some(key) if flag.description.is_empty() => format!("[${key}]"),
        Some(key) => format!("{} [${key}]", flag.description),
        None => flag.description.clone(),
    }
}

fn flag_names(flag: &FlagHelp) -> String {
    flag.names
        .iter()
        .map(|n| format!("-{n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn markdown_commands(out: &mut String, heading: &str, commands: &[CommandSummary]) {
    if commands.is_empty() {
        return;
    }
    out.push_str(&format!("## {heading}\n\n"));
    out.push_str("| Command | Description |\n");
    out.push_str("|---------|-------------|\n");
    for command in commands {
        out.push_str(&format!("| `{}` | {} |\n", command.name, command.summary));
    }
    out.push('\n');
}

fn markdown_flags(out: &mut String, flags: &[FlagHelp]) {
    if flags.is_empty() {
        return;
    }
    out.push_str("## Options\n\n");
    out.push_str("| Flag | Default | Description |\n");
    out.push_str("|------|---------|-------------|\n");
    for flag in flags {
        let default = if flag.default.is_empty() {
            String::new()
        } else {
            format!("`{}`", flag.default)
        };
        out.push_str(&format!(
            "| `{}` | {default} | {} |\n",
            flag_names(flag),
            flag_description(flag)
        ));
    }
    out.push('\n');
}

fn app_to_markdown(app: &AppHelp) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", app.name));
    if !app.description.is_empty() {
        out.push_str(&format!("{}\n\n", app.description));
    }
    out.push_str(&format!("**Version:** {}\n\n", app.version));
    out.push_str(&format!("## Usage\n\n```\n{}\n```\n\n", app.usage));

    markdown_commands(&mut out, "Commands", &app.commands);
    markdown_flags(&mut out, &app.flags);

    out
}

fn command_to_markdown(command: &CommandHelp) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", command.path.join(" ")));
    if !command.summary.is_empty() {
        out.push_str(&format!("{}\n\n", command.summary));
    }
    if !command.usage.is_empty() {
        out.push_str(&format!("## Usage\n\n```\n{}\n```\n\n", command.usage));
    }
    if !command.description.is_empty() {
        out.push_str(&format!("## Description\n\n{}\n\n", command.description));
    }

    markdown_commands(&mut out, "Subcommands", &command.subcommands);
    markdown_flags(&mut out, &command.flags);

    out
}

fn topic_to_markdown(topic: &HelpTopic) -> String {
    match topic {
        HelpTopic::App(app) => app_to_markdown(app),
        HelpTopic::Command(command) => command_to_markdown(command),
        HelpTopic::Version(info) => format!("**{}** version {}\n", info.name, info.version),
        HelpTopic::UnknownTopic { name } => format!("No help topic for `{name}`\n"),
    }
}

fn table_commands(out: &mut String, heading: &str, commands: &[CommandSummary]) {
    if commands.is_empty() {
        return;
    }
    out.push_str(&format!("\n{heading}:\n"));
    let width = commands.iter().map(|c| c.name.len()).max().unwrap_or(4);
    for command in commands {
        out.push_str(&format!(
            "  {:<width$}  {}\n",
            command.name,
            command.summary,
            width = width
        ));
    }
}

fn table_flags(out: &mut String, flags: &[FlagHelp]) {
    if flags.is_empty() {
        return;
    }
    out.push_str("\nFlags:\n");
    let name_width = flags.iter().map(|f| flag_names(f).len()).max().unwrap_or(4);
    let kind_width = flags
        .iter()
        .map(|f| format!("{:?}", f.kind).len())
        .max()
        .unwrap_or(4);

    for flag in flags {
        let kind = format!("{:?}", flag.kind);
        let mut line = format!(
            "  {:<name_width$}  {:<kind_width$}",
            flag_names(flag),
            kind,
            name_width = name_width,
            kind_width = kind_width
        );
        if !flag.default.is_empty() {
            line.push_str(&format!("  [default: {}]", flag.default));
        }
        let desc = flag_description(flag);
        if !desc.is_empty() {
            line.push_str(&format!("  {desc}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

fn topic_to_table(topic: &HelpTopic) -> String {
    let mut out = String::new();

    match topic {
        HelpTopic::App(app) => {
            out.push_str(&format!("App: {}  Version: {}\n", app.name, app.version));
            if !app.description.is_empty() {
                out.push_str(&format!("  {}\n", app.description));
            }
            out.push_str(&format!("  Usage: {}\n", app.usage));
            table_commands(&mut out, "Commands", &app.commands);
            table_flags(&mut out, &app.flags);
        }
        HelpTopic::Command(command) => {
            out.push_str(&format!("Command: {}\n", command.path.join(" ")));
            if !command.summary.is_empty() {
                out.push_str(&format!("  {}\n", command.summary));
            }
            if !command.usage.is_empty() {
                out.push_str(&format!("  Usage: {}\n", command.usage));
            }
            table_commands(&mut out, "Subcommands", &command.subcommands);
            table_flags(&mut out, &command.flags);
        }
        HelpTopic::Version(info) => {
            out.push_str(&format!("App: {}  Version: {}\n", info.name, info.version));
        }
        HelpTopic::UnknownTopic { name } => {
            out.push_str(&format!("Unknown topic: {name}\n"));
        }
    }

    out
}
