//! Render configuration.
//!
//! Controls how help topics are turned into text: the output format,
//! whether environment variable hints are shown next to flags, and an
//! optional footer appended to human-readable output.
//!
//! # Example YAML
//!
//! ```yaml
//! format: markdown
//! show_env: true
//! footer: "Report bugs at https://example.com/issues"
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use cmdtree_core::{EnvSource, FlagHelp, HelpTopic};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::output::{OutputFormat, format_topic};

/// Environment variable that overrides [`RenderConfig::format`].
pub const FORMAT_ENV: &str = "CMDTREE_HELP_FORMAT";

/// How help output is rendered.
///
/// # Examples
///
/// ```
/// use cmdtree_render::{OutputFormat, RenderConfig};
///
/// let config: RenderConfig = serde_yaml::from_str("format: table").unwrap();
/// assert_eq!(config.format, OutputFormat::Table);
/// assert!(config.show_env);
/// assert!(config.footer.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output format for every topic.
    pub format: OutputFormat,
    /// Show `[$VAR]` hints for flags with an environment override.
    pub show_env: bool,
    /// Text appended after help in human-readable formats.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            show_env: true,
            footer: None,
        }
    }
}

impl RenderConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::RenderError::Io) if the file cannot be read, or
    /// [`Yaml`](crate::RenderError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::RenderError::Io) if the file cannot be written,
    /// or [`Yaml`](crate::RenderError::Yaml) if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Default configuration with environment overrides applied.
    pub fn from_env(env: &dyn EnvSource) -> Self {
        Self::default().with_env_overrides(env)
    }

    /// Applies `CMDTREE_HELP_FORMAT` when it names a known format.
    ///
    /// Unknown names are ignored, like unparsable flag overrides.
    pub fn with_env_overrides(mut self, env: &dyn EnvSource) -> Self {
        if let Some(raw) = env.var(FORMAT_ENV).filter(|v| !v.is_empty()) {
            match raw.parse() {
                Ok(format) => self.format = format,
                Err(e) => debug!(env = FORMAT_ENV, error = %e, "ignoring help format override"),
            }
        }
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_footer(mut self, footer: &str) -> Self {
        self.footer = Some(footer.to_string());
        self
    }

    /// Returns a copy of `topic` adjusted to this configuration.
    pub fn apply(&self, topic: &HelpTopic) -> HelpTopic {
        let mut topic = topic.clone();
        if self.show_env {
            return topic;
        }
        match &mut topic {
            HelpTopic::App(app) => strip_env(&mut app.flags),
            HelpTopic::Command(command) => strip_env(&mut command.flags),
            HelpTopic::Version(_) | HelpTopic::UnknownTopic { .. } => {}
        }
        topic
    }

    /// Renders `topic` in the configured format, footer included.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdtree_core::HelpTopic;
    /// use cmdtree_render::RenderConfig;
    ///
    /// let config = RenderConfig::default().with_footer("See the manual.");
    /// let text = config.render(&HelpTopic::UnknownTopic { name: "x".into() }).unwrap();
    /// assert_eq!(text, "No help topic for 'x'\n\nSee the manual.\n");
    /// ```
    pub fn render(&self, topic: &HelpTopic) -> Result<String> {
        let mut out = format_topic(&self.apply(topic), self.format)?;
        if !out.ends_with('\n') {
            out.push('\n');
        }
        if let Some(footer) = self.footer.as_deref().filter(|_| self.format.is_prose()) {
            out.push('\n');
            out.push_str(footer);
            out.push('\n');
        }
        Ok(out)
    }
}

fn strip_env(flags: &mut [FlagHelp]) {
    for flag in flags {
        flag.env_key = None;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use cmdtree_core::{App, AppHelp, FlagSpec};

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn topic() -> HelpTopic {
        let app = App::new("todo").with_flag(FlagSpec::string("data", "").with_env("TODO_DATA"));
        HelpTopic::App(AppHelp::from_app(&app))
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r#"
format: markdown
show_env: false
footer: "bye"
"#;
        let config: RenderConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.format, OutputFormat::Markdown);
        assert!(!config.show_env);
        assert_eq!(config.footer.as_deref(), Some("bye"));
    }

    #[test]
    fn test_parse_empty_yaml_uses_defaults() {
        let config: RenderConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn test_env_override() {
        let config = RenderConfig::from_env(&env(&[(FORMAT_ENV, "json")]));
        assert_eq!(config.format, OutputFormat::Json);

        let config = RenderConfig::default()
            .with_format(OutputFormat::Table)
            .with_env_overrides(&env(&[(FORMAT_ENV, "klingon")]));
        assert_eq!(config.format, OutputFormat::Table);

        let config = RenderConfig::from_env(&env(&[(FORMAT_ENV, "")]));
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn test_apply_strips_env_hints() {
        let config = RenderConfig {
            show_env: false,
            ..RenderConfig::default()
        };
        let HelpTopic::App(help) = config.apply(&topic()) else {
            panic!("expected app topic");
        };
        assert!(help.flags.iter().all(|f| f.env_key.is_none()));

        let text = RenderConfig::default().render(&topic()).unwrap();
        assert!(text.contains("[$TODO_DATA]"));
    }

    #[test]
    fn test_footer_only_for_prose() {
        let config = RenderConfig::default()
            .with_format(OutputFormat::Json)
            .with_footer("bye");
        let out = config.render(&topic()).unwrap();
        assert!(!out.contains("bye"));
        serde_json::from_str::<serde_json::Value>(&out).unwrap();
    }
}
