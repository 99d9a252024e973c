//! Help and version rendering for cmdtree applications.
//!
//! [`format_topic`] turns a [`HelpTopic`](cmdtree_core::HelpTopic) into
//! JSON, YAML, Markdown, an aligned table or the core's plain text.
//! [`RenderConfig`] picks the format (from YAML or the
//! `CMDTREE_HELP_FORMAT` variable) and [`FormatPrinter`] plugs it into an
//! [`App`](cmdtree_core::App) as its help printer.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::{App, AppHelp, HelpTopic};
//! use cmdtree_render::{OutputFormat, format_topic};
//!
//! let app = App::new("todo").with_version("1.0.0");
//! let topic = HelpTopic::App(AppHelp::from_app(&app));
//! let md = format_topic(&topic, OutputFormat::Markdown).unwrap();
//! assert!(md.starts_with("# todo\n"));
//! ```

mod config;
mod error;
mod output;
mod printer;

pub use config::{FORMAT_ENV, RenderConfig};
pub use error::{RenderError, Result};
pub use output::{OutputFormat, format_topic};
pub use printer::FormatPrinter;
