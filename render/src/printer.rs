//! A [`HelpPrinter`] that renders through a [`RenderConfig`].

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};

use cmdtree_core::{HelpPrinter, HelpTopic};

use crate::config::RenderConfig;

/// Writes help topics in a configurable format to any writer.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{App, Command};
/// use cmdtree_render::{FormatPrinter, OutputFormat, RenderConfig};
///
/// let config = RenderConfig::default().with_format(OutputFormat::Json);
/// let app = App::new("todo")
///     .with_command(Command::new("add"))
///     .with_printer(FormatPrinter::stdout(config));
/// app.run(["todo", "help"]).unwrap();
/// ```
pub struct FormatPrinter {
    config: RenderConfig,
    out: RefCell<Box<dyn Write>>,
}

impl FormatPrinter {
    pub fn new(config: RenderConfig, out: impl Write + 'static) -> Self {
        Self {
            config,
            out: RefCell::new(Box::new(out)),
        }
    }

    /// Printer writing to standard output.
    pub fn stdout(config: RenderConfig) -> Self {
        Self::new(config, io::stdout())
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }
}

impl HelpPrinter for FormatPrinter {
    fn print(&self, topic: &HelpTopic) -> io::Result<()> {
        let text = self.config.render(topic)?;
        let mut out = self.out.borrow_mut();
        out.write_all(text.as_bytes())?;
        out.flush()
    }
}

impl fmt::Debug for FormatPrinter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatPrinter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use cmdtree_core::VersionInfo;

    use super::*;
    use crate::output::OutputFormat;

    /// Shared in-memory writer so the test can read what was printed.
    #[derive(Clone, Default)]
    struct Buffer(Rc<RefCell<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_print_uses_configured_format() {
        let buffer = Buffer::default();
        let printer = FormatPrinter::new(
            RenderConfig::default().with_format(OutputFormat::Yaml),
            buffer.clone(),
        );
        let topic = HelpTopic::Version(VersionInfo {
            name: "todo".into(),
            version: "0.3.0".into(),
        });

        printer.print(&topic).unwrap();
        let written = String::from_utf8(buffer.0.borrow().clone()).unwrap();
        assert!(written.contains("topic: version"));
        assert!(written.contains("version: 0.3.0"));
    }
}
