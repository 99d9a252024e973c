use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::rc::Rc;

use cmdtree_core::{App, Command, FlagSpec, Subcommand};
use cmdtree_render::{FormatPrinter, OutputFormat, RenderConfig, RenderError};

#[derive(Clone, Default)]
struct Buffer(Rc<RefCell<Vec<u8>>>);

impl Buffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("utf-8 output")
    }
}

impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn todo_app(config: RenderConfig, buffer: &Buffer) -> App {
    App::new("todo")
        .with_version("0.4.0")
        .with_flag(
            FlagSpec::string("data, d", "todo.json")
                .with_description("data file")
                .with_env("TODO_DATA"),
        )
        .with_command(
            Command::new("tag")
                .with_summary("manage tags")
                .with_subcommand(Subcommand::new("add").with_summary("attach a tag"))
                .with_subcommand(Subcommand::new("rm").with_summary("remove a tag")),
        )
        .with_printer(FormatPrinter::new(config, buffer.clone()))
}

#[test]
fn test_config_save_and_load() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("render.yaml");

    let config = RenderConfig {
        format: OutputFormat::Markdown,
        show_env: false,
        footer: Some("See todo(1).".into()),
    };
    config.save(&path).expect("save config");

    let yaml = fs::read_to_string(&path).expect("read config");
    assert!(yaml.contains("format: markdown"));

    let loaded = RenderConfig::load(&path).expect("load config");
    assert_eq!(loaded, config);
}

#[test]
fn test_load_rejects_bad_yaml() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("render.yaml");
    fs::write(&path, "format: [not, a, format]\n").expect("write config");

    let err = RenderConfig::load(&path).unwrap_err();
    assert!(matches!(err, RenderError::Yaml(_)));

    let err = RenderConfig::load(dir.path().join("missing.yaml")).unwrap_err();
    assert!(matches!(err, RenderError::Io(_)));
}

#[test]
fn test_app_help_as_json() {
    let buffer = Buffer::default();
    let app = todo_app(RenderConfig::default().with_format(OutputFormat::Json), &buffer);

    app.run(["todo", "--help"]).expect("run");
    let value: serde_json::Value = serde_json::from_str(&buffer.contents()).expect("json");
    assert_eq!(value["topic"], "app");
    assert_eq!(value["version"], "0.4.0");
    let commands: Vec<&str> = value["commands"]
        .as_array()
        .expect("commands")
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert_eq!(commands, vec!["tag", "help"]);
}

#[test]
fn test_subcommand_help_as_markdown_with_footer() {
    let buffer = Buffer::default();
    let config = RenderConfig::default()
        .with_format(OutputFormat::Markdown)
        .with_footer("See todo(1).");
    let app = todo_app(config, &buffer);

    app.run(["todo", "help", "tag", "rm"]).expect("run");
    let out = buffer.contents();
    assert!(out.starts_with("# todo tag rm\n\nremove a tag\n"));
    assert!(out.ends_with("\nSee todo(1).\n"));
}

#[test]
fn test_table_without_env_hints() {
    let buffer = Buffer::default();
    let config = RenderConfig {
        format: OutputFormat::Table,
        show_env: false,
        footer: None,
    };
    let app = todo_app(config, &buffer);

    app.run(["todo"]).expect("run");
    let out = buffer.contents();
    assert!(out.starts_with("App: todo  Version: 0.4.0\n"));
    assert!(out.contains("data file"));
    assert!(!out.contains("TODO_DATA"));
}
