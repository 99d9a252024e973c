use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use cmdtree_core::{App, Command, Context, FlagSpec, ProcessEnv, Subcommand, format_duration};
use cmdtree_render::{FormatPrinter, RenderConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Names a YAML file with render settings for help output.
const RENDER_CONFIG_ENV: &str = "TODO_RENDER_CONFIG";

fn main() {
    init_logging();

    let config = match render_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let missing = Rc::new(Cell::new(false));
    let app = build_app(config, Rc::clone(&missing));

    if let Err(err) = app.run(std::env::args()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    if missing.get() {
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn render_config() -> cmdtree_render::Result<RenderConfig> {
    let config = match std::env::var_os(RENDER_CONFIG_ENV) {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    Ok(config.with_env_overrides(&ProcessEnv))
}

fn build_app(config: RenderConfig, missing: Rc<Cell<bool>>) -> App {
    App::new("todo")
        .with_exec("todo")
        .with_version(PACKAGE_VERSION)
        .with_description("Keeps a list of things to do")
        .with_usage("todo [global options] <command> [options] [arguments...]")
        .with_printer(FormatPrinter::stdout(config))
        .with_flag(FlagSpec::bool("verbose, V").with_description("explain what is being done"))
        .with_flag(
            FlagSpec::string("data, d", "todo.json")
                .with_description("file holding the list")
                .with_env("TODO_DATA"),
        )
        .with_before(|c| {
            if c.global_string("data").trim().is_empty() {
                return Err("data file cannot be empty".to_string());
            }
            Ok(())
        })
        .with_command(add_command())
        .with_command(complete_command())
        .with_command(list_command())
        .with_command(tag_command())
        .with_command_not_found(move |c, name| {
            debug!(command = name, "no such command");
            eprintln!(
                "{}: '{name}' is not a {} command. See '{} help'.",
                c.app().name,
                c.app().name,
                c.app().name
            );
            missing.set(true);
        })
}

fn announce(c: &Context<'_>, line: String) {
    if c.global_bool("verbose") {
        info!(data = c.global_string("data"), "{line}");
    }
    println!("{line}");
}

fn add_command() -> Command {
    Command::new("add")
        .with_summary("add a task to the list")
        .with_usage("todo add [options] <title...>")
        .with_flag(FlagSpec::int("priority, p", 0).with_description("priority, higher runs first"))
        .with_flag(FlagSpec::string_slice::<&str>("tag, t", vec![]).with_description("tag to attach"))
        .with_action(|c| {
            let args = c.args();
            if !args.present() {
                eprintln!("add: missing task title");
                return;
            }
            let title = args.iter().collect::<Vec<_>>().join(" ");
            let mut line = format!(
                "added \"{title}\" to {} (priority {})",
                c.global_string("data"),
                c.int("priority")
            );
            let tags = c.string_slice("tag");
            if !tags.is_empty() {
                line.push_str(&format!(" tagged {}", tags.join(",")));
            }
            announce(c, line);
        })
}

fn complete_command() -> Command {
    Command::new("complete")
        .with_summary("mark tasks as done")
        .with_usage("todo complete <id...>")
        .with_action(|c| {
            if !c.args().present() {
                eprintln!("complete: missing task id");
                return;
            }
            for id in c.args().iter() {
                announce(c, format!("completed task {id}"));
            }
        })
}

fn list_command() -> Command {
    Command::new("list")
        .with_summary("show open tasks")
        .with_flag(FlagSpec::int("limit", 10).with_description("show at most this many tasks"))
        .with_flag(
            FlagSpec::duration("since", Duration::ZERO)
                .with_description("only tasks added within this window, 0 for all"),
        )
        .with_action(|c| {
            let since = c.duration("since");
            let window = if since.is_zero() {
                "all time".to_string()
            } else {
                format!("the last {}", format_duration(since))
            };
            announce(
                c,
                format!(
                    "listing up to {} tasks from {} over {window}",
                    c.int("limit"),
                    c.global_string("data")
                ),
            );
        })
}

fn tag_command() -> Command {
    Command::new("tag")
        .with_summary("manage task tags")
        .with_usage("todo tag <add|rm> <id> <tag>")
        .with_description("Attaches tags to tasks or removes them.")
        .with_subcommand(
            Subcommand::new("add")
                .with_summary("attach a tag to a task")
                .with_usage("todo tag add [options] <id> <tag>")
                .with_flag(FlagSpec::string("color, c", "").with_description("display color"))
                .with_action(|c| {
                    let (Some(id), Some(tag)) = (c.args().get(0), c.args().get(1)) else {
                        eprintln!("tag add: expected <id> <tag>");
                        return;
                    };
                    let mut line = format!("tagged task {id} with {tag}");
                    let color = c.string("color");
                    if !color.is_empty() {
                        line.push_str(&format!(" ({color})"));
                    }
                    announce(c, line);
                }),
        )
        .with_subcommand(
            Subcommand::new("rm")
                .with_summary("remove a tag from a task")
                .with_usage("todo tag rm <id> <tag>")
                .with_action(|c| {
                    let (Some(id), Some(tag)) = (c.args().get(0), c.args().get(1)) else {
                        eprintln!("tag rm: expected <id> <tag>");
                        return;
                    };
                    announce(c, format!("removed tag {tag} from task {id}"));
                }),
        )
}
