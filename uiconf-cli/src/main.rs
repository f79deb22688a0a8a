// uiconf-cli/src/main.rs
use clap::{Parser, Subcommand};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc;

use uiconf_core::{ConfigFile, EventBus, OptionSchema, OptionSpec, WidgetRegistry};
use uiconf_widgets::builtin_registry;

/// Validate and inspect widget configuration files
#[derive(Parser, Debug)]
#[command(name = "uiconf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check every widget of a config file; searches the default paths without FILE
    Validate { file: Option<PathBuf> },
    /// Print the default options of a widget kind as JSON
    Defaults { kind: String },
    /// List the options a widget kind accepts
    Schema { kind: String },
    /// Re-validate a config file whenever it changes
    Watch { file: PathBuf },
    /// List registered widget kinds
    List,
}

fn load(file: Option<&Path>) -> Result<ConfigFile, uiconf_core::ConfigError> {
    match file {
        Some(path) => ConfigFile::load_from(path),
        None => ConfigFile::load(),
    }
}

/// Validate and build every configured widget; returns the number of failures
fn check(config: &ConfigFile, registry: &WidgetRegistry) -> usize {
    let bus = EventBus::new();
    let mut failures = 0;
    for widget in &config.widget {
        let validated = match registry.validate(widget) {
            Ok(validated) => validated,
            Err(e) => {
                log::error!("{} ({}): {}", widget.name, widget.kind, e);
                failures += 1;
                continue;
            }
        };
        for key in &validated.unknown {
            log::warn!("{} ({}): unknown option '{}'", widget.name, widget.kind, key);
        }
        match registry.create(widget, &bus) {
            Ok(_) => log::info!("{} ({}): ok", widget.name, widget.kind),
            Err(e) => {
                log::error!("{} ({}): {}", widget.name, widget.kind, e);
                failures += 1;
            }
        }
    }
    failures
}

fn print_schema(schema: &OptionSchema, prefix: &str) {
    for spec in schema.specs() {
        let path = if prefix.is_empty() {
            spec.name.to_string()
        } else {
            format!("{}.{}", prefix, spec.name)
        };
        match spec.group() {
            Some(group) if !matches!(spec.ty, uiconf_core::OptionType::OneOf(_)) => {
                println!("{}", path);
                print_schema(group, &path);
            }
            _ => println!("{}", describe(&path, spec)),
        }
    }
}

fn describe(path: &str, spec: &OptionSpec) -> String {
    let mut line = format!("{}: {} = {}", path, spec.ty.describe(), spec.default_value());
    if spec.read_only {
        line.push_str(" (read-only)");
    }
    if let Some(note) = spec.deprecated {
        line.push_str(&format!(" (deprecated: {})", note));
    }
    line
}

fn watch(file: &Path, registry: &WidgetRegistry) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = mpsc::channel();
    let mut watcher = RecommendedWatcher::new(tx, notify::Config::default())?;
    watcher.watch(file, RecursiveMode::NonRecursive)?;
    log::info!("watching {}", file.display());

    let report = || match ConfigFile::load_from(file) {
        Ok(config) => {
            let failures = check(&config, registry);
            log::info!("{} widget(s), {} failure(s)", config.widget.len(), failures);
        }
        Err(e) => log::error!("failed to load {}: {}", file.display(), e),
    };
    report();

    for event in rx {
        match event {
            Ok(event) if event.kind.is_modify() || event.kind.is_create() => report(),
            Ok(_) => {}
            Err(e) => log::warn!("watch error: {}", e),
        }
    }
    Ok(())
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let registry = builtin_registry();
    match cli.command {
        Command::Validate { file } => {
            let config = load(file.as_deref())?;
            let failures = check(&config, &registry);
            if failures > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Defaults { kind } => {
            let defaults = registry.schema(&kind)?.defaults();
            println!("{}", serde_json::to_string_pretty(&defaults)?);
        }
        Command::Schema { kind } => print_schema(&registry.schema(&kind)?, ""),
        Command::Watch { file } => watch(&file, &registry)?,
        Command::List => {
            for kind in registry.list_widgets() {
                println!("{}", kind);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::parse_from(["uiconf", "-v", "schema", "scheduler"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Schema { ref kind } if kind == "scheduler"));

        let cli = Cli::parse_from(["uiconf", "validate"]);
        assert!(matches!(cli.command, Command::Validate { file: None }));
    }

    #[test]
    fn test_check_counts_failures() {
        let config = ConfigFile::from_toml_str(
            r#"
[[widget]]
name = "calendar"
kind = "scheduler"
options = { startDayHour = 20, endDayHour = 8 }

[[widget]]
name = "files"
kind = "fileManager"

[[widget]]
name = "chart"
kind = "chart"
"#,
        )
        .unwrap();
        assert_eq!(check(&config, &builtin_registry()), 2);
    }

    #[test]
    fn test_describe_marks_deprecated() {
        let schema = builtin_registry().schema("pivotGrid").unwrap();
        let export = schema.get("export").and_then(OptionSpec::group).unwrap();
        let line = describe("export.proxyUrl", export.get("proxyUrl").unwrap());
        assert!(line.contains("deprecated"));
    }
}
