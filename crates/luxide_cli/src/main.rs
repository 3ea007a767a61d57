//! Luxide command-line tools
//!
//! Run with: cargo run -p luxide_cli -- <command>
//!       or: luxide <command>
//!
//! Commands:
//! - `normalize <input.json> [output.json]`
//! - `template [empty|cornell-box]`
//! - `sweep <input.json>`
//! - `get <input.json> <path>`
//! - `check <input.json>`

use luxide_edit::{EditSession, SchemaOracle, SessionSettings};
use luxide_schema::{RenderConfig, Template};
use std::process::ExitCode;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const USAGE: &str = "\
Usage: luxide <command> [args]

Commands:
  normalize <input.json> [output.json]  Extract inline entities into their tables
  template [empty|cornell-box]          Print a starter document
  sweep <input.json>                    Remove entries no scene can reach
  get <input.json> <path>               Print the value at a form path
  check <input.json>                    Validate every field of a document";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };

    let result = match command.as_str() {
        "normalize" => normalize(rest),
        "template" => template(rest),
        "sweep" => sweep(rest),
        "get" => get(rest),
        "check" => check(rest),
        "help" | "--help" | "-h" => {
            println!("{}", USAGE);
            Ok(ExitCode::SUCCESS)
        }
        other => {
            eprintln!("Unknown command: {}\n\n{}", other, USAGE);
            Ok(ExitCode::from(2))
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn argument<'a>(args: &'a [String], index: usize, name: &str) -> CliResult<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| format!("missing argument <{}>\n\n{}", name, USAGE).into())
}

fn open(path: &str) -> CliResult<EditSession> {
    let text = std::fs::read_to_string(path)?;
    Ok(EditSession::from_json(&text, SessionSettings::load())?)
}

fn print_json(config: &RenderConfig) -> CliResult<()> {
    println!("{}", config.to_json_pretty()?);
    Ok(())
}

fn normalize(args: &[String]) -> CliResult<ExitCode> {
    let input = argument(args, 0, "input.json")?;
    let text = std::fs::read_to_string(input)?;
    let mut config = RenderConfig::from_json(&text)?;

    let report = luxide_graph::normalize(&mut config);
    log::info!("Extracted {} inline entities from {}", report.len(), input);

    match args.get(1) {
        Some(output) => {
            std::fs::write(output, config.to_json_pretty()?)?;
            log::info!("Wrote {}", output);
        }
        None => print_json(&config)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn template(args: &[String]) -> CliResult<ExitCode> {
    let template = match args.first() {
        Some(name) => name.parse::<Template>()?,
        None => Template::default(),
    };
    print_json(&template.build())?;
    Ok(ExitCode::SUCCESS)
}

fn sweep(args: &[String]) -> CliResult<ExitCode> {
    let mut session = open(argument(args, 0, "input.json")?)?;
    for (kind, name) in session.sweep_orphans()? {
        log::info!("Removed {} '{}'", kind, name);
    }
    print_json(&session.config()?)?;
    Ok(ExitCode::SUCCESS)
}

fn get(args: &[String]) -> CliResult<ExitCode> {
    let session = open(argument(args, 0, "input.json")?)?;
    let value = session.read(argument(args, 1, "path")?)?;
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(ExitCode::SUCCESS)
}

fn check(args: &[String]) -> CliResult<ExitCode> {
    let input = argument(args, 0, "input.json")?;
    let settings = SessionSettings {
        normalize_after_reconcile: false,
        ..SessionSettings::load()
    };
    let mut session = EditSession::from_json(&std::fs::read_to_string(input)?, settings)?;
    let document = session.document().clone();
    let oracle = SchemaOracle::render_config(document.clone());

    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let report = runtime.block_on(session.reconcile(&document, &oracle));

    for (path, message) in &report.rejected {
        println!("{}: {}", path, message);
    }
    if report.is_clean() {
        log::info!("{}: {} fields valid", input, report.committed.len());
        Ok(ExitCode::SUCCESS)
    } else {
        log::warn!("{}: {} invalid fields", input, report.rejected.len());
        Ok(ExitCode::FAILURE)
    }
}
