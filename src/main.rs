use std::error::Error;
use std::process;
use std::time::Duration;

use sources_service::actions;
use sources_service::config::{Config, DEFAULT_CONFIG_PATH};
use sources_service::conformity::style_for;
use sources_service::ingest::{self, DataOrigin, DocumentSource, FileDocumentSource, HttpDocumentSource};
use sources_service::logging::{self, Component};
use sources_service::render::{self, detail};
use sources_service::store::SourceStore;
use sources_service::verify;

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Stats,
    Render(String),
    Pins,
    Share(String),
    Report(String),
    Verify { json: Option<String> },
}

#[derive(Debug, Clone, PartialEq)]
struct Options {
    command: Command,
    file: Option<String>,
    config_path: String,
}

fn usage() {
    eprintln!("Usage: sources_service [--config <path>] [--file <path>] <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  stats                 source count and compliant count");
    eprintln!("  render <id>           detail panel markup for one source");
    eprintln!("  pins                  map pins as JSON");
    eprintln!("  share <id>            share payload as JSON");
    eprintln!("  report <id>           problem-report mailto link");
    eprintln!("  verify [--json <path>]  check the document record by record");
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut file = None;
    let mut config_path = DEFAULT_CONFIG_PATH.to_string();
    let mut json = None;
    let mut positional = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--file" => file = Some(iter.next().ok_or("--file needs a path")?.clone()),
            "--config" => config_path = iter.next().ok_or("--config needs a path")?.clone(),
            "--json" => json = Some(iter.next().ok_or("--json needs a path")?.clone()),
            "-h" | "--help" => return Err(String::new()),
            other if other.starts_with("--") => return Err(format!("unknown option {}", other)),
            other => positional.push(other.to_string()),
        }
    }

    let id = |name: &str| -> Result<String, String> {
        positional
            .get(1)
            .cloned()
            .ok_or_else(|| format!("{} needs a source id", name))
    };

    let command = match positional.first().map(String::as_str) {
        Some("stats") => Command::Stats,
        Some("render") => Command::Render(id("render")?),
        Some("pins") => Command::Pins,
        Some("share") => Command::Share(id("share")?),
        Some("report") => Command::Report(id("report")?),
        Some("verify") => Command::Verify { json: json.take() },
        Some(other) => return Err(format!("unknown command {}", other)),
        None => return Err("no command given".to_string()),
    };
    if json.is_some() {
        return Err("--json only applies to verify".to_string());
    }

    Ok(Options { command, file, config_path })
}

fn document_source(options: &Options, config: &Config) -> Result<Box<dyn DocumentSource>, Box<dyn Error>> {
    let source: Box<dyn DocumentSource> = match &options.file {
        Some(path) => Box::new(FileDocumentSource::new(path)),
        None => Box::new(HttpDocumentSource::new(
            &config.base_url,
            &config.data_path,
            Duration::from_secs(config.http_timeout_secs),
        )?),
    };
    Ok(source)
}

fn run(options: Options) -> Result<(), Box<dyn Error>> {
    let config = Config::load(&options.config_path)?;
    logging::init_logger(
        config.log_level(),
        config.logging.file.as_deref(),
        config.logging.timestamps,
    );
    let source = document_source(&options, &config)?;
    logging::debug(Component::System, None, &format!("Reading {}", source.location()));

    if let Command::Verify { json } = &options.command {
        let body = source.fetch()?;
        let report = verify::verify_document(&body)?;
        verify::print_summary(&report);
        if let Some(path) = json {
            verify::write_report(&report, path)?;
            println!("Report written to {}", path);
        }
        return Ok(());
    }

    let outcome = ingest::load(source.as_ref());
    if let Some(warning) = &outcome.warning {
        eprintln!("ℹ {}", warning.notice().message);
    }
    let origin = outcome.origin;
    let store = SourceStore::new(outcome.records);

    match options.command {
        Command::Stats => {
            let summary = store.summary();
            println!("Sources:    {}", summary.total);
            println!("Compliant:  {}", summary.compliant);
            if origin == DataOrigin::Fallback {
                println!("(demonstration data)");
            } else if store.is_empty() {
                println!("(document lists no sources)");
            }
            for record in store.iter() {
                println!("  {} {:<24} {}", style_for(record.status()).icon, record.id, record.display_name());
            }
        }
        Command::Render(id) => {
            let record = store.get(&id)?;
            let body = match render::render_detail(record, &config.render_options()) {
                Ok(body) => body,
                Err(err) => {
                    logging::error(Component::Render, Some(&id), &err.to_string());
                    render::render_error_panel(&id, &err.to_string())
                }
            };
            println!("<h2>{}</h2>", html_escape::encode_text(&detail::title(record)));
            println!("{}", body);
        }
        Command::Pins => {
            let pins = render::build_pins(store.iter());
            println!("{}", serde_json::to_string_pretty(&pins)?);
        }
        Command::Share(id) => {
            let payload = actions::share_payload(store.get(&id)?, &config.base_url);
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Command::Report(id) => {
            let report = actions::problem_report(store.get(&id)?, &config.report_recipient);
            println!("{}", report.mailto());
        }
        Command::Verify { .. } => {}
    }

    Ok(())
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("Error: {}", msg);
            }
            usage();
            process::exit(1);
        }
    };

    if let Err(e) = run(options) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
