use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use tracing_subscriber::EnvFilter;

use configform::{
    Confirm, Dispatch, DocumentFormat, EventKind, FormSubmission, OutputDestination,
    OutputOptions, RequestOutcome, emit, parse_page_str,
};

const LOG_ENV: &str = "CONFIGFORM_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "configform",
    version,
    about = "Replay click and hover events against a configuration page"
)]
struct Cli {
    /// Page spec: file path, inline payload, or "-" for stdin
    #[arg(short = 'p', long = "page", value_name = "SPEC")]
    page: String,

    /// Format of the page spec when the file extension does not tell
    #[arg(long = "input-format", value_name = "FORMAT")]
    input_format: Option<String>,

    /// Events to replay in order, written as <click|hover|leave>:<id or name>
    #[arg(short = 'e', long = "event", value_name = "EVENT", action = ArgAction::Append)]
    events: Vec<ReplayEvent>,

    /// Answer every confirmation prompt with yes
    #[arg(short = 'y', long = "yes", conflicts_with = "no")]
    yes: bool,

    /// Answer every confirmation prompt with no
    #[arg(short = 'n', long = "no")]
    no: bool,

    /// Output destinations ("-" writes to stdout). Accepts multiple values per flag use.
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
    outputs: Vec<String>,

    /// Snapshot format (json, yaml, toml)
    #[arg(long = "format", value_name = "FORMAT", default_value = "json")]
    format: String,

    /// Emit the final page as HTML markup instead of a page document
    #[arg(long = "markup")]
    markup: bool,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Overwrite output files even if they already exist
    #[arg(short = 'f', long = "force")]
    force: bool,
}

#[derive(Debug, Clone)]
struct ReplayEvent {
    kind: EventKind,
    target: String,
}

impl FromStr for ReplayEvent {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (kind, target) = raw
            .split_once(':')
            .ok_or_else(|| format!("expected <event>:<target>, got '{raw}'"))?;
        if target.is_empty() {
            return Err(format!("event '{raw}' names no target"));
        }
        Ok(Self {
            kind: kind.parse()?,
            target: target.to_string(),
        })
    }
}

/// Confirmation answered from flags, or interactively on stdin.
struct TerminalPrompt {
    preset: Option<bool>,
}

impl Confirm for TerminalPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        if let Some(answer) = self.preset {
            eprintln!("confirm '{message}': {}", if answer { "yes" } else { "no" });
            return answer;
        }
        eprint!("{message}? [y/N] ");
        let _ = io::stderr().flush();
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let input_hint = cli
        .input_format
        .as_deref()
        .map(|name| parse_format(name, "--input-format"))
        .transpose()?;
    let (contents, inferred) = read_page_spec(&cli.page)?;
    let format = input_hint.or(inferred).unwrap_or(DocumentFormat::Json);
    let mut page = parse_page_str(&contents, format).map_err(Report::msg)?;

    let mut prompt = TerminalPrompt {
        preset: match (cli.yes, cli.no) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        },
    };
    let mut submitter = |submission: FormSubmission| {
        eprintln!(
            "submit {} {}: {}",
            submission.method.as_deref().unwrap_or("GET"),
            submission.action.as_deref().unwrap_or("#"),
            submission.encode()
        );
    };

    for event in &cli.events {
        let target = page
            .find_control(&event.target)
            .ok_or_else(|| eyre!("no element with id or name '{}'", event.target))?;
        let outcome = page.dispatch(target, event.kind, &mut prompt, &mut submitter);
        eprintln!("{} {}: {}", event.kind, event.target, describe(outcome));
    }

    let options = build_output_options(&cli)?;
    emit(&page, &options).map_err(Report::msg)?;
    Ok(())
}

fn parse_format(name: &str, flag: &str) -> Result<DocumentFormat> {
    DocumentFormat::from_name(name).ok_or_else(|| eyre!("unsupported {flag} value '{name}'"))
}

fn read_page_spec(spec: &str) -> Result<(String, Option<DocumentFormat>)> {
    if spec == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .wrap_err("failed to read page from stdin")?;
        return Ok((buffer, None));
    }
    let path = Path::new(spec);
    if path.is_file() {
        let contents = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read page {}", path.display()))?;
        return Ok((contents, DocumentFormat::from_path(path)));
    }
    Ok((spec.to_string(), None))
}

fn build_output_options(cli: &Cli) -> Result<OutputOptions> {
    let format = parse_format(&cli.format, "--format")?;
    let mut destinations = Vec::new();
    for raw in &cli.outputs {
        if raw == "-" {
            destinations.push(OutputDestination::Stdout);
            continue;
        }
        let path = PathBuf::from(raw);
        if path.exists() && !cli.force {
            return Err(eyre!(
                "{} already exists; pass --force to overwrite",
                path.display()
            ));
        }
        destinations.push(OutputDestination::File(path));
    }
    if destinations.is_empty() {
        destinations.push(OutputDestination::Stdout);
    }
    Ok(OutputOptions::new(format)
        .with_pretty(!cli.no_pretty)
        .with_markup(cli.markup)
        .with_destinations(destinations))
}

fn describe(outcome: Dispatch) -> String {
    match outcome {
        Dispatch::Ignored => "no handler".to_string(),
        Dispatch::FieldAdded(row) => format!("added row #{}", row.raw()),
        Dispatch::FieldUnchanged => "no repeated field row found".to_string(),
        Dispatch::Request(RequestOutcome::Submitted) => "submitted".to_string(),
        Dispatch::Request(RequestOutcome::Declined) => "declined".to_string(),
        Dispatch::Request(RequestOutcome::MissingForm) => "not inside a form".to_string(),
        Dispatch::Request(RequestOutcome::MissingRequestField) => {
            "form has no request field".to_string()
        }
        Dispatch::HelpShown => "help shown".to_string(),
        Dispatch::HelpUnavailable => "help unavailable".to_string(),
        Dispatch::HelpHidden => "help hidden".to_string(),
    }
}
