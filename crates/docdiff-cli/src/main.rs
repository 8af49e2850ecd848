//! Command-line interface for `docdiff`.
//!
//! Compares two JSON or XML documents structurally and prints the
//! [`DiffResult`] as JSON. The exit status mirrors `diff(1)`: 0 when the
//! documents are equivalent, 1 when they differ and 2 on any error.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use docdiff_core::{
    canonicalize_with_options, compare_with_options, CompareOptions, DiffResult, Format, Measure,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const EXIT_EQUAL: i32 = 0;
const EXIT_DIFFERENT: i32 = 1;
const EXIT_ERROR: i32 = 2;

const EXAMPLES: &str = r#"Examples:
  docdiff a.json b.json
  cat b.json | docdiff a.json
  docdiff -f xml --compact old.config new.config
  docdiff --opts '{"maxLines":5000}' a.json b.json
  docdiff -c pom.xml"#;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "docdiff",
    version,
    about = "Structurally compare JSON and XML documents.",
    long_about = "Structurally compare JSON and XML documents.\n\n\
                  Prints the comparison of FILE1 and FILE2 to STDOUT as JSON.\n\
                  When FILE2 is omitted the second document is read from STDIN.",
    after_help = EXAMPLES
)]
struct Cli {
    /// Document format; inferred from the file extensions when omitted.
    #[arg(short = 'f', long = "format", value_name = "json|xml")]
    format: Option<Format>,

    /// Print the canonical form of FILE1 and exit.
    #[arg(short = 'c', long = "canonicalize", action = ArgAction::SetTrue)]
    canonicalize: bool,

    /// Write output to FILE instead of STDOUT.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print nothing; report through the exit status only.
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,

    /// Emit single-line JSON instead of pretty-printed JSON.
    #[arg(long = "compact", action = ArgAction::SetTrue)]
    compact: bool,

    /// Comparison options as JSON, e.g. '{"maxLines":5000}'.
    #[arg(long = "opts", value_name = "JSON")]
    opts: Option<String>,

    /// Maximum canonical lines per document.
    #[arg(long = "max-lines", value_name = "N", conflicts_with = "no_limits")]
    max_lines: Option<usize>,

    /// Maximum input bytes per document.
    #[arg(long = "max-bytes", value_name = "N", conflicts_with = "no_limits")]
    max_bytes: Option<usize>,

    /// Disable the line and byte ceilings; the nesting ceiling stays.
    #[arg(long = "no-limits", action = ArgAction::SetTrue)]
    no_limits: bool,

    /// Abandon the comparison after N milliseconds.
    #[arg(long = "timeout-ms", value_name = "N")]
    timeout_ms: Option<u64>,

    /// Diagnostic log format on STDERR (level from RUST_LOG, default warn).
    #[arg(long = "log-format", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// First document.
    #[arg(value_name = "FILE1")]
    file1: PathBuf,

    /// Second document; STDIN when omitted.
    #[arg(value_name = "FILE2")]
    file2: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match try_main(&cli) {
        Ok(code) => {
            io::stdout().flush().ok();
            std::process::exit(code);
        }
        Err(err) => {
            let _ = writeln!(io::stderr(), "docdiff: {err:#}");
            std::process::exit(EXIT_ERROR);
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr);
    match format {
        LogFormat::Text => builder.with_target(false).init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn try_main(cli: &Cli) -> Result<i32> {
    let format = resolve_format(cli);
    debug!(%format, "resolved document format");

    if cli.canonicalize {
        return run_canonicalize(cli, format);
    }

    let first = InputSource::File(path_from(&cli.file1)?);
    let second = match &cli.file2 {
        Some(path) => InputSource::File(path_from(path)?),
        None => InputSource::Stdin,
    };

    let options = build_options(cli)?;
    let left = read_input(&first)?;
    let right = read_input(&second)?;

    let timeout = cli.timeout_ms.map(Duration::from_millis);
    let result = run_with_deadline("comparison", timeout, move || {
        compare_with_options(&left, &right, format, &options)
    })?;
    if let Some(error) = &result.error {
        warn!(%error, "comparison failed");
    } else {
        info!(
            equal = result.equal,
            added = result.stats.added,
            removed = result.stats.removed,
            changed = result.stats.changed,
            "comparison finished"
        );
    }

    let rendered = render_result(&result, cli.compact)?;
    emit(cli, &rendered)?;

    Ok(if result.error.is_some() {
        EXIT_ERROR
    } else if result.equal {
        EXIT_EQUAL
    } else {
        EXIT_DIFFERENT
    })
}

fn run_canonicalize(cli: &Cli, format: Format) -> Result<i32> {
    if cli.file2.is_some() {
        bail!("--canonicalize takes a single FILE1");
    }
    let options = build_options(cli)?;
    let text = read_input(&InputSource::File(path_from(&cli.file1)?))?;
    let timeout = cli.timeout_ms.map(Duration::from_millis);
    let job_options = options.clone();
    let canonical = run_with_deadline("canonicalization", timeout, move || {
        canonicalize_with_options(&text, format, &job_options)
    })?
    .with_context(|| format!("failed to canonicalize {} as {format}", cli.file1.display()))?;
    options
        .check(Measure::Lines, canonical.split('\n').count())
        .with_context(|| format!("canonical form of {} is too large", cli.file1.display()))?;
    emit(cli, &format!("{canonical}\n"))?;
    Ok(EXIT_EQUAL)
}

fn resolve_format(cli: &Cli) -> Format {
    cli.format
        .or_else(|| Format::from_path(&cli.file1))
        .or_else(|| cli.file2.as_deref().and_then(Format::from_path))
        .unwrap_or(Format::Json)
}

fn build_options(cli: &Cli) -> Result<CompareOptions> {
    let mut options = match &cli.opts {
        Some(raw) => parse_opts_json(raw)?,
        None => CompareOptions::default(),
    };

    if cli.no_limits {
        options = CompareOptions::unbounded();
    }
    if let Some(max_lines) = cli.max_lines {
        options = options.with_max_lines(Some(max_lines)).context("invalid --max-lines")?;
    }
    if let Some(max_bytes) = cli.max_bytes {
        options = options.with_max_input_bytes(Some(max_bytes)).context("invalid --max-bytes")?;
    }
    debug!(
        max_lines = ?options.max_lines(),
        max_input_bytes = ?options.max_input_bytes(),
        max_depth = options.max_depth(),
        "comparison options"
    );
    Ok(options)
}

fn parse_opts_json(raw: &str) -> Result<CompareOptions> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("--opts requires a JSON object");
    }
    serde_json::from_str(trimmed).with_context(|| format!("failed to parse --opts JSON: {trimmed}"))
}

/// Runs `job` on a worker thread, giving up once `timeout` elapses.
fn run_with_deadline<T, F>(task: &str, timeout: Option<Duration>, job: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let Some(timeout) = timeout else {
        return Ok(job());
    };

    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name(format!("docdiff-{task}"))
        .spawn(move || {
            let _ = tx.send(job());
        })
        .with_context(|| format!("failed to spawn {task} worker"))?;

    match rx.recv_timeout(timeout) {
        Ok(outcome) => Ok(outcome),
        Err(RecvTimeoutError::Timeout) => {
            bail!("{task} timed out after {} ms", timeout.as_millis())
        }
        Err(RecvTimeoutError::Disconnected) => bail!("{task} worker exited without a result"),
    }
}

fn render_result(result: &DiffResult, compact: bool) -> Result<String> {
    let mut rendered = if compact {
        serde_json::to_string(result)
    } else {
        serde_json::to_string_pretty(result)
    }
    .context("failed to serialize comparison result")?;
    rendered.push('\n');
    Ok(rendered)
}

fn emit(cli: &Cli, rendered: &str) -> Result<()> {
    if cli.quiet {
        return Ok(());
    }
    if let Some(path) = &cli.output {
        fs::write(path, rendered.as_bytes())
            .with_context(|| format!("failed to write output to {}", path.display()))?;
    } else {
        print!("{rendered}");
        io::stdout().flush().ok();
    }
    Ok(())
}

#[derive(Debug)]
enum InputSource {
    File(PathBuf),
    Stdin,
}

fn path_from(input: &Path) -> Result<PathBuf> {
    if input.as_os_str().is_empty() {
        bail!("expected file path; got empty string");
    }
    Ok(input.to_path_buf())
}

fn read_input(source: &InputSource) -> Result<String> {
    match source {
        InputSource::File(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        InputSource::Stdin => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).context("failed to read STDIN")?;
            Ok(buffer)
        }
    }
}
