use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser as ClapParser};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

use weblink::{
    LinkParser, ParseMode, ParserConfig, ResponseFacts, format_debug, format_header, format_json,
};

/// weblink CLI — RFC 8288 `Link` header parser.
///
/// Reads `Link` header field values from --header arguments, a file, or
/// stdin (one value per non-empty line) and outputs the parsed links in the
/// chosen format.
///
/// Relative references are resolved against --context when given, otherwise
/// against a context derived from the request facts (--request-url,
/// --method, --status, --content-location).
#[derive(ClapParser)]
#[command(name = "weblink-cli", version, about, long_about = None)]
struct Cli {
    /// Path to a file with one Link header value per line.
    /// Reads from stdin when neither FILE nor --header is given.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// A Link header value (repeatable).
    #[arg(long = "header", value_name = "VALUE")]
    headers: Vec<String>,

    /// Enforce the literal RFC 8288 grammar.
    #[arg(long)]
    strict: bool,

    /// Default link context, overriding the derived one.
    #[arg(long, value_name = "URL")]
    context: Option<Url>,

    /// Effective request URI.
    #[arg(long, value_name = "URL")]
    request_url: Option<Url>,

    /// Request method.
    #[arg(long, value_name = "METHOD")]
    method: Option<String>,

    /// Response status code.
    #[arg(long, value_name = "CODE")]
    status: Option<u16>,

    /// Raw Content-Location header value.
    #[arg(long, value_name = "VALUE")]
    content_location: Option<String>,

    /// Output format.
    #[arg(short, long, default_value = "json", value_enum)]
    format: OutputFormat,

    /// Pretty-print JSON output (ignored for other formats).
    #[arg(short, long)]
    pretty: bool,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OutputFormat {
    /// JSON output
    Json,
    /// Human-readable debug output
    Debug,
    /// Normalized Link header value
    Header,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // When no input source is provided and stdin is a terminal (not piped),
    // show help instead of blocking.
    if cli.file.is_none() && cli.headers.is_empty() && std::io::stdin().is_terminal() {
        Cli::command().print_help().ok();
        println!();
        process::exit(0);
    }

    let values = match read_input(&cli) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error reading input: {e}");
            process::exit(1);
        }
    };

    if values.is_empty() {
        eprintln!("Error: empty input");
        process::exit(1);
    }

    let mode = if cli.strict {
        ParseMode::Strict
    } else {
        ParseMode::Lax
    };
    let context = cli.context.clone().or_else(|| {
        ResponseFacts {
            request_url: cli.request_url.as_ref(),
            request_method: cli.method.as_deref(),
            status: cli.status,
            content_location: cli.content_location.as_deref(),
            content_language: None,
        }
        .default_context()
    });
    match &context {
        Some(url) => debug!(%url, "using default context"),
        None => debug!("no default context"),
    }

    let parser = LinkParser::with_config(ParserConfig { mode });
    let links = match parser.parse_all(&values, context.as_ref()) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Parse error: {e}");
            process::exit(2);
        }
    };
    if links.is_empty() {
        warn!("input contained no links");
    }

    let output = match cli.format {
        OutputFormat::Json => format_json(&links, cli.pretty),
        OutputFormat::Debug => format_debug(&links),
        OutputFormat::Header => format_header(&links),
    };

    println!("{output}");
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Collect header values from --header, a file, or stdin.
fn read_input(cli: &Cli) -> Result<Vec<String>, std::io::Error> {
    if !cli.headers.is_empty() {
        return Ok(cli.headers.clone());
    }
    let text = match &cli.file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(split_lines(&text))
}

/// One header value per line; blank lines are skipped and line endings
/// (including a stray CR) are removed.
fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_owned)
        .collect()
}
