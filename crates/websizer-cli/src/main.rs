//! websizer CLI - measure the transfer weight of a web page

use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;
use websizer::{PageSizer, SizeError, SizeReport, TagRule};

/// Output format for the report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Total in MB followed by one line per resource
    #[default]
    Text,
    /// JSON object with total and resources
    Json,
}

/// websizer - measure a web page and the assets it links to
#[derive(Parser, Debug)]
#[command(name = "websizer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// URL of the page to measure
    url: String,

    /// Output format
    #[arg(long, short, default_value = "text")]
    output: OutputFormat,

    /// Do not scan pages at this depth or deeper (root is depth 0, so 0 measures only the root)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Number of sibling links measured at once
    #[arg(long, default_value_t = 1)]
    concurrency: usize,

    /// Extra TAG=ATTRIBUTE pair to treat as a linked asset (repeatable)
    #[arg(long = "rule", value_name = "TAG=ATTRIBUTE")]
    rules: Vec<TagRule>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    match run_measure(&cli).await {
        Ok(report) => match format_report(&report, cli.output) {
            Ok(output) => writeln_safe(&output),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run_measure(cli: &Cli) -> Result<SizeReport, SizeError> {
    let mut builder = PageSizer::builder().concurrency(cli.concurrency);
    if let Some(depth) = cli.max_depth {
        builder = builder.max_depth(depth);
    }
    for rule in &cli.rules {
        builder = builder.rule(rule.clone());
    }
    builder.build()?.measure(&cli.url).await
}

/// Log to stderr so stdout only carries the report
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn format_report(report: &SizeReport, output: OutputFormat) -> Result<String, serde_json::Error> {
    match output {
        OutputFormat::Text => Ok(report.to_string().trim_end().to_string()),
        OutputFormat::Json => serde_json::to_string_pretty(report),
    }
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> SizeReport {
        [
            ("https://example.com/".to_string(), 1_500_000),
            ("https://example.com/app.css".to_string(), 250),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["websizer", "https://example.com/"]).unwrap();
        assert_eq!(cli.url, "https://example.com/");
        assert_eq!(cli.output, OutputFormat::Text);
        assert_eq!(cli.max_depth, None);
        assert_eq!(cli.concurrency, 1);
        assert!(cli.rules.is_empty());
    }

    #[test]
    fn test_parse_missing_url() {
        assert!(Cli::try_parse_from(["websizer"]).is_err());
    }

    #[test]
    fn test_parse_options() {
        let cli = Cli::try_parse_from([
            "websizer",
            "https://example.com/",
            "-o",
            "json",
            "--max-depth",
            "2",
            "--concurrency",
            "8",
            "--rule",
            "script=src",
            "--rule",
            "source=srcset",
        ])
        .unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.max_depth, Some(2));
        assert_eq!(cli.concurrency, 8);
        assert_eq!(
            cli.rules,
            vec![TagRule::new("script", "src"), TagRule::new("source", "srcset")]
        );
    }

    #[test]
    fn test_parse_bad_rule() {
        let result = Cli::try_parse_from(["websizer", "https://example.com/", "--rule", "script"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_format_text() {
        let output = format_report(&report(), OutputFormat::Text).unwrap();
        assert_eq!(
            output,
            "total page size: 1.500250 MB\n\
             \x20    1500000 \"https://example.com/\"\n\
             \x20        250 \"https://example.com/app.css\""
        );
    }

    #[test]
    fn test_format_json() {
        let output = format_report(&report(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["total"], 1_500_250);
        assert_eq!(value["resources"]["https://example.com/app.css"], 250);
    }
}
