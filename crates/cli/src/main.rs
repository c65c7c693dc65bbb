mod echo;

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use linkmark_core::{
    DocumentTree, HttpFetcher, MetadataRecord, OfflineFetcher, PageFetcher, TransformConfig, TransformConfigBuilder,
    TransformReport, Transformer, fetch_file, fetch_stdin,
};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::echo::{format_size, print_banner, print_detail, print_info, print_report, print_step, print_success};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for the transformed document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Html,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: html, json", s)),
        }
    }
}

/// Enrich bare links, pseudocode blocks and embeddable links in rendered HTML
#[derive(Parser, Debug)]
#[command(name = "linkmark")]
#[command(version)]
#[command(about = "Enrich links, pseudocode and embeds in rendered HTML", long_about = None)]
struct Args {
    /// Local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (html, json)
    #[arg(short, long, default_value = "html", value_name = "FORMAT")]
    format: OutputFormat,

    /// Metadata fetch timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout: Option<u64>,

    /// Custom User-Agent for metadata requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Config file (default: <config dir>/linkmark/config.json when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Never touch the network; mentions use URL-derived titles
    #[arg(long)]
    offline: bool,

    /// Leave bare links untouched
    #[arg(long)]
    no_mentions: bool,

    /// Leave single-link paragraphs untouched
    #[arg(long)]
    no_embeds: bool,

    /// Leave pseudocode blocks untouched
    #[arg(long)]
    no_algorithms: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// JSON output shape
#[derive(Serialize)]
struct JsonOutput<'a> {
    html: &'a str,
    report: TransformReport,
    metadata: BTreeMap<&'a str, &'a MetadataRecord>,
}

/// What one run produced
struct RunOutput {
    html: String,
    report: TransformReport,
    records: Vec<(String, std::sync::Arc<MetadataRecord>)>,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load_config(args: &Args) -> anyhow::Result<TransformConfig> {
    let base = match &args.config {
        Some(path) => TransformConfig::from_file(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => TransformConfig::load_default().context("Failed to load default config file")?,
    };

    let mut builder = TransformConfigBuilder::from_config(base);
    if let Some(timeout) = args.timeout {
        builder = builder.timeout_ms(timeout);
    }
    if let Some(user_agent) = &args.user_agent {
        builder = builder.user_agent(user_agent.as_str());
    }
    if args.no_mentions {
        builder = builder.mentions(false);
    }
    if args.no_embeds {
        builder = builder.embeds(false);
    }
    if args.no_algorithms {
        builder = builder.algorithms(false);
    }

    let config = builder.build();
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

async fn run<F: PageFetcher>(fetcher: F, config: TransformConfig, html: &str) -> RunOutput {
    let transformer = Transformer::with_fetcher(fetcher, config);
    let mut tree = DocumentTree::parse(html);
    let report = transformer.transform(&mut tree).await;

    RunOutput { html: tree.to_html(), report, records: transformer.cache().records() }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    let config = load_config(&args)?;
    tracing::debug!(?config, "configuration loaded");

    let html = if args.input == "-" {
        if args.verbose {
            print_step(1, 3, "Reading from stdin");
        }
        fetch_stdin().context("Failed to read from stdin")?
    } else {
        if args.verbose {
            print_step(1, 3, &format!("Reading from file {}", args.input.bright_white()));
        }
        fetch_file(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?
    };

    if args.verbose {
        print_detail("Size", &format_size(html.len()));
        eprintln!();
        let mode = if args.offline { "offline" } else { "online" };
        print_step(2, 3, &format!("Transforming document ({})", mode));
        print_detail("Timeout", &format!("{} ms", config.fetch.timeout_ms));
    }

    let started = Instant::now();
    let output = if args.offline {
        run(OfflineFetcher, config, &html).await
    } else {
        let fetcher = HttpFetcher::new().context("Failed to build HTTP client")?;
        run(fetcher, config, &html).await
    };

    if args.verbose {
        echo::print_timing("Transform", started.elapsed());
        print_report(&output.report, output.records.len());
        print_step(3, 3, "Writing output");
        print_detail("Format", &format!("{:?}", args.format));
        eprintln!();
    }

    let rendered = match args.format {
        OutputFormat::Html => output.html,
        OutputFormat::Json => {
            let metadata = output.records.iter().map(|(url, record)| (url.as_str(), record.as_ref())).collect();
            let json = JsonOutput { html: &output.html, report: output.report, metadata };
            serde_json::to_string_pretty(&json).context("Failed to serialize JSON output")?
        }
    };

    match args.output {
        Some(path) => {
            fs::write(&path, rendered).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", rendered);
        }
    }

    Ok(())
}
