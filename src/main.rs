// Command-line entry point for gomap.

use anyhow::Result;
use clap::Parser;
use gomap::api::JsonExporter;
use gomap::application::AnalyzeUsecase;
use gomap::infrastructure::concurrency::init_thread_pool;
use gomap::infrastructure::{AnalysisConfig, GoParser, OutputFormat};
use gomap::ports::dot_exporter::DotExporter;
use gomap::ports::markdown_exporter::MarkdownExporter;
use gomap::ports::OutputExporter;
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Map the structure and call graph of a Go project", long_about = None)]
struct Cli {
    /// Project root to analyze
    #[arg(short, long, default_value = ".")]
    path: PathBuf,

    /// Output file path
    #[arg(short, long, default_value = "code_structure.md")]
    output: String,

    /// Output format (overrides the config file)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Worker threads (default: half the cores)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Config file (default: <path>/gomap.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rows in the most-called table
    #[arg(long)]
    top: Option<usize>,

    /// Skip _test.go files
    #[arg(long)]
    no_tests: bool,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = AnalysisConfig::discover(cli.config.as_deref(), &cli.path)?;
    if cli.no_tests {
        config.include_tests = false;
    }
    if cli.top.is_some() {
        config.most_called_limit = cli.top;
    }
    init_thread_pool(cli.jobs.or(config.jobs))?;

    let format = cli.format.or(config.format).unwrap_or(OutputFormat::Markdown);
    let exporter: Box<dyn OutputExporter> = match format {
        OutputFormat::Markdown => Box::new(MarkdownExporter),
        OutputFormat::Json => Box::new(JsonExporter),
        OutputFormat::Dot => Box::new(DotExporter),
    };

    let usecase = AnalyzeUsecase {
        parser: &GoParser,
        exporter: exporter.as_ref(),
    };
    let run = usecase.run(&cli.path, &config, &cli.output)?;

    let stats = run.model.statistics();
    info!(
        "analyzed {} packages: {} functions, {} methods, {} call edges",
        stats.packages, stats.functions, stats.methods, stats.call_edges
    );
    Ok(())
}
