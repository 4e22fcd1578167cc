mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod workflow;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::ticket::{self, TicketCommandArgs};
use crate::config::{AppConfig, OutputFormat};
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::{TeraTemplateRenderer, VaderSentimentScorer};

#[derive(Parser)]
#[command(name = "triage", author, version, about = "Support ticket triage CLI")]
struct Cli {
    /// Log classification details.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify one ticket and draft a reply.
    Analyze(InputArgs),
    /// Process a JSON array of tickets concurrently.
    Batch(InputArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct InputArgs {
    /// Ticket JSON file; reads stdin when omitted or '-'.
    input: Option<PathBuf>,

    /// Override the configured output format (text/json).
    #[arg(short, long)]
    format: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config(args) => {
            init_logging(cli.verbose, "info");
            config_cmd::run(args.command)
        }
        Commands::Analyze(args) => {
            let (context, format) = prepare(cli.verbose, &args)?;
            let resolution = ticket::analyze(&context, input_args(args)).await?;
            println!("{}", ticket::render(&[resolution], format)?);
            Ok(())
        }
        Commands::Batch(args) => {
            let (context, format) = prepare(cli.verbose, &args)?;
            let resolutions = ticket::batch(&context, input_args(args)).await?;
            println!("{}", ticket::render(&resolutions, format)?);
            Ok(())
        }
    }
}

fn prepare(verbose: bool, args: &InputArgs) -> AppResult<(AppContext, OutputFormat)> {
    let config = AppConfig::load()?;
    init_logging(verbose, &config.log_level);

    let format = match args.format.as_deref() {
        Some(value) => OutputFormat::from_str(value).ok_or_else(|| {
            error::AppError::Configuration(format!("unknown output format '{value}'"))
        })?,
        None => config.output_format,
    };

    let context = AppContext::new(
        config,
        Arc::new(VaderSentimentScorer::new()),
        Arc::new(TeraTemplateRenderer::new()),
    );
    Ok((context, format))
}

fn input_args(args: InputArgs) -> TicketCommandArgs {
    TicketCommandArgs { input: args.input }
}

fn init_logging(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("triage=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("triage={level}")))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
