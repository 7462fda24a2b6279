//! emq - offline checker for EMQ request documents
//!
//! Runs the same validation the client performs before sending, so request
//! fixtures and generated payloads can be checked without a queue service.

mod check;
mod config;

use clap::{Parser, Subcommand};
use emq_validator::RequestValidator;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::check::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "emq")]
#[command(about = "Validate EMQ requests before they are sent", long_about = None)]
struct Args {
    /// Configuration file (defaults to ./emq.toml when present)
    #[arg(short, long, global = true, env = "EMQ_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "EMQ_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate request documents (JSON)
    Check {
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Request documents to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the effective range table
    Ranges,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let config = config::Config::load(args.config.as_deref())?;

    let level = args.log_level.as_deref().unwrap_or(&config.log.level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("emq={level},emq_validator={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let validator = RequestValidator::new(config.ranges);

    match args.command {
        Command::Check { format, files } => {
            info!(files = files.len(), "Checking request documents");
            if check::run(&validator, &files, format) {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Ranges => {
            print!("{}", toml::to_string(validator.ranges())?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
