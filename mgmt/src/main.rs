//! # mgmt-introspect
//!
//! Discovers the resource schema of every configured target on a management server and
//! writes one JSON document per target.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueHint};
use mgmt_model::logging::{TracingLevel, init_tracing, parse_level};
use mgmt_model::runner::run_targets;
use mgmt_model::{Config, HttpManagementClient, SchemaIntrospector};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "mgmt-introspect")]
#[command(about = "Discover management resource schemas and dump them as JSON", long_about = None)]
struct Cli {
    /// Configuration file (connection settings and targets)
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    config: PathBuf,

    /// Directory receiving one `<target>.json` per target
    #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    output: PathBuf,

    /// error, warn, info, debug or trace; `RUST_LOG` overrides
    #[arg(long, value_name = "LEVEL", default_value = "warn", value_parser = parse_level)]
    log_level: TracingLevel,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(report) = init_tracing(cli.log_level, cli.log_file.as_deref()) {
        eprintln!("{report:?}");
        return ExitCode::FAILURE;
    }

    info!("Config: {}", cli.config.display());
    info!("Output: {}", cli.output.display());

    let config = match Config::from_json_file(&cli.config) {
        Ok(config) => config,
        Err(report) => {
            error!("{report:?}");
            eprintln!("{report:?}");
            return ExitCode::FAILURE;
        }
    };

    let client = match HttpManagementClient::new(&config.connection) {
        Ok(client) => client,
        Err(report) => {
            error!("{report:?}");
            eprintln!("{report:?}");
            return ExitCode::FAILURE;
        }
    };

    let introspector = SchemaIntrospector::new(client);
    match run_targets(&introspector, &config.targets, &cli.output).await {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(summary) => {
            for failure in &summary.failed {
                eprintln!("Target {} failed", failure.name);
            }
            ExitCode::FAILURE
        }
        Err(report) => {
            error!("{report:?}");
            eprintln!("{report:?}");
            ExitCode::FAILURE
        }
    }
}
