use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use goal_planner::core::{FireInputs, fire_targets};
use goal_planner::data::SnapshotProvider;
use goal_planner::{api, service};

#[derive(Parser, Debug)]
#[command(
    name = "goal-planner",
    version,
    about = "Goal-based SIP planner with net worth and FIRE sizing"
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the planner over HTTP
    Serve {
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(short = 'H', long, default_value = "0.0.0.0")]
        host: String,
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },
    /// Print the monthly SIP required per asset class
    Plan {
        #[arg(long)]
        snapshot: PathBuf,
    },
    /// Print current versus required investable allocation
    Reconcile {
        #[arg(long)]
        snapshot: PathBuf,
    },
    /// Print lean, regular and fat FIRE targets
    Fire {
        #[arg(long)]
        current_age: u32,
        #[arg(long)]
        retirement_age: u32,
        #[arg(long, help = "Defaults to --retirement-age")]
        early_retirement_age: Option<u32>,
        #[arg(long, help = "Current monthly expense")]
        monthly_expense: f64,
        #[arg(long, default_value_t = 6.0, help = "Annual inflation in percent")]
        inflation: f64,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Serve {
            snapshot,
            host,
            port,
        } => {
            let provider = SnapshotProvider::from_path(&snapshot)?;
            tracing::info!(snapshot = %snapshot.display(), "loaded snapshot");
            api::run_http_server(Arc::new(provider), &host, port).await?;
        }
        Command::Plan { snapshot } => {
            let provider = SnapshotProvider::from_path(snapshot)?;
            print_json(&service::sip_allocation(&provider)?)?;
        }
        Command::Reconcile { snapshot } => {
            let provider = SnapshotProvider::from_path(snapshot)?;
            print_json(&service::investable_allocation(&provider)?)?;
        }
        Command::Fire {
            current_age,
            retirement_age,
            early_retirement_age,
            monthly_expense,
            inflation,
        } => {
            let inputs = FireInputs {
                current_age,
                retirement_age,
                early_retirement_age: early_retirement_age.unwrap_or(retirement_age),
                monthly_expense,
                inflation_percentage: inflation,
            };
            print_json(&fire_targets(&inputs))?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
