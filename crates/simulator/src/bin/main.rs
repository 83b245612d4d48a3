//! Machine-repair simulator CLI
//!
//! Runs a single traced simulation or a batch of Monte Carlo replications.

use clap::{Args, Parser, Subcommand};
use repairsim_simulator::{Simulator, SimulatorConfig, TimeDistribution};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "repairsim")]
#[command(about = "Time-to-failure simulation of a machine-repair system with spares")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ModelArgs {
    /// Units in active service
    #[arg(short = 'n', long, default_value = "10")]
    operating: usize,

    /// Spare units
    #[arg(short, long, default_value = "3")]
    spares: usize,

    /// Breakdown time distribution (fixed:<v>, exp:<mean>, uniform:<lo>:<hi>)
    #[arg(short, long, default_value = "exp:1")]
    breakdown: TimeDistribution,

    /// Repair time distribution (fixed:<v>, exp:<mean>, uniform:<lo>:<hi>)
    #[arg(short, long, default_value = "exp:0.125")]
    repair: TimeDistribution,

    /// Random seed
    #[arg(long, default_value = "12345")]
    seed: u64,

    /// Stop each run at this simulated time if the system has not failed
    #[arg(long)]
    horizon: Option<f64>,
}

impl ModelArgs {
    fn to_config(&self) -> SimulatorConfig {
        let config = SimulatorConfig::new(self.operating, self.spares)
            .with_breakdown(self.breakdown)
            .with_repair(self.repair)
            .with_seed(self.seed);
        match self.horizon {
            Some(horizon) => config.with_horizon(horizon),
            None => config,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single simulation
    Run {
        #[command(flatten)]
        model: ModelArgs,

        /// Replication index, selects the random streams
        #[arg(long, default_value = "0")]
        index: u64,

        /// Write the snapshot trace to this file as JSON
        #[arg(long)]
        trace: Option<PathBuf>,
    },

    /// Run many independent replications and summarize time to failure
    Replicate {
        #[command(flatten)]
        model: ModelArgs,

        /// Number of replications
        #[arg(short = 'k', long, default_value = "1000")]
        replications: u64,

        /// Run replications on a single thread
        #[arg(long)]
        sequential: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            model,
            index,
            trace,
        } => {
            let simulator = Simulator::new(model.to_config().with_replications(1))?;
            let report = simulator.run_replication(index, trace.is_some())?;

            match report.failure_time() {
                Some(time) => println!("System failed at t = {:.6}", time),
                None => println!("No failure before horizon t = {:.6}", report.end_time),
            }
            println!("Events processed: {}", report.events_processed);

            if let Some(path) = trace {
                let writer = BufWriter::new(File::create(&path)?);
                serde_json::to_writer_pretty(writer, &report.snapshots)?;
                println!(
                    "Wrote {} snapshots to {}",
                    report.snapshots.len(),
                    path.display()
                );
            }
        }

        Commands::Replicate {
            model,
            replications,
            sequential,
            json,
        } => {
            let mut config = model.to_config().with_replications(replications);
            if sequential {
                config = config.sequential();
            }

            let report = Simulator::new(config)?.run()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.print();
            }
        }
    }

    Ok(())
}
