use std::path::PathBuf;

use anyhow::{Context, Result};
use atmi_core::{BandwidthRule, CorrelatedSamplingEngine, SamplingMode};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod io;

/// Correlated resampling of historical atmospheric variables
#[derive(Parser, Debug)]
#[command(name = "atmi-sampler")]
#[command(about = "Synthetic atmosphere realizations with preserved correlations", long_about = None)]
struct Args {
    /// CSV file per realization (header = variable names, rows = aligned observations)
    #[arg(short, long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// Number of synthetic draws per realization
    #[arg(short = 'n', long, default_value_t = 1000)]
    samples: usize,

    /// Sampler (independent, gaussian, correlated)
    #[arg(short, long, default_value = "correlated")]
    mode: SamplingMode,

    /// KDE bandwidth rule (scott, silverman or a fixed factor)
    #[arg(short, long, default_value = "scott")]
    bandwidth: BandwidthRule,

    /// Seed for reproducible draws
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory receiving the output files
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Output file name prefix, followed by the realization index
    #[arg(short, long, default_value = "sampling")]
    prefix: String,
}

fn run(args: &Args) -> Result<Vec<PathBuf>> {
    let atmospheres = args
        .input
        .iter()
        .map(|path| {
            info!("Datafile\t->\t{}", path.display());
            io::read_realization(path, args.bandwidth)
        })
        .collect::<Result<Vec<_>>>()?;

    for (index, atm) in atmospheres.iter().enumerate().skip(1) {
        if atm.names() != atmospheres[0].names() {
            warn!(
                index,
                names = ?atm.names(),
                "Variable names differ from the first realization, pairing by position"
            );
        }
    }

    let engine = CorrelatedSamplingEngine::new(atmospheres)?;
    for (index, atm) in engine.atmospheres().iter().enumerate() {
        info!(
            index,
            names = ?atm.names(),
            means = ?atm.means().as_slice(),
            stdevs = ?atm.stdevs().as_slice(),
            "Realization loaded"
        );
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let samples = engine.sample_mode(args.mode, args.samples, &mut rng)?;

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    let mut written = Vec::with_capacity(engine.realization_count());
    for (index, (atm, draws)) in engine
        .atmospheres()
        .iter()
        .zip(samples.realizations())
        .enumerate()
    {
        let path = args.output_dir.join(format!("{}{index}.csv", args.prefix));
        io::write_realization(&path, atm.names(), draws)?;
        info!("Sampling file saved in {}", path.display());
        written.push(path);
    }
    Ok(written)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!(
        mode = ?args.mode,
        samples = args.samples,
        realizations = args.input.len(),
        "Starting atmosphere sampling"
    );
    run(&args)?;
    Ok(())
}
