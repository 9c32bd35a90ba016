use std::path::PathBuf;

use clap::Args;

use crate::cli::{load_records, CliInputFormat, GroupingArg, OutputFormat};
use crate::diversity::accumulation::accumulation_curve;
use crate::pipeline::{
    PipelineConfig, PipelineContext, DEFAULT_ACCUMULATION_TRIALS, DEFAULT_SEED,
};

#[derive(Args)]
pub struct AccumulateArgs {
    /// Input file (TSV, CSV, or JSON). Use '-' for stdin (expects TSV)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Input format (auto-detected by default)
    #[arg(long)]
    pub input_format: Option<CliInputFormat>,

    /// Site grouping scheme
    #[arg(short, long, value_enum, default_value = "country")]
    pub grouping: GroupingArg,

    /// Number of random site-order permutations
    #[arg(long, default_value_t = DEFAULT_ACCUMULATION_TRIALS)]
    pub trials: usize,

    /// Base seed for the permutation trials
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

/// Execute accumulate subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be parsed or the configuration
/// is invalid.
pub fn run(args: &AccumulateArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let raw = load_records(&args.input, args.input_format)?;

    let config = PipelineConfig {
        accumulation_trials: args.trials,
        seed: args.seed,
        ..PipelineConfig::default()
    };
    let ctx = PipelineContext::build(&raw, config)?;

    let matrix = ctx.matrix(args.grouping.into());
    let curve = accumulation_curve(matrix, args.trials, args.seed);

    if verbose {
        eprintln!(
            "Accumulated {} sites over {} trials (seed {})",
            matrix.n_sites(),
            args.trials,
            args.seed
        );
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&curve)?);
        }
        OutputFormat::Tsv => {
            println!("sites_pooled\tmean_richness\tsd_richness");
            for p in &curve.points {
                println!(
                    "{}\t{:.4}\t{:.4}",
                    p.sites_pooled, p.mean_richness, p.sd_richness
                );
            }
        }
        OutputFormat::Text => {
            println!(
                "Species accumulation over {} {} sites ({} trials)",
                curve.points.len(),
                curve.grouping,
                curve.trials
            );
            for p in &curve.points {
                println!(
                    "  {:>3} pooled: {:.2} ± {:.2}",
                    p.sites_pooled, p.mean_richness, p.sd_richness
                );
            }
        }
    }

    Ok(())
}
