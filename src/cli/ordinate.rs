use std::path::PathBuf;

use clap::Args;

use crate::cli::{load_records, CliInputFormat, GroupingArg, OutputFormat};
use crate::ordination::nmds::{
    ordinate, NmdsConfig, DEFAULT_MAX_ITERATIONS, DEFAULT_RESTARTS, DEFAULT_TOLERANCE,
};
use crate::pipeline::{PipelineConfig, PipelineContext, DEFAULT_SEED};

#[derive(Args)]
pub struct OrdinateArgs {
    /// Input file (TSV, CSV, or JSON). Use '-' for stdin (expects TSV)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Input format (auto-detected by default)
    #[arg(long)]
    pub input_format: Option<CliInputFormat>,

    /// Site grouping scheme
    #[arg(short, long, value_enum, default_value = "country")]
    pub grouping: GroupingArg,

    /// Random initial configurations to try
    #[arg(long, default_value_t = DEFAULT_RESTARTS)]
    pub restarts: usize,

    /// Iteration budget per restart
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_iterations: usize,

    /// Stress-improvement convergence tolerance
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    pub tolerance: f64,

    /// Seed for the random restarts
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

/// Execute ordinate subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be parsed or the configuration
/// is invalid.
pub fn run(args: &OrdinateArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let raw = load_records(&args.input, args.input_format)?;

    let nmds_config = NmdsConfig {
        restarts: args.restarts,
        max_iterations: args.max_iterations,
        tolerance: args.tolerance,
    };
    let config = PipelineConfig {
        seed: args.seed,
        nmds: nmds_config,
        ..PipelineConfig::default()
    };
    let ctx = PipelineContext::build(&raw, config)?;

    let matrix = ctx.matrix(args.grouping.into());
    let result = ordinate(matrix, &nmds_config, args.seed);

    if verbose {
        eprintln!(
            "NMDS over {} sites: stress {:.4}, converged: {}",
            result.sites.len(),
            result.stress,
            result.converged
        );
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Tsv => {
            println!("site\tnmds1\tnmds2");
            for (site, coords) in result.sites.iter().zip(&result.coordinates) {
                println!("{}\t{:.6}\t{:.6}", site, coords[0], coords[1]);
            }
            eprintln!("stress\t{:.6}\tconverged\t{}", result.stress, result.converged);
        }
        OutputFormat::Text => {
            println!(
                "NMDS (stress {:.4}{})",
                result.stress,
                if result.converged {
                    ""
                } else {
                    ", DID NOT CONVERGE"
                }
            );
            for (site, coords) in result.sites.iter().zip(&result.coordinates) {
                println!("  {:<24} ({:>9.4}, {:>9.4})", site, coords[0], coords[1]);
            }
        }
    }

    Ok(())
}
