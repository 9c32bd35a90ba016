use std::path::PathBuf;

use clap::Args;

use crate::cli::{load_records, CliInputFormat, GroupingArg, OutputFormat};
use crate::diversity::rarefaction::rarefaction_curves;
use crate::pipeline::{PipelineConfig, PipelineContext, DEFAULT_RAREFACTION_POINTS};

#[derive(Args)]
pub struct RarefyArgs {
    /// Input file (TSV, CSV, or JSON). Use '-' for stdin (expects TSV)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Input format (auto-detected by default)
    #[arg(long)]
    pub input_format: Option<CliInputFormat>,

    /// Site grouping scheme
    #[arg(short, long, value_enum, default_value = "country")]
    pub grouping: GroupingArg,

    /// Target number of grid points per curve
    #[arg(long, default_value_t = DEFAULT_RAREFACTION_POINTS)]
    pub points: usize,
}

/// Execute rarefy subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be parsed or the configuration
/// is invalid.
pub fn run(args: &RarefyArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let raw = load_records(&args.input, args.input_format)?;

    let config = PipelineConfig {
        rarefaction_points: args.points,
        ..PipelineConfig::default()
    };
    let ctx = PipelineContext::build(&raw, config)?;

    let matrix = ctx.matrix(args.grouping.into());
    let curves = rarefaction_curves(matrix, args.points);

    if verbose {
        eprintln!("Computed {} rarefaction curves", curves.len());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&curves)?);
        }
        OutputFormat::Tsv => {
            println!("site\tsample_size\texpected_richness");
            for curve in &curves {
                for p in &curve.points {
                    println!(
                        "{}\t{}\t{:.4}",
                        curve.site_id, p.sample_size, p.expected_richness
                    );
                }
            }
        }
        OutputFormat::Text => {
            for curve in &curves {
                let last = curve.points.last();
                println!(
                    "{} ({} points, richness {})",
                    curve.site_id,
                    curve.points.len(),
                    last.map_or(0.0, |p| p.expected_richness),
                );
                for p in &curve.points {
                    println!("  m={:<8} E[S]={:.4}", p.sample_size, p.expected_richness);
                }
            }
        }
    }

    Ok(())
}
