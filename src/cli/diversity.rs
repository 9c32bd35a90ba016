use std::path::PathBuf;

use clap::Args;

use crate::cli::{fmt_stat, load_records, CliInputFormat, GroupingArg, OutputFormat};
use crate::core::types::Grouping;
use crate::diversity::DiversityEngine;
use crate::pipeline::{PipelineConfig, PipelineContext, DEFAULT_MIN_SITE_SPECIMENS};

#[derive(Args)]
pub struct DiversityArgs {
    /// Input file (TSV, CSV, or JSON). Use '-' for stdin (expects TSV)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Input format (auto-detected by default)
    #[arg(long)]
    pub input_format: Option<CliInputFormat>,

    /// Site grouping scheme
    #[arg(short, long, value_enum, default_value = "country")]
    pub grouping: GroupingArg,

    /// Exclude sites at or below this specimen count
    #[arg(long, default_value_t = DEFAULT_MIN_SITE_SPECIMENS)]
    pub min_specimens: u64,

    /// Reference sample size for rarefied richness
    /// (defaults to the smallest qualifying site's total)
    #[arg(long)]
    pub reference: Option<u64>,
}

/// Execute diversity subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be parsed or the configuration
/// is invalid.
pub fn run(args: &DiversityArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let raw = load_records(&args.input, args.input_format)?;

    let config = PipelineConfig {
        min_site_specimens: args.min_specimens,
        rarefaction_reference: args.reference,
        ..PipelineConfig::default()
    };
    let ctx = PipelineContext::build(&raw, config)?;

    let grouping = Grouping::from(args.grouping);
    let matrix = ctx.matrix(grouping);
    let engine = DiversityEngine::with_policy(matrix, args.min_specimens, args.reference);

    // The zone column only applies to country rows
    let zones = match grouping {
        Grouping::Country => Some(ctx.country_zones()),
        _ => None,
    };
    let summaries = engine.summaries(zones);

    if verbose {
        eprintln!(
            "{} of {} sites qualify (more than {} specimens); rarefaction reference: {}",
            summaries.len(),
            matrix.n_sites(),
            args.min_specimens,
            engine
                .reference_sample_size()
                .map_or_else(|| "none".to_string(), |m| m.to_string()),
        );
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        OutputFormat::Tsv => {
            println!(
                "site\tspecimen_count\trichness\trarefied_richness\tshannon\tsimpson\tpielou_evenness\tzone"
            );
            for s in &summaries {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    s.site_id,
                    s.specimen_count,
                    s.richness,
                    fmt_stat(s.rarefied_richness),
                    fmt_stat(s.shannon),
                    fmt_stat(s.simpson),
                    fmt_stat(s.pielou_evenness),
                    s.zone.map_or_else(|| "NA".to_string(), |z| z.to_string()),
                );
            }
        }
        OutputFormat::Text => {
            if summaries.is_empty() {
                println!("No sites qualify (more than {} specimens required)", args.min_specimens);
                return Ok(());
            }
            println!(
                "{:<24} {:>10} {:>9} {:>10} {:>8} {:>8} {:>8}  {}",
                "site", "specimens", "richness", "rarefied", "shannon", "simpson", "evenness", "zone"
            );
            for s in &summaries {
                println!(
                    "{:<24} {:>10} {:>9} {:>10} {:>8} {:>8} {:>8}  {}",
                    s.site_id,
                    s.specimen_count,
                    s.richness,
                    fmt_stat(s.rarefied_richness),
                    fmt_stat(s.shannon),
                    fmt_stat(s.simpson),
                    fmt_stat(s.pielou_evenness),
                    s.zone.map_or_else(|| "-".to_string(), |z| z.to_string()),
                );
            }
        }
    }

    Ok(())
}
