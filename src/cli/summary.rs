use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::cli::{fmt_stat, load_records, CliInputFormat, OutputFormat};
use crate::pipeline::summary::{spatial_density, SpatialCell, SummaryCounts};
use crate::pipeline::{PipelineConfig, PipelineContext};

#[derive(Args)]
pub struct SummaryArgs {
    /// Input file (TSV, CSV, or JSON). Use '-' for stdin (expects TSV)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Input format (auto-detected by default)
    #[arg(long)]
    pub input_format: Option<CliInputFormat>,

    /// Also report record density on an integer-degree coordinate grid
    #[arg(long)]
    pub spatial: bool,
}

#[derive(Serialize)]
struct SummaryReport {
    counts: SummaryCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    spatial_density: Option<Vec<SpatialCell>>,
}

/// Execute summary subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be parsed.
pub fn run(args: &SummaryArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let raw = load_records(&args.input, args.input_format)?;
    if verbose {
        eprintln!("Parsed {} raw records from input", raw.len());
    }

    let ctx = PipelineContext::build(&raw, PipelineConfig::default())?;
    let counts = ctx.summary();
    let spatial = args.spatial.then(|| spatial_density(ctx.records()));

    match format {
        OutputFormat::Json => {
            let report = SummaryReport {
                counts,
                spatial_density: spatial,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Tsv => {
            println!("metric\tvalue");
            println!("total_records\t{}", counts.total_records);
            println!("cleaned_records\t{}", counts.cleaned_records);
            println!("dropped_records\t{}", counts.dropped_records);
            println!("unique_units\t{}", counts.unique_units);
            println!("unique_families\t{}", counts.unique_families);
            println!("unique_genera\t{}", counts.unique_genera);
            println!("unique_species\t{}", counts.unique_species);
            println!("unique_countries\t{}", counts.unique_countries);
            println!("latitude_min\t{}", fmt_stat(counts.latitude_min));
            println!("latitude_max\t{}", fmt_stat(counts.latitude_max));
            if let Some(cells) = spatial {
                println!();
                println!("latitude\tlongitude\trecords");
                for c in cells {
                    println!("{}\t{}\t{}", c.latitude, c.longitude, c.records);
                }
            }
        }
        OutputFormat::Text => {
            println!("Records:   {} total, {} cleaned, {} dropped",
                counts.total_records, counts.cleaned_records, counts.dropped_records);
            println!("Units:     {} taxonomic units", counts.unique_units);
            println!(
                "Taxonomy:  {} families, {} genera, {} species",
                counts.unique_families, counts.unique_genera, counts.unique_species
            );
            println!("Countries: {}", counts.unique_countries);
            println!(
                "Latitude:  {} to {}",
                fmt_stat(counts.latitude_min),
                fmt_stat(counts.latitude_max)
            );
            if let Some(cells) = spatial {
                println!();
                println!("Spatial density ({} occupied cells):", cells.len());
                for c in cells {
                    println!("  ({:>4}, {:>5}): {} records", c.latitude, c.longitude, c.records);
                }
            }
        }
    }

    Ok(())
}
