use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::cli::{load_records, CliInputFormat, OutputFormat};
use crate::core::types::Grouping;
use crate::network::{NetworkEdge, NetworkVertex, ZoneNetwork};
use crate::pipeline::{PipelineConfig, PipelineContext};

#[derive(Args)]
pub struct NetworkArgs {
    /// Input file (TSV, CSV, or JSON). Use '-' for stdin (expects TSV)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Input format (auto-detected by default)
    #[arg(long)]
    pub input_format: Option<CliInputFormat>,

    /// Keep zero-weight edges (complete graph) instead of omitting them
    #[arg(long)]
    pub dense: bool,
}

#[derive(Serialize)]
struct NetworkReport<'a> {
    vertices: &'a [NetworkVertex],
    edges: Vec<NetworkEdge>,
}

/// Execute network subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be parsed.
pub fn run(args: &NetworkArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let raw = load_records(&args.input, args.input_format)?;
    let ctx = PipelineContext::build(&raw, PipelineConfig::default())?;

    let network = ZoneNetwork::build(ctx.matrix(Grouping::Zone));
    let edges = if args.dense {
        network.dense_edges().to_vec()
    } else {
        network.sparse_edges()
    };

    if verbose {
        eprintln!(
            "Zone network: {} vertices, {} edges ({})",
            network.vertices().len(),
            edges.len(),
            if args.dense { "dense" } else { "sparse" }
        );
    }

    match format {
        OutputFormat::Json => {
            let report = NetworkReport {
                vertices: network.vertices(),
                edges,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Tsv => {
            println!("zone\tunique_unit_count");
            for v in network.vertices() {
                println!("{}\t{}", v.zone, v.unique_unit_count);
            }
            println!();
            println!("zone_a\tzone_b\tshared_unit_count");
            for e in &edges {
                println!("{}\t{}\t{}", e.zone_a, e.zone_b, e.shared_unit_count);
            }
        }
        OutputFormat::Text => {
            println!("Vertices:");
            for v in network.vertices() {
                println!("  {:<14} {} units", v.zone.to_string(), v.unique_unit_count);
            }
            println!("Edges:");
            for e in &edges {
                println!(
                    "  {} -- {}: {} shared units",
                    e.zone_a, e.zone_b, e.shared_unit_count
                );
            }
        }
    }

    Ok(())
}
