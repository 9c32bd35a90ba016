//! Command-line interface for bindiv.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **summary**: Headline counts over a cleaned record set
//! - **diversity**: Per-site diversity table for a grouping
//! - **rarefy**: Rarefaction curves per site
//! - **accumulate**: Species-accumulation curves for a grouping
//! - **ordinate**: 2D NMDS ordination of sites
//! - **network**: Shared-unit network between zones
//!
//! ## Usage
//!
//! ```text
//! # Summary counts from a record export
//! bindiv summary records.tsv
//!
//! # Pipe TSV from another tool
//! cat records.tsv | bindiv summary -
//!
//! # Zone-level diversity table as JSON
//! bindiv diversity records.tsv --grouping zone --format json
//!
//! # Reproducible accumulation curves
//! bindiv accumulate records.tsv --trials 500 --seed 7
//!
//! # Zone network with zero-weight edges included
//! bindiv network records.tsv --dense
//! ```

use std::io::Read;
use std::path::Path;

use clap::{Parser, Subcommand};

use crate::core::record::RawRecord;
use crate::core::types::Grouping;
use crate::parsing::{self, InputFormat};

pub mod accumulate;
pub mod diversity;
pub mod network;
pub mod ordinate;
pub mod rarefy;
pub mod summary;

#[derive(Parser)]
#[command(name = "bindiv")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Diversity statistics for geotagged DNA-barcode specimen records")]
#[command(
    long_about = "bindiv ingests geotagged DNA-barcode specimen records and computes community-ecology diversity statistics across source countries and absolute-latitude zones.\n\nIt cleans and classifies records, builds dense site-by-unit community matrices, and derives:\n- Richness, rarefied richness, Shannon and Simpson indices per site\n- Rarefaction and species-accumulation curves\n- A 2D NMDS ordination of sites by Bray-Curtis dissimilarity\n- A shared-unit network between latitude zones"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize a record set: counts, names, latitude range
    Summary(summary::SummaryArgs),

    /// Per-site diversity indices for a grouping
    Diversity(diversity::DiversityArgs),

    /// Rarefaction curves per site
    Rarefy(rarefy::RarefyArgs),

    /// Species-accumulation curves for a grouping
    Accumulate(accumulate::AccumulateArgs),

    /// 2D NMDS ordination of sites
    Ordinate(ordinate::OrdinateArgs),

    /// Shared-unit network between zones
    Network(network::NetworkArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum CliInputFormat {
    Tsv,
    Csv,
    Json,
}

impl From<CliInputFormat> for InputFormat {
    fn from(value: CliInputFormat) -> Self {
        match value {
            CliInputFormat::Tsv => Self::Tsv,
            CliInputFormat::Csv => Self::Csv,
            CliInputFormat::Json => Self::Json,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum GroupingArg {
    #[default]
    Country,
    Zone,
    Overall,
}

impl From<GroupingArg> for Grouping {
    fn from(value: GroupingArg) -> Self {
        match value {
            GroupingArg::Country => Self::Country,
            GroupingArg::Zone => Self::Zone,
            GroupingArg::Overall => Self::Overall,
        }
    }
}

/// Load raw records from a file, or TSV from stdin when the path is '-'
pub fn load_records(
    path: &Path,
    format: Option<CliInputFormat>,
) -> anyhow::Result<Vec<RawRecord>> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        let delimiter = format.map_or('\t', |f| InputFormat::from(f).delimiter());
        return Ok(parsing::tsv::parse_delimited_text(&text, delimiter)?);
    }
    Ok(parsing::parse_records_file(path, format.map(Into::into))?)
}

/// Render an optional statistic, distinguishing undefined from zero
#[must_use]
pub fn fmt_stat(value: Option<f64>) -> String {
    value.map_or_else(|| "NA".to_string(), |v| format!("{v:.4}"))
}
