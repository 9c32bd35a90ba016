//! Parsers for raw specimen-record files from the acquisition
//! collaborator.
//!
//! Two shapes are supported:
//!
//! - **TSV/CSV**: a header row naming the contract fields (`id`,
//!   `taxonomic_unit_id`, `family`, `genus`, `species`, `country`,
//!   `region`, `latitude`, `longitude`, `elevation`), columns in any
//!   order, empty cells meaning absent
//! - **JSON**: an array of record objects with the same fields
//!
//! Parsing is the structural boundary: truncated rows and unreadable
//! files are errors here, while records that are merely incomplete pass
//! through as [`RawRecord`]s for the cleaner's filtering policy.

pub mod json;
pub mod tsv;

use std::path::Path;

use thiserror::Error;

use crate::core::record::RawRecord;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Failed to parse JSON records: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot detect input format of '{0}'; expected .tsv, .csv, or .json")]
    UnknownFormat(String),
}

/// Input file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Tsv,
    Csv,
    Json,
}

impl InputFormat {
    /// Detect format from the file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "tsv" | "txt" => Some(Self::Tsv),
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    #[must_use]
    pub fn delimiter(self) -> char {
        match self {
            Self::Csv => ',',
            Self::Tsv | Self::Json => '\t',
        }
    }
}

/// Parse a record file, detecting the format from its extension unless
/// one is given explicitly.
///
/// # Errors
///
/// Returns `ParseError` when the format cannot be detected, the file
/// cannot be read, or its structure is invalid.
pub fn parse_records_file(
    path: &Path,
    format: Option<InputFormat>,
) -> Result<Vec<RawRecord>, ParseError> {
    let format = format
        .or_else(|| InputFormat::from_path(path))
        .ok_or_else(|| ParseError::UnknownFormat(path.display().to_string()))?;

    match format {
        InputFormat::Json => json::parse_json_file(path),
        delimited => tsv::parse_delimited_file(path, delimited.delimiter()),
    }
}
