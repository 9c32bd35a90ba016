use std::path::Path;

use crate::core::record::RawRecord;
use crate::parsing::ParseError;

/// Parse a JSON file containing an array of raw record objects.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read or
/// `ParseError::Json` if the content is not a valid record array.
pub fn parse_json_file(path: &Path) -> Result<Vec<RawRecord>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_json_text(&content)
}

/// Parse a JSON array of raw record objects.
///
/// # Errors
///
/// Returns `ParseError::Json` if the text is not a valid record array or
/// `ParseError::InvalidFormat` if it holds no records.
pub fn parse_json_text(text: &str) -> Result<Vec<RawRecord>, ParseError> {
    let records: Vec<RawRecord> = serde_json::from_str(text)?;
    if records.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No records found in file".to_string(),
        ));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_records() {
        let json = r#"[
            {"id": "R1", "taxonomic_unit_id": "BOLD:AAA0001", "country": "Peru", "latitude": -12.5},
            {"id": "R2", "country": "Chile"}
        ]"#;
        let records = parse_json_text(json).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].latitude, Some(-12.5));
        assert!(records[1].taxonomic_unit_id.is_none());
    }

    #[test]
    fn test_parse_json_empty_array_is_error() {
        assert!(parse_json_text("[]").is_err());
    }

    #[test]
    fn test_parse_json_invalid_is_error() {
        assert!(parse_json_text("{not json").is_err());
    }
}
