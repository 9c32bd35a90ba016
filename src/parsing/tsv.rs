use std::path::Path;

use crate::core::record::RawRecord;
use crate::parsing::ParseError;

/// Parse a TSV/CSV record file with a header row.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse
/// errors if the content is invalid.
pub fn parse_delimited_file(path: &Path, delimiter: char) -> Result<Vec<RawRecord>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_delimited_text(&content, delimiter)
}

/// Parse TSV/CSV text with a header row naming the record fields.
///
/// Columns may appear in any order; unrecognized columns are ignored.
/// An empty cell is an absent value. Numeric cells that fail to parse
/// are treated as absent rather than guessed at — downstream cleaning
/// owns the filtering policy. A row with more fields than the header, or
/// an empty `id`, is a structural error reported with its 1-based line
/// number.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if the header lacks an `id`
/// column, a data row is malformed, or no records are found.
pub fn parse_delimited_text(text: &str, delimiter: char) -> Result<Vec<RawRecord>, ParseError> {
    let mut lines = text.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, line)) if line.trim().is_empty() || line.starts_with('#') => {}
            Some((_, line)) => break line,
            None => {
                return Err(ParseError::InvalidFormat(
                    "No header row found".to_string(),
                ))
            }
        }
    };

    let columns: Vec<&str> = header.split(delimiter).map(str::trim).collect();
    let find = |name: &str| columns.iter().position(|c| c.eq_ignore_ascii_case(name));

    let Some(id_col) = find("id") else {
        return Err(ParseError::InvalidFormat(
            "Header has no 'id' column".to_string(),
        ));
    };
    let unit_col = find("taxonomic_unit_id");
    let family_col = find("family");
    let genus_col = find("genus");
    let species_col = find("species");
    let country_col = find("country");
    let region_col = find("region");
    let latitude_col = find("latitude");
    let longitude_col = find("longitude");
    let elevation_col = find("elevation");

    let mut records = Vec::new();

    for (i, line) in lines {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;

        let fields: Vec<&str> = line.split(delimiter).map(str::trim).collect();
        if fields.len() > columns.len() {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has {} fields but the header has {} columns",
                fields.len(),
                columns.len()
            )));
        }

        let cell = |col: Option<usize>| -> Option<String> {
            col.and_then(|c| fields.get(c))
                .filter(|s| !s.is_empty())
                .map(|s| (*s).to_string())
        };
        let number = |col: Option<usize>| -> Option<f64> {
            cell(col).and_then(|s| s.parse().ok())
        };

        let Some(id) = cell(Some(id_col)) else {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has an empty id"
            )));
        };

        records.push(RawRecord {
            id,
            taxonomic_unit_id: cell(unit_col),
            family: cell(family_col),
            genus: cell(genus_col),
            species: cell(species_col),
            country: cell(country_col),
            region: cell(region_col),
            latitude: number(latitude_col),
            longitude: number(longitude_col),
            elevation: number(elevation_col),
        });
    }

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
    fn test_parse_tsv_text() {
        let tsv = "id\ttaxonomic_unit_id\tcountry\tlatitude\n\
                   R1\tBOLD:AAA0001\tPeru\t-12.5\n\
                   R2\tBOLD:AAA0002\tChile\t\n";

        let records = parse_delimited_text(tsv, '\t').unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "R1");
        assert_eq!(records[0].taxonomic_unit_id.as_deref(), Some("BOLD:AAA0001"));
        assert_eq!(records[0].latitude, Some(-12.5));
        assert!(records[1].latitude.is_none());
    }

    #[test]
    fn test_parse_csv_any_column_order() {
        let csv = "country,id,taxonomic_unit_id\nPeru,R1,BOLD:AAA0001\n";
        let records = parse_delimited_text(csv, ',').unwrap();

        assert_eq!(records[0].id, "R1");
        assert_eq!(records[0].country.as_deref(), Some("Peru"));
    }

    #[test]
    fn test_parse_short_row_fields_absent() {
        // A truncated row leaves its trailing fields absent
        let tsv = "id\ttaxonomic_unit_id\tcountry\nR1\tBOLD:AAA0001\n";
        let records = parse_delimited_text(tsv, '\t').unwrap();
        assert!(records[0].country.is_none());
    }

    #[test]
    fn test_parse_overlong_row_is_error() {
        let tsv = "id\tcountry\nR1\tPeru\textra\n";
        let err = parse_delimited_text(tsv, '\t').unwrap_err();
        assert!(err.to_string().contains("Line 2"));
    }

    #[test]
    fn test_parse_missing_id_column_is_error() {
        let tsv = "taxonomic_unit_id\tcountry\nBOLD:AAA0001\tPeru\n";
        assert!(parse_delimited_text(tsv, '\t').is_err());
    }

    #[test]
    fn test_parse_empty_id_is_error() {
        let tsv = "id\tcountry\n\tPeru\n";
        let err = parse_delimited_text(tsv, '\t').unwrap_err();
        assert!(err.to_string().contains("empty id"));
    }

    #[test]
    fn test_parse_unparseable_number_is_absent() {
        let tsv = "id\tlatitude\nR1\tnot-a-number\n";
        let records = parse_delimited_text(tsv, '\t').unwrap();
        assert!(records[0].latitude.is_none());
    }

    #[test]
    fn test_parse_comments_and_blanks_skipped() {
        let tsv = "# specimen export\n\nid\tcountry\n# comment row\nR1\tPeru\n";
        let records = parse_delimited_text(tsv, '\t').unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parse_no_records_is_error() {
        assert!(parse_delimited_text("id\tcountry\n", '\t').is_err());
        assert!(parse_delimited_text("", '\t').is_err());
    }
}
