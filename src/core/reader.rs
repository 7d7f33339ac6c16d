use crate::domain::model::{ProfileTable, Record};
use crate::utils::error::Result;

/// Parses CSV bytes with a header row. Short rows are allowed; their
/// missing cells read as absent. Cells that are not valid UTF-8 are decoded
/// lossily instead of failing the whole file.
pub fn parse_profiles(data: &[u8]) -> Result<ProfileTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers = reader
        .byte_headers()?
        .iter()
        .map(|header| {
            String::from_utf8_lossy(header)
                .trim_start_matches('\u{feff}')
                .trim()
                .to_string()
        })
        .collect::<Vec<_>>();

    let mut records = Vec::new();
    for row in reader.byte_records() {
        let row = row?;
        records.push(Record::new(
            row.iter().map(|cell| String::from_utf8_lossy(cell).into_owned()),
        ));
    }

    Ok(ProfileTable::new(headers, records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_headers_and_rows() {
        let data = b"Name,Location,Profile URL\nAnn,\"Paris, France\",https://example.com/ann\nBob,,\n";
        let table = parse_profiles(data).unwrap();

        assert_eq!(table.headers, vec!["Name", "Location", "Profile URL"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].get(1), Some("Paris, France"));
        assert_eq!(table.records[1].get(1), None);
        assert_eq!(table.records[1].get(2), None);
    }

    #[test]
    fn test_short_rows_and_bom() {
        let data = "\u{feff}Location,Profile URL\nLondon\n".as_bytes();
        let table = parse_profiles(data).unwrap();

        assert_eq!(table.column_index("Location"), Some(0));
        assert_eq!(table.column_values("Profile URL"), vec![None]);
    }

    #[test]
    fn test_latin1_cell_does_not_fail_the_file() {
        let table = parse_profiles(b"Location,Profile URL\nS\xE3o Paulo,u1\nParis,u2\n").unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].get(0), Some("S\u{fffd}o Paulo"));
        assert_eq!(table.records[0].get(1), Some("u1"));
        assert_eq!(table.records[1].get(0), Some("Paris"));
    }

    #[test]
    fn test_header_only_input_is_empty() {
        let table = parse_profiles(b"Location,Profile URL\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.headers.len(), 2);
    }
}
