// CSV table ingestion for sensor exports
use crate::domain::series::RawRow;

/// Parse one exported table into rows keyed by header name.
///
/// Semicolon-delimited when the header line has a semicolon, comma otherwise.
/// Records that the CSV reader rejects are skipped.
pub fn parse_table(text: &str) -> Vec<RawRow> {
    let text = text.trim_start_matches('\u{feff}');
    let header_line = text.lines().next().unwrap_or_default();
    let delimiter = if header_line.contains(';') { b';' } else { b',' };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            tracing::warn!("Unreadable table header: {}", e);
            return Vec::new();
        }
    };

    let mut rows: Vec<RawRow> = Vec::new();
    for (index, record) in reader.records().enumerate() {
        match record {
            Ok(record) => rows.push(headers.iter().zip(record.iter()).collect()),
            Err(e) => tracing::debug!("Skipping record {}: {}", index + 1, e),
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semicolon_table_with_comma_decimals() {
        let text = "Datum;Uhrzeit;Machine 01;Machine 02\n15.03.24;10:00;55,5;41\n15.03.24;10:05;56,0\n";
        let rows = parse_table(text);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Machine 01"), Some("55,5"));
        assert_eq!(rows[0].get("Uhrzeit"), Some("10:00"));
        assert_eq!(rows[1].get("Machine 01"), Some("56,0"));
        assert_eq!(rows[1].get("Machine 02"), None);
    }

    #[test]
    fn test_comma_table_trims_cells_and_bom() {
        let text = "\u{feff}Date, Time, Machine 05\n03/15/24, 10:00 , 60.5\n";
        let rows = parse_table(text);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Date"), Some("03/15/24"));
        assert_eq!(rows[0].get("Time"), Some("10:00"));
        assert_eq!(rows[0].get("Machine 05"), Some("60.5"));
    }

    #[test]
    fn test_empty_text() {
        assert!(parse_table("").is_empty());
        assert!(parse_table("Date;Time\n").is_empty());
    }
}
