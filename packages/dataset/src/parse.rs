//! CSV parsing into [`Dataset`] values.
//!
//! The first row is the header. Header names are trimmed and duplicates are
//! disambiguated with a numeric suffix (`curso`, `curso.1`, ...). Rows with
//! fewer fields than the header are padded with missing values; rows with
//! more fields are rejected.

use survey_insights_dataset_models::Dataset;

use crate::DatasetError;

/// Parses CSV bytes into a dataset named `name`.
///
/// # Errors
///
/// Returns [`DatasetError::Malformed`] if the content is not UTF-8, has no
/// header row, or contains a row wider than the header.
pub fn parse_csv(name: &str, bytes: &[u8]) -> Result<Dataset, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| malformed(name, &e))?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    if headers.is_empty() {
        return Err(DatasetError::Malformed {
            name: name.to_string(),
            message: "file contains no header row".to_string(),
        });
    }

    let columns = dedupe_headers(headers);
    let mut rows: Vec<Vec<String>> = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| malformed(name, &e))?;

        if record.len() > columns.len() {
            let line = record.position().map_or(0, csv::Position::line);
            return Err(DatasetError::Malformed {
                name: name.to_string(),
                message: format!(
                    "line {line}: expected at most {} fields, found {}",
                    columns.len(),
                    record.len()
                ),
            });
        }

        rows.push(record.iter().map(str::to_owned).collect());
    }

    log::debug!(
        "Parsed {} rows x {} columns from '{name}'",
        rows.len(),
        columns.len()
    );

    Ok(Dataset::from_raw(name, columns, rows))
}

fn malformed(name: &str, err: &csv::Error) -> DatasetError {
    DatasetError::Malformed {
        name: name.to_string(),
        message: err.to_string(),
    }
}

fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::with_capacity(headers.len());

    for header in headers {
        let mut candidate = header.clone();
        let mut suffix = 1;
        while columns.contains(&candidate) {
            candidate = format!("{header}.{suffix}");
            suffix += 1;
        }
        columns.push(candidate);
    }

    columns
}

#[cfg(test)]
mod tests {
    use survey_insights_dataset_models::{CellValue, ColumnKind};

    use super::*;

    #[test]
    fn parses_header_and_rows() {
        let ds = parse_csv(
            "turma.csv",
            "curso,idade,cidade\nADS,21,Palhoça\nPedagogia,,São José\n".as_bytes(),
        )
        .unwrap();

        assert_eq!(ds.name(), "turma.csv");
        assert_eq!(ds.columns(), ["curso", "idade", "cidade"]);
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.column_kind(1), ColumnKind::Numeric);
        assert!(ds.rows()[1][1].is_missing());
        assert_eq!(ds.rows()[1][2], CellValue::from("São José"));
    }

    #[test]
    fn handles_quoted_fields() {
        let ds = parse_csv(
            "q.csv",
            "\"Qual seu município de residência?\",curso\n\"Santo Amaro, SC\",ADS\n".as_bytes(),
        )
        .unwrap();

        assert_eq!(ds.columns()[0], "Qual seu município de residência?");
        assert_eq!(ds.rows()[0][0], CellValue::from("Santo Amaro, SC"));
    }

    #[test]
    fn pads_short_rows() {
        let ds = parse_csv("s.csv", b"a,b,c\n1\n").unwrap();
        assert_eq!(ds.rows()[0].len(), 3);
        assert!(ds.rows()[0][2].is_missing());
    }

    #[test]
    fn rejects_wide_rows() {
        let err = parse_csv("w.csv", b"a,b\n1,2,3\n").unwrap_err();
        assert!(matches!(err, DatasetError::Malformed { .. }));
    }

    #[test]
    fn rejects_invalid_utf8() {
        let err = parse_csv("latin1.csv", b"cidade\nPalho\xe7a\n").unwrap_err();
        assert!(matches!(err, DatasetError::Malformed { .. }));
    }

    #[test]
    fn rejects_empty_input() {
        let err = parse_csv("empty.csv", b"").unwrap_err();
        assert!(matches!(err, DatasetError::Malformed { .. }));
    }

    #[test]
    fn disambiguates_duplicate_headers() {
        let ds = parse_csv("d.csv", b"curso,curso,curso\nA,B,C\n").unwrap();
        assert_eq!(ds.columns(), ["curso", "curso.1", "curso.2"]);
    }
}
