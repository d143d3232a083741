use instrloc_core::{InstrlocError, Result, Row, Sheet, SOURCE_COLUMN, TARGET_COLUMN};
use std::io::Read;
use std::path::Path;

/// Marker character accepted on the end of the target-column header; a
/// column named `Arabic Instructions*` is treated as `Arabic Instructions`.
const TARGET_ALIAS_MARKER: char = '*';

/// Read a sheet from CSV data. The source column is required; the target
/// column is optional (an absent column defaults every row's target to
/// empty). Every cell is normalized to trimmed text here, so nothing
/// downstream ever sees a native numeric value. Extra columns and their
/// headers are preserved in original order.
pub fn read_sheet<R: Read>(reader: R) -> Result<Sheet> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            // Excel-originated files often carry a BOM on the first header.
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim().to_string()
        })
        .collect();

    let source_idx = headers
        .iter()
        .position(|h| h == SOURCE_COLUMN)
        .ok_or_else(|| InstrlocError::MissingColumn(SOURCE_COLUMN.to_string()))?;

    let target_idx = headers.iter().position(|h| {
        h == TARGET_COLUMN || h.strip_suffix(TARGET_ALIAS_MARKER) == Some(TARGET_COLUMN)
    });

    let extra_idx: Vec<usize> = (0..headers.len())
        .filter(|&i| i != source_idx && Some(i) != target_idx)
        .collect();
    let extra_headers: Vec<String> = extra_idx.iter().map(|&i| headers[i].clone()).collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let cell = |i: usize| record.get(i).unwrap_or("").trim().to_string();
        rows.push(Row {
            source: cell(source_idx),
            target: target_idx.map(|i| cell(i)).unwrap_or_default(),
            extras: extra_idx.iter().map(|&i| cell(i)).collect(),
        });
    }

    Ok(Sheet { extra_headers, rows })
}

pub fn read_sheet_from_path(path: &Path) -> Result<Sheet> {
    let file = std::fs::File::open(path)?;
    read_sheet(std::io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(data: &str) -> Sheet {
        read_sheet(data.as_bytes()).expect("sheet should parse")
    }

    #[test]
    fn reads_canonical_columns() {
        let s = sheet("English Instructions,Arabic Instructions\n1001,\nBall,كرة\n");
        assert_eq!(s.rows.len(), 2);
        assert_eq!(s.rows[0].source, "1001");
        assert_eq!(s.rows[0].target, "");
        assert_eq!(s.rows[1].target, "كرة");
    }

    #[test]
    fn missing_source_column_is_fatal() {
        let err = read_sheet("Arabic Instructions\nكرة\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("English Instructions"));
    }

    #[test]
    fn starred_target_header_is_an_alias() {
        let s = sheet("English Instructions,Arabic Instructions*\nBall,كرة\n");
        assert_eq!(s.rows[0].target, "كرة");
        assert!(s.extra_headers.is_empty());
    }

    #[test]
    fn absent_target_column_defaults_to_empty() {
        let s = sheet("English Instructions\nBall\n");
        assert_eq!(s.rows[0].target, "");
    }

    #[test]
    fn bom_on_first_header_is_stripped() {
        let s = sheet("\u{feff}English Instructions,Arabic Instructions\nBall,كرة\n");
        assert_eq!(s.rows[0].source, "Ball");
    }

    #[test]
    fn extra_columns_are_preserved_in_order() {
        let s = sheet("Notes,English Instructions,Unit,Arabic Instructions\nx,Ball,kg,كرة\n");
        assert_eq!(s.extra_headers, vec!["Notes", "Unit"]);
        assert_eq!(s.rows[0].extras, vec!["x", "kg"]);
    }

    #[test]
    fn cells_are_trimmed() {
        let s = sheet("English Instructions,Arabic Instructions\n  Ball  ,  كرة \n");
        assert_eq!(s.rows[0].source, "Ball");
        assert_eq!(s.rows[0].target, "كرة");
    }

    #[test]
    fn short_records_are_tolerated() {
        let s = sheet("English Instructions,Arabic Instructions\nBall\n");
        assert_eq!(s.rows[0].source, "Ball");
        assert_eq!(s.rows[0].target, "");
    }
}
