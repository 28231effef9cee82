use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};

use super::model::{Cell, Column, ColumnRole, Table};
use crate::error::{ReportError, Result};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a table from a delimited text file.
///
/// Layout: one header row, the first column is the independent variable,
/// later columns are `PARAM:<name>` or `MEASURE:<name>`.
pub fn load_table(path: &Path, delimiter: u8) -> Result<Table> {
    if !path.is_file() {
        return Err(ReportError::MissingFile(path.to_path_buf()));
    }
    let file = std::fs::File::open(path)?;
    let table = read_table(file, path, delimiter)?;
    debug!(
        "loaded {} ({} columns, {} rows)",
        path.display(),
        table.columns.len(),
        table.row_count()
    );
    Ok(table)
}

/// Parse a table from any reader. `path` is only used to label the table
/// and its errors.
pub fn read_table<R: Read>(reader: R, path: &Path, delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReportError::malformed(path, format!("reading header: {e}")))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(ReportError::EmptyTable(path.to_path_buf()));
    }
    if headers.len() < 2 {
        return Err(ReportError::malformed(
            path,
            format!("expected at least 2 columns, found {}", headers.len()),
        ));
    }

    let mut seen = HashSet::new();
    if let Some(name) = headers.iter().find(|h| !seen.insert(h.as_str())) {
        return Err(ReportError::malformed(
            path,
            format!("duplicate column '{name}'"),
        ));
    }

    let mut columns: Vec<Column> = headers
        .iter()
        .map(|name| Column {
            name: name.clone(),
            cells: Vec::new(),
        })
        .collect();

    for (row_no, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = row_no + 2;
        let record =
            result.map_err(|e| ReportError::malformed(path, format!("line {line}: {e}")))?;

        if record.len() != headers.len() {
            return Err(ReportError::malformed(
                path,
                format!(
                    "line {line}: expected {} fields, found {}",
                    headers.len(),
                    record.len()
                ),
            ));
        }

        for (column, value) in columns.iter_mut().zip(record.iter()) {
            column.cells.push(Cell::parse(value));
        }
    }

    let table = Table {
        source: path.to_path_buf(),
        columns,
    };
    check_table(&table)?;
    Ok(table)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn check_table(table: &Table) -> Result<()> {
    let path = table.source();

    if table.row_count() == 0 {
        return Err(ReportError::EmptyTable(path.to_path_buf()));
    }
    if table.measure_columns().is_empty() {
        return Err(ReportError::malformed(path, "no MEASURE: columns"));
    }

    for (index, column) in table.columns.iter().enumerate() {
        match table.role_of(index) {
            // Text x values are plotted as categories.
            ColumnRole::Independent => {}
            ColumnRole::Parameter => {}
            ColumnRole::Measure => {
                if let Some(row) = column.cells.iter().position(|c| !c.is_plottable()) {
                    return Err(ReportError::malformed(
                        path,
                        format!(
                            "line {}: unparseable cell '{}' in measure column '{}'",
                            row + 2,
                            column.cells[row],
                            column.name
                        ),
                    ));
                }
            }
            ColumnRole::Unclassified => {
                warn!(
                    "{}: column '{}' has no PARAM:/MEASURE: prefix and is ignored",
                    path.display(),
                    column.name
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Table> {
        read_table(text.as_bytes(), Path::new("mem.csv"), b',')
    }

    #[test]
    fn test_preserves_column_order() {
        let t = parse("x,PARAM:depth,MEASURE:acc,MEASURE:time\n1,3,0.5,10\n2,3,0.7,12\n").unwrap();
        let names: Vec<&str> = t.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["x", "PARAM:depth", "MEASURE:acc", "MEASURE:time"]);
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.columns[2].cells[1], Cell::Float(0.7));
    }

    #[test]
    fn test_ragged_row_is_malformed() {
        let err = parse("x,MEASURE:acc\n1,0.5\n2\n").unwrap_err();
        match err {
            ReportError::MalformedTable { reason, .. } => assert!(reason.contains("line 3")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_only_is_empty() {
        assert!(matches!(
            parse("x,MEASURE:acc\n"),
            Err(ReportError::EmptyTable(_))
        ));
    }

    #[test]
    fn test_empty_file_is_empty() {
        assert!(matches!(parse(""), Err(ReportError::EmptyTable(_))));
        assert!(matches!(parse("\n"), Err(ReportError::EmptyTable(_))));
    }

    #[test]
    fn test_duplicate_header_is_malformed() {
        let err = parse("x,MEASURE:acc,MEASURE:acc\n1,0.5,0.6\n").unwrap_err();
        match err {
            ReportError::MalformedTable { reason, .. } => {
                assert!(reason.contains("duplicate column 'MEASURE:acc'"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_text_independent_column_is_allowed() {
        let t = parse(
            "PARAM:splitType,PARAM:numTrees,MEASURE:acc\n\
             LABEL_CHAIN,10,0.5\n\
             PERCENTAGE_CHAIN,10,0.6\n",
        )
        .unwrap();
        assert_eq!(t.independent().cells[0], Cell::Text("LABEL_CHAIN".into()));
        assert_eq!(t.measure_columns(), vec!["MEASURE:acc"]);
    }

    #[test]
    fn test_text_in_measure_is_malformed() {
        let err = parse("x,MEASURE:acc\n1,high\n").unwrap_err();
        assert!(matches!(err, ReportError::MalformedTable { .. }));
        assert!(err.to_string().contains("unparseable cell 'high'"));
    }

    #[test]
    fn test_requires_a_measure() {
        assert!(matches!(
            parse("x,PARAM:depth\n1,2\n"),
            Err(ReportError::MalformedTable { .. })
        ));
        assert!(matches!(
            parse("x\n1\n"),
            Err(ReportError::MalformedTable { .. })
        ));
    }

    #[test]
    fn test_text_parameters_are_allowed() {
        let t = parse("x,PARAM:criterion,MEASURE:acc\n1,gini,0.5\n").unwrap();
        assert_eq!(t.columns[1].cells[0], Cell::Text("gini".into()));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let t = read_table(
            "x;MEASURE:acc\n1;0.5\n".as_bytes(),
            Path::new("mem.csv"),
            b';',
        )
        .unwrap();
        assert_eq!(t.measure_columns(), vec!["MEASURE:acc"]);
    }

    #[test]
    fn test_missing_file() {
        let err = load_table(Path::new("/nonexistent/results.csv"), b',').unwrap_err();
        assert!(matches!(err, ReportError::MissingFile(_)));
    }
}
