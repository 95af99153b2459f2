//! Reshaping of the raw data segment into the canonical eye-tracking table.

use crate::error::{Error, Result};
use crate::models::{
    DataTable, RowType, CANONICAL_COLUMNS, DELTA_TIME_COLUMN, ROW_TYPE_COLUMN,
};
use log::{debug, warn};

/// Source column names and their canonical replacements.
///
/// The last header token keeps the line terminator of the header line, hence
/// the explicit `"Marker\n"` entry. Lookups also match on trimmed names.
pub const RENAMES: [(&str, &str); 6] = [
    ("TotalTime", "eye_timestamp"),
    ("X_Gaze", "eye1_x_coordinate"),
    ("Y_Gaze", "eye1_y_coordinate"),
    ("PupilWidth", "eye1_pupil_width"),
    ("PupilHeight", "eye1_pupil_height"),
    ("Marker\n", "Marker"),
];

/// Canonical name for a raw header token. Tokens without a rename only lose
/// their surrounding whitespace.
pub fn canonical_name(raw: &str) -> String {
    let trimmed = raw.trim();
    RENAMES
        .iter()
        .find(|(from, _)| *from == raw || from.trim() == trimmed)
        .map(|(_, to)| to.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Parse the data segment into a table.
///
/// `body` starts with the header declaration line, which is consumed as the
/// header record. Columns are the row-type column followed by `header` as
/// given. Short rows are padded with empty values; rows with more fields than
/// the header are dropped.
pub fn load_table(header: &[String], body: &str) -> Result<DataTable> {
    let mut columns = Vec::with_capacity(header.len() + 1);
    columns.push(ROW_TYPE_COLUMN.to_string());
    columns.extend(header.iter().cloned());

    let mut table = DataTable::new(columns);
    let width = table.columns.len();

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(body.as_bytes());

    let mut dropped = 0usize;
    for record in reader.records() {
        let record = record?;
        if record.len() > width {
            dropped += 1;
            continue;
        }

        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(width, String::new());
        table.push_row(row);
    }

    if dropped > 0 {
        warn!("Dropped {} row(s) with more fields than the header", dropped);
    }
    debug!("Loaded {} rows x {} columns", table.len(), width);

    Ok(table)
}

/// Rename raw header tokens to canonical column names.
pub fn rename_columns(table: &mut DataTable) {
    for column in &mut table.columns {
        *column = canonical_name(column);
    }
}

/// Remove header and metadata declarations that ended up inside the data segment.
pub fn strip_declarations(table: &mut DataTable) -> Result<()> {
    let idx = row_type_index(table)?;
    table.retain_by(idx, |value| !RowType::from_discriminator(value).is_declaration());
    Ok(())
}

/// Distinct row-type values, in order of first appearance, when there is more
/// than one of them. `None` means the table is homogeneous.
pub fn mixed_row_types(table: &DataTable) -> Result<Option<Vec<String>>> {
    let values = table
        .column(ROW_TYPE_COLUMN)
        .ok_or_else(|| Error::SchemaMismatch {
            column: ROW_TYPE_COLUMN.to_string(),
        })?;

    let mut distinct: Vec<String> = Vec::new();
    for value in values {
        let value = value.trim();
        if !distinct.iter().any(|seen| same_row_type(seen, value)) {
            distinct.push(value.to_string());
        }
    }

    Ok(if distinct.len() > 1 { Some(distinct) } else { None })
}

/// Row types match numerically when both parse (`10` and `10.0` are the same
/// type), otherwise by text.
fn same_row_type(a: &str, b: &str) -> bool {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x == y,
        _ => a == b,
    }
}

/// Drop the row-type and `DeltaTime` columns and put the rest in canonical order.
pub fn to_canonical(mut table: DataTable) -> Result<DataTable> {
    table.drop_column(ROW_TYPE_COLUMN);
    table.drop_column(DELTA_TIME_COLUMN);

    let positions = CANONICAL_COLUMNS
        .iter()
        .map(|name| {
            table.column_index(name).ok_or_else(|| Error::SchemaMismatch {
                column: name.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut canonical = DataTable::new(CANONICAL_COLUMNS.iter().map(|c| c.to_string()).collect());
    for row in table.rows {
        canonical.push_row(positions.iter().map(|&i| row[i].clone()).collect());
    }

    Ok(canonical)
}

pub(crate) fn row_type_index(table: &DataTable) -> Result<usize> {
    table
        .column_index(ROW_TYPE_COLUMN)
        .ok_or_else(|| Error::SchemaMismatch {
            column: ROW_TYPE_COLUMN.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> DataTable {
        let mut t = DataTable::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            t.push_row(row.iter().map(|v| v.to_string()).collect());
        }
        t
    }

    #[test]
    fn test_canonical_name_mapping() {
        assert_eq!(canonical_name("TotalTime"), "eye_timestamp");
        assert_eq!(canonical_name("PupilHeight"), "eye1_pupil_height");
        assert_eq!(canonical_name("Marker\n"), "Marker");
        assert_eq!(canonical_name("Marker\r\n"), "Marker");
        assert_eq!(canonical_name("Marker"), "Marker");
        assert_eq!(canonical_name("Region"), "Region");
        assert_eq!(canonical_name("Count\n"), "Count");
    }

    #[test]
    fn test_mixed_row_types_reports_first_appearance_order() {
        let t = table(&["5", "eye_timestamp"], &[&["10", "1"], &["11", "2"], &["10", "3"]]);
        assert_eq!(
            mixed_row_types(&t).unwrap(),
            Some(vec!["10".to_string(), "11".to_string()])
        );
    }

    #[test]
    fn test_homogeneous_and_empty_tables_pass() {
        let t = table(&["5", "eye_timestamp"], &[&["10", "1"], &["10", "2"]]);
        assert_eq!(mixed_row_types(&t).unwrap(), None);

        let empty = table(&["5", "eye_timestamp"], &[]);
        assert_eq!(mixed_row_types(&empty).unwrap(), None);
    }

    #[test]
    fn test_row_types_compare_numerically() {
        let t = table(&["5", "eye_timestamp"], &[&["10", "1"], &["10.0", "2"], &[" 10 ", "3"]]);
        assert_eq!(mixed_row_types(&t).unwrap(), None);

        let t = table(&["5", "eye_timestamp"], &[&["10.0", "1"], &["10", "2"], &["11", "3"]]);
        assert_eq!(
            mixed_row_types(&t).unwrap(),
            Some(vec!["10.0".to_string(), "11".to_string()])
        );
    }

    #[test]
    fn test_to_canonical_reports_missing_column() {
        let t = table(&["5", "eye_timestamp"], &[&["10", "1"]]);
        match to_canonical(t) {
            Err(Error::SchemaMismatch { column }) => assert_eq!(column, "eye1_x_coordinate"),
            other => panic!("expected schema mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_strip_declarations() {
        let mut t = table(
            &["5", "eye_timestamp"],
            &[&["3", "ScreenSize"], &["10", "1"], &["5", "TotalTime"]],
        );
        strip_declarations(&mut t).unwrap();
        assert_eq!(t.rows, vec![vec!["10".to_string(), "1".to_string()]]);
    }
}
