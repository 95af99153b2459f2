use serde::{Deserialize, Serialize};

/// Leading code of a column-header declaration line.
pub const HEADER_CODE: &str = "5";
/// Leading code of a metadata key/value declaration line.
pub const METADATA_CODE: &str = "3";

/// The header line starts with the header code, so the column holding each
/// line's leading code is named after it.
pub const ROW_TYPE_COLUMN: &str = HEADER_CODE;
pub const DELTA_TIME_COLUMN: &str = "DeltaTime";
pub const TIMESTAMP_COLUMN: &str = "eye_timestamp";

pub const SCREEN_SIZE: &str = "ScreenSize";
pub const VIEWING_DISTANCE: &str = "ViewingDistance";

/// Output columns, in output order.
pub const CANONICAL_COLUMNS: [&str; 10] = [
    "eye_timestamp",
    "eye1_x_coordinate",
    "eye1_y_coordinate",
    "eye1_pupil_width",
    "eye1_pupil_height",
    "Region",
    "Quality",
    "Fixation",
    "Count",
    "Marker",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Tsv,
    Parquet,
}

impl TableFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TableFormat::Tsv => "tsv",
            TableFormat::Parquet => "parquet",
        }
    }
}

/// Meaning of a row's leading code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowType {
    HeaderDeclaration,
    MetadataDeclaration,
    MarkerStart,
    MarkerStop,
    Extraneous,
    Data(String),
}

impl RowType {
    pub const START_CODE: i64 = 16;
    pub const STOP_CODE: i64 = 12;
    pub const EXTRANEOUS_CODE: i64 = 7;

    /// Classify a value of the row-type column once the data segment has been
    /// loaded as a table. Codes are compared numerically.
    pub fn from_discriminator(value: &str) -> Self {
        let value = value.trim();
        let numeric = value
            .parse::<i64>()
            .ok()
            .or_else(|| value.parse::<f64>().ok().filter(|v| v.fract() == 0.0).map(|v| v as i64));

        match numeric {
            Some(5) => RowType::HeaderDeclaration,
            Some(3) => RowType::MetadataDeclaration,
            Some(Self::START_CODE) => RowType::MarkerStart,
            Some(Self::STOP_CODE) => RowType::MarkerStop,
            Some(Self::EXTRANEOUS_CODE) => RowType::Extraneous,
            _ => RowType::Data(value.to_string()),
        }
    }

    pub fn is_declaration(&self) -> bool {
        matches!(self, RowType::HeaderDeclaration | RowType::MetadataDeclaration)
    }
}

/// Metadata sidecar accompanying each converted table.
///
/// Field order here is the order in the serialized document. Boundary times
/// are omitted, not nulled, when the log has no matching marker row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Sidecar {
    pub screen_size: Vec<String>,
    pub viewing_distance: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
}

/// A labeled, string-valued table. Every row holds exactly one value per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column, top to bottom.
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a str> + 'a> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[idx].as_str()))
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Remove a column if present. Returns whether it existed.
    pub fn drop_column(&mut self, name: &str) -> bool {
        match self.column_index(name) {
            Some(idx) => {
                self.columns.remove(idx);
                for row in &mut self.rows {
                    row.remove(idx);
                }
                true
            }
            None => false,
        }
    }

    /// Keep only rows for which `keep` returns true when given the value in `column`.
    pub fn retain_by<F>(&mut self, column: usize, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.rows.retain(|row| keep(&row[column]));
    }
}
