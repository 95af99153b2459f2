//! Session boundary extraction.
//!
//! Start (`16`) and stop (`12`) marker rows carry the timestamps that bound the
//! valid recording. They are recorded and removed, then the extraneous (`7`)
//! rows are dropped. Each step sees the table as the previous one left it.

use crate::error::{Error, Result};
use crate::models::{DataTable, RowType, TIMESTAMP_COLUMN};
use crate::normalizer::row_type_index;

/// Start and stop timestamps found in a log, in device timestamp units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Boundaries {
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
}

/// Record the timestamp of the first row of kind `marker` and remove every such row.
///
/// Returns `None` and leaves the table untouched when no row matches.
pub fn take_marker(table: &mut DataTable, marker: &RowType) -> Result<Option<f64>> {
    let kind_idx = row_type_index(table)?;
    let time_idx = table
        .column_index(TIMESTAMP_COLUMN)
        .ok_or_else(|| Error::SchemaMismatch {
            column: TIMESTAMP_COLUMN.to_string(),
        })?;

    let first = table
        .rows
        .iter()
        .find(|row| RowType::from_discriminator(&row[kind_idx]) == *marker);

    let timestamp = match first {
        Some(row) => {
            let raw = row[time_idx].trim();
            raw.parse::<f64>().map_err(|_| {
                Error::InvalidValue(format!("{:?} timestamp '{}' is not a number", marker, raw))
            })?
        }
        None => return Ok(None),
    };

    table.retain_by(kind_idx, |value| RowType::from_discriminator(value) != *marker);
    Ok(Some(timestamp))
}

/// Remove rows unrelated to eye-tracking samples.
pub fn remove_extraneous(table: &mut DataTable) -> Result<()> {
    let idx = row_type_index(table)?;
    table.retain_by(idx, |value| RowType::from_discriminator(value) != RowType::Extraneous);
    Ok(())
}

/// Extract start and stop times, then drop extraneous rows.
pub fn extract(table: &mut DataTable) -> Result<Boundaries> {
    let start_time = take_marker(table, &RowType::MarkerStart)?;
    let end_time = take_marker(table, &RowType::MarkerStop)?;
    remove_extraneous(table)?;

    Ok(Boundaries {
        start_time,
        end_time,
    })
}
