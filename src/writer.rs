//! High-level API for writing converted logs.

use crate::error::{Error, Result};
use crate::formats::parquet::ParquetFormatter;
use crate::formats::tsv::TsvFormatter;
use crate::models::{DataTable, Sidecar, TableFormat};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::Path;

/// Writer for the canonical eye-tracking table.
///
/// # Examples
///
/// ```no_run
/// use eyetrack_bids::{EyeLogReader, TableWriter};
///
/// let result = EyeLogReader::from_file("9001_1_eyedata_Resting.txt")?.convert()?;
///
/// TableWriter::new("sub-9001_ses-1_task-rest_eyetrack.tsv")
///     .write(&result.table)?;
/// # Ok::<(), eyetrack_bids::Error>(())
/// ```
pub struct TableWriter {
    output_path: String,
    format: TableFormat,
    row_group_size: usize,
}

impl TableWriter {
    /// Create a TSV writer for `output_path`. The parent directory must exist.
    pub fn new<P: AsRef<Path>>(output_path: P) -> Self {
        Self {
            output_path: output_path.as_ref().to_string_lossy().to_string(),
            format: TableFormat::Tsv,
            row_group_size: 50_000,
        }
    }

    /// Set the output format. Default is TSV.
    pub fn format(mut self, format: TableFormat) -> Self {
        self.format = format;
        self
    }

    /// Rows per Parquet row group. Ignored for TSV output.
    pub fn row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write the table, replacing any existing file.
    pub fn write(self, table: &DataTable) -> Result<WriteStats> {
        let path = Path::new(&self.output_path);

        match self.format {
            TableFormat::Tsv => TsvFormatter::convert(table, path)?,
            TableFormat::Parquet => ParquetFormatter::new(self.row_group_size)
                .convert(table, path)
                .map_err(|e| Error::Output(e.to_string()))?,
        }

        Ok(WriteStats {
            num_rows: table.len(),
            num_columns: table.columns.len(),
            format: self.format,
        })
    }
}

/// Statistics about a table write.
#[derive(Debug, Clone)]
pub struct WriteStats {
    pub num_rows: usize,
    pub num_columns: usize,
    pub format: TableFormat,
}

impl WriteStats {
    /// Get a human-readable summary of the write operation.
    pub fn summary(&self) -> String {
        format!(
            "Wrote {} rows x {} columns ({})",
            self.num_rows,
            self.num_columns,
            self.format.extension()
        )
    }
}

/// Writer for the JSON sidecar.
///
/// Output is indented with four spaces and keys keep the order of [`Sidecar`]'s fields.
pub struct SidecarWriter {
    output_path: String,
}

impl SidecarWriter {
    pub fn new<P: AsRef<Path>>(output_path: P) -> Self {
        Self {
            output_path: output_path.as_ref().to_string_lossy().to_string(),
        }
    }

    pub fn write(self, sidecar: &Sidecar) -> Result<()> {
        fs::write(&self.output_path, sidecar_to_string(sidecar)?)?;
        Ok(())
    }
}

/// Render a sidecar exactly as [`SidecarWriter`] writes it.
pub fn sidecar_to_string(sidecar: &Sidecar) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    sidecar.serialize(&mut serializer)?;
    buf.push(b'\n');
    String::from_utf8(buf).map_err(Error::from)
}
