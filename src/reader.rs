//! High-level API for reading eye-tracker logs.

use crate::boundary;
use crate::error::Result;
use crate::models::{DataTable, Sidecar};
use crate::normalizer;
use crate::scanner::{self, LogScan};
use log::debug;
use std::fmt;
use std::fs;
use std::path::Path;

/// Recoverable irregularity found while converting one log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// No start marker row; `StartTime` is omitted from the sidecar.
    MissingStartTime,
    /// No stop marker row; `EndTime` is omitted from the sidecar.
    MissingStopTime,
    /// More than one row type left after cleanup.
    MixedRowTypes(Vec<String>),
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::MissingStartTime => write!(f, "no start time"),
            Anomaly::MissingStopTime => write!(f, "no stop time"),
            Anomaly::MixedRowTypes(values) => {
                write!(f, "more than one type of row: {}", values.join(", "))
            }
        }
    }
}

/// A converted log: canonical table plus sidecar metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub table: DataTable,
    pub sidecar: Sidecar,
    pub anomalies: Vec<Anomaly>,
}

impl ConversionResult {
    pub fn mixed_row_types(&self) -> Option<&[String]> {
        self.anomalies.iter().find_map(|a| match a {
            Anomaly::MixedRowTypes(values) => Some(values.as_slice()),
            _ => None,
        })
    }
}

/// A reader for eye-tracker log files.
///
/// # Examples
///
/// ```no_run
/// use eyetrack_bids::EyeLogReader;
///
/// let reader = EyeLogReader::from_file("9001_1_eyedata_Resting.txt")?;
/// let result = reader.convert()?;
///
/// println!("{} samples, start at {:?}", result.table.len(), result.sidecar.start_time);
/// # Ok::<(), eyetrack_bids::Error>(())
/// ```
pub struct EyeLogReader {
    text: String,
}

impl EyeLogReader {
    /// Create a reader from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnreadableFile`] if the file is not valid UTF-8 text,
    /// or [`crate::Error::Io`] if it cannot be opened.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        Self::from_bytes(data).map_err(|e| e.with_path(path))
    }

    /// Create a reader from raw bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let text = String::from_utf8(data)?;
        Ok(Self { text })
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Locate the header, metadata and data segment without reshaping anything.
    pub fn scan(&self) -> Result<LogScan<'_>> {
        scanner::scan(&self.text)
    }

    /// Run the full conversion.
    ///
    /// Missing boundaries and mixed row types are reported in
    /// [`ConversionResult::anomalies`]; the table is still produced.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MalformedLog`] when the header or required metadata is
    /// missing and [`crate::Error::SchemaMismatch`] when a canonical column is absent.
    pub fn convert(&self) -> Result<ConversionResult> {
        let scan = self.scan()?;
        debug!(
            "Data segment starts at line {} with {} columns",
            scan.segment_start,
            scan.header.len()
        );

        let mut table = normalizer::load_table(&scan.header, scan.body)?;
        normalizer::rename_columns(&mut table);
        normalizer::strip_declarations(&mut table)?;

        let bounds = boundary::extract(&mut table)?;

        let mut anomalies = Vec::new();
        if bounds.start_time.is_none() {
            anomalies.push(Anomaly::MissingStartTime);
        }
        if bounds.end_time.is_none() {
            anomalies.push(Anomaly::MissingStopTime);
        }
        if let Some(values) = normalizer::mixed_row_types(&table)? {
            anomalies.push(Anomaly::MixedRowTypes(values));
        }

        let table = normalizer::to_canonical(table)?;

        let sidecar = Sidecar {
            start_time: bounds.start_time,
            end_time: bounds.end_time,
            ..scan.metadata
        };

        Ok(ConversionResult {
            table,
            sidecar,
            anomalies,
        })
    }
}
