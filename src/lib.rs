//! # Eye-tracking log converter
//!
//! Converts tab-separated eye-tracker log files into the canonical
//! eye-tracking table and JSON sidecar used by BIDS datasets.
//!
//! A log interleaves several record kinds, each line tagged by a leading code:
//!
//! - `5`: column-header declaration, opening the data segment
//! - `3`: metadata declaration (`ScreenSize`, `ViewingDistance`, ...)
//! - sample rows, whose leading code is also used to mark the session start
//!   (`16`), stop (`12`) and extraneous rows (`7`)
//!
//! ## Quick Start
//!
//! ```no_run
//! use eyetrack_bids::{EyeLogReader, SidecarWriter, TableWriter};
//!
//! let result = EyeLogReader::from_file("9001_1_eyedata_Resting.txt")?.convert()?;
//!
//! for anomaly in &result.anomalies {
//!     eprintln!("warning: {}", anomaly);
//! }
//!
//! TableWriter::new("sub-9001_ses-1_task-rest_eyetrack.tsv").write(&result.table)?;
//! SidecarWriter::new("sub-9001_ses-1_task-rest_eyetrack.json").write(&result.sidecar)?;
//! # Ok::<(), eyetrack_bids::Error>(())
//! ```
//!
//! ## Bulk conversion
//!
//! ```no_run
//! use eyetrack_bids::catalog::{discover_jobs, Discovery};
//! use eyetrack_bids::{Converter, DiagnosticLog};
//! use std::path::Path;
//!
//! let jobs = discover_jobs(
//!     Path::new("sourcedata/EyeTrackingLogFiles"),
//!     Path::new("raw"),
//!     &Discovery::default(),
//! )?;
//!
//! let diagnostics = DiagnosticLog::create("eyetrack_conversion.log")?;
//! let summary = Converter::new().run(&jobs, &diagnostics);
//! println!("{}", summary.summary());
//! # Ok::<(), eyetrack_bids::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Per-file problems never abort a bulk run. Missing session boundaries and
//! mixed row types are reported as [`Anomaly`] values and recorded in the
//! [`DiagnosticLog`]; unreadable or malformed files fail with an [`Error`]
//! that the run records before moving on.

// Public API modules
pub mod converter;
pub mod diagnostics;
pub mod error;
pub mod reader;
pub mod writer;

// Re-export commonly used types
pub use converter::{
    ConversionReport, ConversionStatus, Converter, ConverterBuilder, RowTypePolicy, RunSummary,
};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticLog};
pub use error::{Error, Result};
pub use reader::{Anomaly, ConversionResult, EyeLogReader};
pub use writer::{SidecarWriter, TableWriter, WriteStats};

// Re-export models for users who need them
pub use models::{DataTable, RowType, Sidecar, TableFormat, CANONICAL_COLUMNS};

// Internal modules (public but not part of the high-level API)
pub mod boundary;
pub mod catalog;
pub mod formats;
pub mod models;
pub mod normalizer;
pub mod scanner;
