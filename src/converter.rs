//! Per-file conversion pipeline and bulk runs.
//!
//! A file is read, converted and written completely before the next one
//! starts. Errors never escape a file: they are recorded in the
//! [`DiagnosticLog`] and the run moves on.

use crate::catalog::ConversionJob;
use crate::diagnostics::{Diagnostic, DiagnosticLog};
use crate::error::{Error, Result};
use crate::models::TableFormat;
use crate::reader::{Anomaly, EyeLogReader};
use crate::writer::{SidecarWriter, TableWriter};
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// What to do with a file whose rows still mix several row types after cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowTypePolicy {
    /// Write the output, record a diagnostic and report the file as flagged.
    #[default]
    Flag,
    /// Write nothing and report the file as failed.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionStatus {
    Clean,
    /// Output was written but should be treated as provisional.
    Flagged(Vec<String>),
}

/// Outcome of one successful file conversion.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub input: PathBuf,
    pub table_path: PathBuf,
    pub sidecar_path: PathBuf,
    pub rows_written: usize,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub status: ConversionStatus,
}

impl ConversionReport {
    pub fn is_flagged(&self) -> bool {
        matches!(self.status, ConversionStatus::Flagged(_))
    }
}

/// Counts for a bulk run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub converted: usize,
    pub flagged: usize,
    pub failed: usize,
    pub reports: Vec<ConversionReport>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.converted + self.flagged + self.failed
    }

    pub fn summary(&self) -> String {
        format!(
            "{} file(s): {} converted, {} flagged, {} failed",
            self.total(),
            self.converted,
            self.flagged,
            self.failed
        )
    }
}

/// Converts eye-tracker logs into a canonical table and sidecar.
///
/// # Examples
///
/// ```no_run
/// use eyetrack_bids::{Converter, DiagnosticLog};
///
/// let diagnostics = DiagnosticLog::create("eyetrack_conversion.log")?;
/// let report = Converter::new().convert_file(
///     "9001_1_eyedata_Resting.txt",
///     "sub-9001_ses-1_task-rest_eyetrack.tsv",
///     "sub-9001_ses-1_task-rest_eyetrack.json",
///     &diagnostics,
/// )?;
/// println!("{} rows", report.rows_written);
/// # Ok::<(), eyetrack_bids::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    policy: RowTypePolicy,
    format: TableFormat,
}

impl Converter {
    /// A converter writing TSV and flagging mixed row types.
    pub fn new() -> Self {
        Self {
            policy: RowTypePolicy::Flag,
            format: TableFormat::Tsv,
        }
    }

    pub fn builder() -> ConverterBuilder {
        ConverterBuilder::new()
    }

    pub fn table_format(&self) -> TableFormat {
        self.format
    }

    /// Convert one log and write its table and sidecar.
    ///
    /// Anomalies are recorded in `diagnostics`. Errors are returned without
    /// being recorded; [`Converter::run`] records them.
    pub fn convert_file<I, T, S>(
        &self,
        input: I,
        table_path: T,
        sidecar_path: S,
        diagnostics: &DiagnosticLog,
    ) -> Result<ConversionReport>
    where
        I: AsRef<Path>,
        T: AsRef<Path>,
        S: AsRef<Path>,
    {
        let input = input.as_ref();
        let result = EyeLogReader::from_file(input)?.convert()?;

        let mut status = ConversionStatus::Clean;
        for anomaly in &result.anomalies {
            match anomaly {
                // under Reject the run records the returned error instead
                Anomaly::MixedRowTypes(_) if self.policy == RowTypePolicy::Reject => continue,
                Anomaly::MixedRowTypes(values) => status = ConversionStatus::Flagged(values.clone()),
                _ => {}
            }
            diagnostics.record(Diagnostic::from_anomaly(input, anomaly))?;
        }

        if let (RowTypePolicy::Reject, Some(values)) = (self.policy, result.mixed_row_types()) {
            return Err(Error::RowTypeInconsistency {
                values: values.to_vec(),
            });
        }

        let table_path = table_path.as_ref();
        let stats = TableWriter::new(table_path)
            .format(self.format)
            .write(&result.table)?;
        if let Err(err) = SidecarWriter::new(sidecar_path.as_ref()).write(&result.sidecar) {
            // a table without its sidecar is not a valid output
            if let Err(remove_err) = fs::remove_file(table_path) {
                error!("Could not remove {}: {}", table_path.display(), remove_err);
            }
            return Err(err);
        }
        info!("   ├─ {}", stats.summary());

        Ok(ConversionReport {
            input: input.to_path_buf(),
            table_path: table_path.to_path_buf(),
            sidecar_path: sidecar_path.as_ref().to_path_buf(),
            rows_written: stats.num_rows,
            start_time: result.sidecar.start_time,
            end_time: result.sidecar.end_time,
            status,
        })
    }

    /// Convert every job in order. A failing file is recorded and skipped.
    pub fn run(&self, jobs: &[ConversionJob], diagnostics: &DiagnosticLog) -> RunSummary {
        let mut summary = RunSummary::default();

        for (idx, job) in jobs.iter().enumerate() {
            info!("[{}/{}] 📄 {}", idx + 1, jobs.len(), job.input.display());
            let started = Instant::now();

            let outcome = job.prepare().map_err(Error::from).and_then(|()| {
                self.convert_file(&job.input, &job.table_path, &job.sidecar_path, diagnostics)
            });

            match outcome {
                Ok(report) => {
                    if report.is_flagged() {
                        summary.flagged += 1;
                        info!("   └─ ⚠ Flagged in {:.2?}", started.elapsed());
                    } else {
                        summary.converted += 1;
                        info!("   └─ ✓ Converted in {:.2?}", started.elapsed());
                    }
                    summary.reports.push(report);
                }
                Err(err) => {
                    summary.failed += 1;
                    error!("   └─ ✗ Error: {}", err);
                    if let Err(log_err) = diagnostics.record(Diagnostic::from_error(&job.input, &err)) {
                        error!("Could not write diagnostic log: {}", log_err);
                    }
                }
            }
        }

        summary
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring a [`Converter`].
pub struct ConverterBuilder {
    policy: RowTypePolicy,
    format: TableFormat,
}

impl ConverterBuilder {
    pub fn new() -> Self {
        Self {
            policy: RowTypePolicy::Flag,
            format: TableFormat::Tsv,
        }
    }

    /// Set the policy for mixed row types. Default is [`RowTypePolicy::Flag`].
    pub fn row_type_policy(mut self, policy: RowTypePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the table format. Default is TSV.
    pub fn table_format(mut self, format: TableFormat) -> Self {
        self.format = format;
        self
    }

    pub fn build(self) -> Converter {
        Converter {
            policy: self.policy,
            format: self.format,
        }
    }
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
