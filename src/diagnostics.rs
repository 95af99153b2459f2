//! Run-wide diagnostic log.
//!
//! One line per recoverable anomaly, naming the offending input file. The log
//! is created once per run, truncating any previous content, and shared by
//! reference with every per-file conversion. Writes are serialized through a
//! mutex so workers may share one log.

use crate::error::{Error, Result};
use crate::reader::Anomaly;
use log::warn;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    UnreadableFile,
    MalformedLog,
    MissingStartTime,
    MissingStopTime,
    RowTypeInconsistency,
    SchemaMismatch,
    Failed,
}

/// One entry of the diagnostic log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub path: PathBuf,
    pub detail: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn from_anomaly(path: &Path, anomaly: &Anomaly) -> Self {
        match anomaly {
            Anomaly::MissingStartTime => Self::new(DiagnosticKind::MissingStartTime, path),
            Anomaly::MissingStopTime => Self::new(DiagnosticKind::MissingStopTime, path),
            Anomaly::MixedRowTypes(values) => {
                Self::new(DiagnosticKind::RowTypeInconsistency, path).with_detail(values.join(", "))
            }
        }
    }

    pub fn from_error(path: &Path, err: &Error) -> Self {
        match err {
            Error::UnreadableFile { .. } | Error::Encoding(_) => {
                Self::new(DiagnosticKind::UnreadableFile, path)
            }
            Error::MalformedLog { missing } => {
                Self::new(DiagnosticKind::MalformedLog, path).with_detail(missing.join(", "))
            }
            Error::SchemaMismatch { column } => {
                Self::new(DiagnosticKind::SchemaMismatch, path).with_detail(column.clone())
            }
            Error::RowTypeInconsistency { values } => {
                Self::new(DiagnosticKind::RowTypeInconsistency, path).with_detail(values.join(", "))
            }
            other => Self::new(DiagnosticKind::Failed, path).with_detail(other.to_string()),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.display();
        let detail = self.detail.as_deref().unwrap_or_default();
        match self.kind {
            DiagnosticKind::UnreadableFile => write!(f, "Could not read {}", path),
            DiagnosticKind::MalformedLog => write!(f, "Malformed log {}: missing {}", path, detail),
            DiagnosticKind::MissingStartTime => write!(f, "No start time in {}", path),
            DiagnosticKind::MissingStopTime => write!(f, "No stop time in {}", path),
            DiagnosticKind::RowTypeInconsistency => {
                write!(f, "More than one type of row in {}: {}", path, detail)
            }
            DiagnosticKind::SchemaMismatch => {
                write!(f, "Missing column {} in {}", detail, path)
            }
            DiagnosticKind::Failed => write!(f, "Could not convert {}: {}", path, detail),
        }
    }
}

struct Inner {
    sink: Option<BufWriter<File>>,
    entries: Vec<Diagnostic>,
}

/// Append-only diagnostic log for one conversion run.
pub struct DiagnosticLog {
    inner: Mutex<Inner>,
}

impl DiagnosticLog {
    /// Create (or truncate) the log file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            inner: Mutex::new(Inner {
                sink: Some(BufWriter::new(file)),
                entries: Vec::new(),
            }),
        })
    }

    /// A log that only keeps entries in memory.
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(Inner {
                sink: None,
                entries: Vec::new(),
            }),
        }
    }

    /// Append an entry. It is written through to the file immediately.
    pub fn record(&self, diagnostic: Diagnostic) -> Result<()> {
        warn!("{}", diagnostic);

        let mut inner = self
            .inner
            .lock()
            .map_err(|_| Error::Other("diagnostic log lock poisoned".to_string()))?;

        if let Some(sink) = inner.sink.as_mut() {
            writeln!(sink, "{}", diagnostic)?;
            sink.flush()?;
        }
        inner.entries.push(diagnostic);
        Ok(())
    }

    /// Snapshot of everything recorded so far.
    pub fn entries(&self) -> Vec<Diagnostic> {
        match self.inner.lock() {
            Ok(inner) => inner.entries.clone(),
            Err(poisoned) => poisoned.into_inner().entries.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
