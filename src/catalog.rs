//! Discovery of source logs and construction of dataset output paths.
//!
//! Source logs are named `<subject>_<session>_..._<TaskKey>.txt`. Each one
//! becomes a [`ConversionJob`] whose outputs live under
//! `<root>/sub-<subject>/ses-<session>/func/`.

use crate::error::{Error, Result};
use crate::models::TableFormat;
use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const SOURCE_EXTENSION: &str = "txt";

/// Mapping from the task key used in source file names to the task label used
/// in output names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskMap(Vec<(String, String)>);

impl TaskMap {
    pub fn new() -> Self {
        TaskMap(Vec::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, label: impl Into<String>) {
        let key = key.into();
        let label = label.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = label,
            None => self.0.push((key, label)),
        }
    }

    /// Parse a `KEY=LABEL` pair.
    pub fn parse_entry(entry: &str) -> Result<(String, String)> {
        match entry.split_once('=') {
            Some((key, label)) if !key.is_empty() && !label.is_empty() => {
                Ok((key.to_string(), label.to_string()))
            }
            _ => Err(Error::Other(format!(
                "invalid task mapping '{}', expected KEY=LABEL",
                entry
            ))),
        }
    }

    /// Label for a file stem ending in one of the task keys.
    fn label_for(&self, stem: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| stem.ends_with(key.as_str()))
            .map(|(_, label)| label.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for TaskMap {
    fn default() -> Self {
        let mut tasks = TaskMap::new();
        tasks.insert("Resting", "rest");
        tasks.insert("Sleepiness", "sleepiness");
        tasks
    }
}

/// One input file and the outputs it converts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub subject: String,
    pub session: String,
    pub task: String,
    pub input: PathBuf,
    pub table_path: PathBuf,
    pub sidecar_path: PathBuf,
}

impl ConversionJob {
    pub fn new(
        out_root: &Path,
        subject: &str,
        session: &str,
        task: &str,
        input: PathBuf,
        format: TableFormat,
    ) -> Self {
        let dir = out_root
            .join(format!("sub-{}", subject))
            .join(format!("ses-{}", session))
            .join("func");
        let stem = format!("sub-{}_ses-{}_task-{}_eyetrack", subject, session, task);

        Self {
            subject: subject.to_string(),
            session: session.to_string(),
            task: task.to_string(),
            input,
            table_path: dir.join(format!("{}.{}", stem, format.extension())),
            sidecar_path: dir.join(format!("{}.json", stem)),
        }
    }

    /// Create the output directory.
    pub fn prepare(&self) -> io::Result<()> {
        match self.table_path.parent() {
            Some(dir) => fs::create_dir_all(dir),
            None => Ok(()),
        }
    }
}

/// Options for [`discover_jobs`].
#[derive(Debug, Clone)]
pub struct Discovery {
    pub tasks: TaskMap,
    /// Restrict to these subjects. Empty means all.
    pub subjects: Vec<String>,
    pub format: TableFormat,
}

impl Default for Discovery {
    fn default() -> Self {
        Self {
            tasks: TaskMap::default(),
            subjects: Vec::new(),
            format: TableFormat::Tsv,
        }
    }
}

/// Recursively find source logs under `source_dir`. Jobs are sorted by input path.
pub fn discover_jobs(source_dir: &Path, out_root: &Path, options: &Discovery) -> Result<Vec<ConversionJob>> {
    let mut files = Vec::new();
    collect_files(source_dir, &mut files)?;
    files.sort();

    let mut jobs = Vec::new();
    for path in files {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(task) = options.tasks.label_for(stem) else {
            debug!("Skipping {} (no task key)", path.display());
            continue;
        };

        let mut parts = stem.split('_');
        let (Some(subject), Some(session)) = (parts.next(), parts.next()) else {
            debug!("Skipping {} (no subject/session prefix)", path.display());
            continue;
        };
        if subject.is_empty() || session.is_empty() {
            continue;
        }
        if !options.subjects.is_empty() && !options.subjects.iter().any(|s| s == subject) {
            continue;
        }

        let job = ConversionJob::new(out_root, subject, session, task, path.clone(), options.format);
        jobs.push(job);
    }

    Ok(jobs)
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        // symlinked directories are not followed
        if entry.file_type()?.is_dir() {
            collect_files(&path, files)?;
        } else if path.extension().and_then(|ext| ext.to_str()) == Some(SOURCE_EXTENSION) {
            files.push(path);
        }
    }
    Ok(())
}
