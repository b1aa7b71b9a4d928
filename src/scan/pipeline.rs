//! The scan pipeline: discover files, check each one, gather the results.
//!
//! Files are independent, so they are checked in parallel with rayon. Each
//! worker builds its own tree-sitter parser; the reporter is shared by
//! reference. The cancellation token is checked before every file and, inside
//! the reporter, before every candidate.

use std::path::{Path, PathBuf};
use std::time::Instant;

use indicatif::ProgressBar;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::files::{collect_java_files, ScanFailure};
use crate::config::LintConfig;
use crate::engine::{CancellationToken, FileReport, MismatchReporter, WalkOptions};
use crate::error::{MismatchError, Result};
use crate::observability::Metrics;
use crate::syntax::JavaSource;
use crate::types::Finding;

/// How the pipeline runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub parallel: bool,
    /// Worker threads; `None` uses rayon's global pool.
    pub jobs: Option<usize>,
    pub early_exit: bool,
}

impl ScanOptions {
    pub fn from_config(config: &LintConfig) -> Self {
        Self {
            parallel: config.performance.parallel,
            jobs: None,
            early_exit: config.performance.early_exit,
        }
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from_config(&LintConfig::default())
    }
}

/// Everything a scan produced.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Sorted by file, line, column.
    pub findings: Vec<Finding>,
    pub failures: Vec<ScanFailure>,
    pub metrics: Metrics,
}

impl ScanResult {
    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }
}

enum FileOutcome {
    Checked(FileReport),
    Failed(ScanFailure),
}

/// Runs the reporter over a set of paths.
pub struct ScanPipeline {
    reporter: MismatchReporter,
    options: ScanOptions,
    progress: Option<ProgressBar>,
}

impl ScanPipeline {
    pub fn new(config: &LintConfig, options: ScanOptions) -> Result<Self> {
        let reporter = MismatchReporter::new(config)?.with_options(WalkOptions {
            early_exit: options.early_exit,
        });
        Ok(Self {
            reporter,
            options,
            progress: None,
        })
    }

    /// Tick `progress` once per checked file.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn reporter(&self) -> &MismatchReporter {
        &self.reporter
    }

    /// Scan every Java file under `roots`.
    pub fn run(&self, roots: &[PathBuf], cancel: &CancellationToken) -> Result<ScanResult> {
        let start = Instant::now();
        let (files, failures) = collect_java_files(roots);
        info!("Checking {} Java files", files.len());
        if let Some(progress) = &self.progress {
            progress.set_length(files.len() as u64);
        }

        let outcomes = match self.options.jobs {
            Some(jobs) if self.options.parallel => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .build()
                    .map_err(|e| MismatchError::Other(format!("thread pool: {e}")))?;
                pool.install(|| self.check_all(&files, cancel))
            }
            _ => self.check_all(&files, cancel),
        }?;

        let mut result = ScanResult {
            failures,
            ..ScanResult::default()
        };
        result.metrics.files_failed = result.failures.len();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Checked(report) => {
                    result.metrics.record_file(&report);
                    result.findings.extend(report.findings);
                }
                FileOutcome::Failed(failure) => {
                    result.metrics.record_failure();
                    result.failures.push(failure);
                }
            }
        }
        result.findings.sort_by(|a, b| {
            (&a.location.file_path, a.location.line, a.location.column).cmp(&(
                &b.location.file_path,
                b.location.line,
                b.location.column,
            ))
        });
        result.metrics.scan_duration_ms = Some(start.elapsed().as_millis() as u64);

        if let Some(progress) = &self.progress {
            progress.finish_and_clear();
        }
        info!(
            files = result.metrics.files_scanned,
            failed = result.metrics.files_failed,
            candidates = result.metrics.candidates,
            findings = result.metrics.findings,
            "Scan complete in {}ms",
            result.metrics.scan_duration_ms.unwrap_or(0)
        );
        Ok(result)
    }

    fn check_all(&self, files: &[PathBuf], cancel: &CancellationToken) -> Result<Vec<FileOutcome>> {
        if self.options.parallel {
            files
                .par_iter()
                .map(|path| self.check_path(path, cancel))
                .collect()
        } else {
            files.iter().map(|path| self.check_path(path, cancel)).collect()
        }
    }

    fn check_path(&self, path: &Path, cancel: &CancellationToken) -> Result<FileOutcome> {
        cancel.check()?;
        let outcome = match self.check_file(path, cancel) {
            Ok(report) => FileOutcome::Checked(report),
            Err(MismatchError::Cancelled) => return Err(MismatchError::Cancelled),
            Err(e) => {
                warn!("Failed to check {}: {}", path.display(), e);
                FileOutcome::Failed(ScanFailure {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };
        if let Some(progress) = &self.progress {
            progress.inc(1);
        }
        Ok(outcome)
    }

    /// Read, parse, and check one file.
    pub fn check_file(&self, path: &Path, cancel: &CancellationToken) -> Result<FileReport> {
        let source = JavaSource::read(path)?;
        if source.has_errors() {
            debug!(path = %path.display(), "file has syntax errors, checking recovered tree");
        }
        self.reporter.check_source(&source, cancel)
    }
}
