//! Structured logging and scan metrics.
//!
//! This module provides:
//! - [`init_logging`] — One-time structured logging setup with `RUST_LOG` support
//! - [`Metrics`] — Counters collected over one scan

use crate::engine::FileReport;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "mismatch_lint=info";

/// Initialize structured logging with `RUST_LOG` environment variable support.
///
/// Defaults to [`DEFAULT_FILTER`], or `mismatch_lint=debug` when `verbose`
/// is set. Logs go to stderr so JSON output on stdout stays clean. Call once
/// at program startup; later calls are ignored.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose {
        "mismatch_lint=debug"
    } else {
        DEFAULT_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // try_init so double-init in tests doesn't panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

/// Counters for one scan.
///
/// Serializable to JSON via [`Metrics::to_json`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metrics {
    pub scan_duration_ms: Option<u64>,
    pub files_scanned: usize,
    /// Files that could not be read or parsed.
    pub files_failed: usize,
    pub candidates: usize,
    /// Candidates dropped by a pre-filter or an escape.
    pub skipped: usize,
    pub findings: usize,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the totals of one checked file.
    pub fn record_file(&mut self, report: &FileReport) {
        self.files_scanned += 1;
        self.candidates += report.candidates;
        self.skipped += report.skipped;
        self.findings += report.findings.len();
    }

    pub fn record_failure(&mut self) {
        self.files_failed += 1;
    }

    /// Fold another collector into this one.
    pub fn merge(&mut self, other: &Metrics) {
        self.files_scanned += other.files_scanned;
        self.files_failed += other.files_failed;
        self.candidates += other.candidates;
        self.skipped += other.skipped;
        self.findings += other.findings;
    }

    /// Share of candidates that reached classification.
    pub fn classified_rate(&self) -> f64 {
        if self.candidates == 0 {
            return 0.0;
        }
        (self.candidates - self.skipped) as f64 / self.candidates as f64
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "scan_duration_ms": self.scan_duration_ms,
            "files_scanned": self.files_scanned,
            "files_failed": self.files_failed,
            "candidates": self.candidates,
            "skipped": self.skipped,
            "findings": self.findings,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
