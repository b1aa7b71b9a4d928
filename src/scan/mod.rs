//! File discovery and the parallel scan pipeline.

pub mod files;
pub mod pipeline;

pub use files::{collect_java_files, ScanFailure};
pub use pipeline::{ScanOptions, ScanPipeline, ScanResult};
