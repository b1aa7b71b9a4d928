//! Error type shared by the parser, config loader, and scan pipeline.
//!
//! The classification engine itself never fails: every syntactic shape has a
//! defined fallback. Errors only come from the host layers around it.

use thiserror::Error;

/// Errors produced by mismatch-lint outside the classification engine.
#[derive(Debug, Error)]
pub enum MismatchError {
    /// Grammar loading, query compilation, or parser failure.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid or unreadable configuration.
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The scan was cancelled before it finished.
    #[error("scan cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, MismatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = MismatchError::Parse("bad grammar".into());
        assert_eq!(err.to_string(), "parse error: bad grammar");

        let err = MismatchError::Config("missing field".into());
        assert_eq!(err.to_string(), "config error: missing field");
    }

    #[test]
    fn io_errors_convert() {
        fn open() -> Result<String> {
            Ok(std::fs::read_to_string("/definitely/not/here.java")?)
        }
        assert!(matches!(open(), Err(MismatchError::Io(_))));
    }

    #[test]
    fn cancelled_message() {
        assert_eq!(MismatchError::Cancelled.to_string(), "scan cancelled");
    }
}
