//! Error handling module for nflaunch
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Every failure here is terminal for the invocation: the launcher never
//! retries, it reports and exits non-zero.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the launcher
#[derive(Error, Debug)]
pub enum NfLaunchError {
    /// A bundled template is missing from the resource root
    #[error("bundled template not found: {0}")]
    TemplateMissing(PathBuf),

    /// The parameters file exists but could not be parsed as a YAML mapping
    #[error("failed to read parameters file {path}: {reason}")]
    ConfigRead { path: PathBuf, reason: String },

    /// The workflow engine binary could not be spawned
    #[error("failed to launch workflow engine '{program}': {source}")]
    Launch {
        program: String,
        source: std::io::Error,
    },

    /// The workflow engine ran but exited non-zero
    #[error("workflow engine exited with status {status}")]
    ExternalTool { status: i32 },

    /// IO errors (file staging, config appends, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for launcher operations
pub type Result<T> = std::result::Result<T, NfLaunchError>;

impl NfLaunchError {
    /// Create a parameters-file read error
    pub fn config_read(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ConfigRead {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Exit status the launcher process should terminate with for this error.
    ///
    /// Every fatal condition maps to 1, matching the launcher's exit-code
    /// contract (0 success, 1 on any failure).
    pub fn exit_code(&self) -> i32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NfLaunchError::TemplateMissing(PathBuf::from("/opt/tool/workflow/params.yaml"));
        assert_eq!(
            err.to_string(),
            "bundled template not found: /opt/tool/workflow/params.yaml"
        );

        let err = NfLaunchError::ExternalTool { status: 17 };
        assert_eq!(err.to_string(), "workflow engine exited with status 17");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: NfLaunchError = io_err.into();
        assert!(matches!(err, NfLaunchError::Io(_)));
    }

    #[test]
    fn test_config_read_constructor() {
        let err = NfLaunchError::config_read("params.yaml", "not a mapping");
        assert!(matches!(err, NfLaunchError::ConfigRead { .. }));
        assert_eq!(
            err.to_string(),
            "failed to read parameters file params.yaml: not a mapping"
        );
    }

    #[test]
    fn test_exit_codes_are_nonzero() {
        let errors = [
            NfLaunchError::TemplateMissing(PathBuf::from("x")),
            NfLaunchError::ExternalTool { status: 17 },
            NfLaunchError::config_read("p", "r"),
        ];
        for err in errors {
            assert_eq!(err.exit_code(), 1);
        }
    }
}
