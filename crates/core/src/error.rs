//! Error types for rcw-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

use crate::command::Operation;

/// Result type alias for rcw-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for rcw-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid path format
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Remote profile not found
    #[error("Remote not found: {0}")]
    RemoteNotFound(String),

    /// The rclone executable could not be spawned
    #[error("Could not run '{0}': executable not found on PATH")]
    ToolNotFound(String),

    /// rclone ran but reported a failure
    ///
    /// `stderr` is the tool's captured error output, verbatim.
    #[error("{}: {stderr}", .operation.failure_prefix())]
    CommandFailed {
        operation: Operation,
        stderr: String,
        code: Option<i32>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Conflict error
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Feature not supported
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPath(_) => 2,        // UsageError
            Error::Config(_) => 2,             // UsageError
            Error::CommandFailed { .. } => 3,  // CommandFailed
            Error::ToolNotFound(_) => 4,       // ToolNotFound
            Error::RemoteNotFound(_) => 5,     // NotFound
            Error::Conflict(_) => 6,           // Conflict
            Error::UnsupportedFeature(_) => 7, // UnsupportedFeature
            _ => 1,                            // GeneralError
        }
    }

    /// Captured stderr of a failed rclone run, if this error carries one
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Error::CommandFailed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::InvalidPath("test".into()).exit_code(), 2);
        assert_eq!(Error::Config("test".into()).exit_code(), 2);
        assert_eq!(Error::ToolNotFound("rclone".into()).exit_code(), 4);
        assert_eq!(Error::RemoteNotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::Conflict("test".into()).exit_code(), 6);
        assert_eq!(Error::UnsupportedFeature("test".into()).exit_code(), 7);
        assert_eq!(Error::General("test".into()).exit_code(), 1);
    }

    #[test]
    fn test_command_failed_display() {
        let err = Error::CommandFailed {
            operation: Operation::Mkdir,
            stderr: "directory not found".into(),
            code: Some(3),
        };
        assert_eq!(
            err.to_string(),
            "Could not create the directory: directory not found"
        );
        assert_eq!(err.stderr(), Some("directory not found"));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_error_display() {
        let err = Error::RemoteNotFound("wasabi".into());
        assert_eq!(err.to_string(), "Remote not found: wasabi");

        let err = Error::InvalidPath("".into());
        assert_eq!(err.to_string(), "Invalid path: ");
        assert!(err.stderr().is_none());
    }
}
