//! Path parsing and resolution
//!
//! Classifies arguments as rclone remote paths (`remote:path`) or local
//! paths. Parsing only identifies the remote whose credentials a call needs;
//! the path itself is handed to rclone exactly as written, so leading
//! slashes and other backend-specific syntax survive.

use crate::error::{Error, Result};

/// A remote path: the remote name plus everything after the colon, verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePath {
    /// Remote name (the part before the first colon)
    pub remote: String,
    /// Path on the remote as written (may be empty, may start with `/`)
    pub path: String,
}

impl RemotePath {
    pub fn new(remote: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            path: path.into(),
        }
    }
}

impl std::fmt::Display for RemotePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.remote, self.path)
    }
}

/// Parsed path that can be either local or remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedPath {
    /// Local filesystem path
    Local(std::path::PathBuf),
    /// rclone remote path
    Remote(RemotePath),
}

impl ParsedPath {
    /// Check if this is a local path
    pub fn is_local(&self) -> bool {
        matches!(self, ParsedPath::Local(_))
    }
}

/// Parse a path string into a ParsedPath
///
/// Local paths are anything that:
/// - Starts with / (absolute path)
/// - Starts with ./ or ../ (relative path)
/// - Contains no colon
/// - Has something other than a valid remote name before the first colon
pub fn parse_path(path: &str) -> Result<ParsedPath> {
    if path.is_empty() {
        return Err(Error::InvalidPath("Path cannot be empty".into()));
    }

    if path.starts_with('/') || path.starts_with("./") || path.starts_with("../") {
        return Ok(ParsedPath::Local(path.into()));
    }

    // Windows drive letters look like one-letter remotes
    #[cfg(windows)]
    if path.len() >= 2 && path.as_bytes()[1] == b':' && path.as_bytes()[0].is_ascii_alphabetic()
    {
        return Ok(ParsedPath::Local(path.into()));
    }

    match path.split_once(':') {
        Some((remote, rest)) if is_valid_remote_name(remote) => {
            Ok(ParsedPath::Remote(RemotePath::new(remote, rest)))
        }
        _ => Ok(ParsedPath::Local(path.into())),
    }
}

/// Parse a path that must name a remote location
pub fn parse_remote_path(path: &str) -> Result<RemotePath> {
    match parse_path(path)? {
        ParsedPath::Remote(remote) => Ok(remote),
        ParsedPath::Local(_) => Err(Error::InvalidPath(format!(
            "'{path}' is not a remote path. Use format: remote:path"
        ))),
    }
}

/// Check if a string is a valid remote name
pub fn is_valid_remote_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remote_path() {
        let remote = parse_remote_path("wasabi:bucket/reports/file.json").unwrap();
        assert_eq!(remote.remote, "wasabi");
        assert_eq!(remote.path, "bucket/reports/file.json");
    }

    #[test]
    fn test_remote_path_keeps_leading_slash() {
        for raw in ["scratch:/tmp/data", "sftp:/data", "s3://bucket//double"] {
            assert_eq!(parse_remote_path(raw).unwrap().to_string(), raw);
        }
    }

    #[test]
    fn test_parse_remote_path_keeps_trailing_slash() {
        let remote = parse_remote_path("wasabi:bucket/dir/").unwrap();
        assert_eq!(remote.path, "bucket/dir/");
    }

    #[test]
    fn test_parse_remote_root() {
        let remote = parse_remote_path("wasabi:").unwrap();
        assert_eq!(remote.path, "");
        assert_eq!(remote.to_string(), "wasabi:");
    }

    #[test]
    fn test_parse_local_paths() {
        assert!(parse_path("/home/user/file.txt").unwrap().is_local());
        assert!(parse_path("./file.txt").unwrap().is_local());
        assert!(parse_path("../file.txt").unwrap().is_local());
        assert!(parse_path("file.txt").unwrap().is_local());
        assert!(parse_path("weird name:with space").unwrap().is_local());
    }

    #[test]
    fn test_parse_remote_is_not_local() {
        let parsed = parse_path("s3:bucket/key").unwrap();
        assert!(!parsed.is_local());
        assert_eq!(parsed, ParsedPath::Remote(RemotePath::new("s3", "bucket/key")));
    }

    #[test]
    fn test_parse_empty_path() {
        assert!(matches!(parse_path(""), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_parse_remote_path_rejects_local() {
        assert!(matches!(
            parse_remote_path("./local"),
            Err(Error::InvalidPath(_))
        ));
    }
}
