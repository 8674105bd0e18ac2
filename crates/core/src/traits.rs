//! Runner and RemoteStore trait definitions
//!
//! `Runner` is the seam between command construction and process spawning,
//! so result translation can be tested without an rclone binary.
//! `RemoteStore` is the operation surface the CLI is written against.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::command::Invocation;
use crate::error::Result;
use crate::listing::ListEntry;
use crate::remote::RemoteProfile;

/// Captured result of one rclone run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, or None if the process was killed by a signal
    pub code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the process exited with status zero
    pub fn exited_ok(&self) -> bool {
        self.code == Some(0)
    }

    /// Decide whether this run failed under the given policy
    pub fn failed(&self, policy: FailurePolicy) -> bool {
        match policy {
            FailurePolicy::ExitStatus => !self.exited_ok(),
            FailurePolicy::Stderr => !self.stderr.is_empty(),
        }
    }
}

/// How a failed rclone run is recognized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// A non-zero exit status is failure; stderr is diagnostic only
    #[default]
    ExitStatus,
    /// Any stderr output is failure and its absence is success, whatever
    /// the exit status
    Stderr,
}

/// Spawns an invocation and captures its output
///
/// Implementations must return `Ok` for a process that ran and exited
/// non-zero; only failures to run at all are errors.
#[async_trait]
pub trait Runner: Send + Sync {
    /// Run the invocation to completion
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput>;
}

/// Operations available against an rclone remote
///
/// Every call runs exactly one rclone process and waits for it to exit.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Create a directory (`mkdir`)
    async fn mkdir(&self, profile: &RemoteProfile, path: &str) -> Result<()>;

    /// List files and directories (`lsjson`)
    ///
    /// `None` means rclone printed nothing.
    async fn list(&self, profile: &RemoteProfile, path: &str) -> Result<Option<Vec<ListEntry>>>;

    /// List directories only (`lsjson --dirs-only`)
    async fn list_dirs(
        &self,
        profile: &RemoteProfile,
        path: &str,
    ) -> Result<Option<Vec<ListEntry>>>;

    /// List files only (`lsjson --files-only`)
    async fn list_files(
        &self,
        profile: &RemoteProfile,
        path: &str,
    ) -> Result<Option<Vec<ListEntry>>>;

    /// Copy `source` into `target` (`copy`)
    async fn copy(
        &self,
        profile: &RemoteProfile,
        source: &str,
        target: &str,
        public: bool,
    ) -> Result<()>;

    /// Move `source` to exactly `target` (`moveto`)
    async fn move_to(
        &self,
        profile: &RemoteProfile,
        source: &str,
        target: &str,
        public: bool,
    ) -> Result<()>;

    /// Move the contents of `source` into `target` (`move`)
    async fn move_into(
        &self,
        profile: &RemoteProfile,
        source: &str,
        target: &str,
        public: bool,
    ) -> Result<()>;

    /// Delete files under a path, keeping directories (`delete`)
    async fn delete(&self, profile: &RemoteProfile, path: &str) -> Result<()>;

    /// Delete files and remove emptied directories (`delete --rmdirs`)
    async fn delete_tree(&self, profile: &RemoteProfile, path: &str) -> Result<()>;

    /// Whether `dir` contains an entry named exactly `name`
    async fn exists(&self, profile: &RemoteProfile, dir: &str, name: &str) -> Result<bool>;

    /// Whether listing `path` succeeds at all
    async fn is_reachable(&self, profile: &RemoteProfile, path: &str) -> Result<bool>;

    /// Run an arbitrary rclone subcommand with the profile's credentials
    async fn exec(&self, profile: &RemoteProfile, args: &[String]) -> Result<()>;
}
