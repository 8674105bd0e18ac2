//! rclone command construction
//!
//! Builds the argument vector and credential environment for a single rclone
//! run. Arguments stay a structured list from construction to spawn, so a
//! path containing spaces is always passed as one argument.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::remote::{DEFAULT_ENV_PREFIX, RemoteProfile};

/// Flag asking rclone to mark uploaded objects as publicly readable
pub const PUBLIC_ACL_ARGS: [&str; 2] = ["--s3-acl", "public-read"];

/// The rclone operations wrapped by rcw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    /// `mkdir`
    Mkdir,
    /// `lsjson`
    List,
    /// `lsjson --dirs-only`
    ListDirs,
    /// `lsjson --files-only`
    ListFiles,
    /// `copy`
    Copy,
    /// `moveto`: move a single file or directory to an exact destination
    MoveTo,
    /// `move`: merge the source contents into the destination
    Move,
    /// `delete`
    Delete,
    /// `delete --rmdirs`
    DeleteTree,
    /// Caller-supplied subcommand
    Exec,
}

impl Operation {
    /// Leading rclone arguments for this operation
    pub const fn subcommand(self) -> &'static [&'static str] {
        match self {
            Operation::Mkdir => &["mkdir"],
            Operation::List => &["lsjson"],
            Operation::ListDirs => &["lsjson", "--dirs-only"],
            Operation::ListFiles => &["lsjson", "--files-only"],
            Operation::Copy => &["copy"],
            Operation::MoveTo => &["moveto"],
            Operation::Move => &["move"],
            Operation::Delete => &["delete"],
            Operation::DeleteTree => &["delete", "--rmdirs"],
            Operation::Exec => &[],
        }
    }

    /// Message prefix used when this operation fails
    pub const fn failure_prefix(self) -> &'static str {
        match self {
            Operation::Mkdir => "Could not create the directory",
            Operation::List => "Could not list files",
            Operation::ListDirs => "Could not list the directories",
            Operation::ListFiles => "Could not list the files",
            Operation::Copy => "Could not copy files",
            Operation::MoveTo | Operation::Move => "Could not move files",
            Operation::Delete | Operation::DeleteTree => "Could not remove files",
            Operation::Exec => "Could not run command",
        }
    }

    /// Whether the operation produces a JSON listing on stdout
    pub const fn is_listing(self) -> bool {
        matches!(
            self,
            Operation::List | Operation::ListDirs | Operation::ListFiles
        )
    }

    /// Whether the operation accepts the public-read ACL flag
    pub const fn accepts_acl(self) -> bool {
        matches!(
            self,
            Operation::Copy | Operation::MoveTo | Operation::Move | Operation::Exec
        )
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Exec => write!(f, "exec"),
            op => write!(f, "{}", op.subcommand().join(" ")),
        }
    }
}

/// A fully built rclone invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Operation this invocation performs
    pub operation: Operation,
    /// Executable name or path
    pub program: String,
    /// Arguments, in order, one entry per argv slot
    pub args: Vec<String>,
    /// Variables added on top of the inherited environment
    pub envs: BTreeMap<String, String>,
}

impl Invocation {
    /// Render the command line for logs
    ///
    /// Arguments containing whitespace or quotes are single-quoted. The
    /// rendered string is for display only and is never re-split.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(quote_for_display)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.command_line())
    }
}

fn quote_for_display(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }
    if arg.chars().any(|c| c.is_whitespace() || c == '\'' || c == '"') {
        format!("'{}'", arg.replace('\'', r"'\''"))
    } else {
        arg.to_string()
    }
}

/// Builder for a single rclone invocation
#[derive(Debug, Clone)]
pub struct InvocationBuilder<'a> {
    program: String,
    env_prefix: String,
    profile: &'a RemoteProfile,
    operation: Operation,
    args: Vec<String>,
    public: bool,
}

impl<'a> InvocationBuilder<'a> {
    /// Start a builder for the given executable and remote profile
    pub fn new(program: impl Into<String>, profile: &'a RemoteProfile) -> Self {
        Self {
            program: program.into(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            profile,
            operation: Operation::Exec,
            args: Vec::new(),
            public: false,
        }
    }

    /// Use a different credential environment prefix
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Select the rclone operation
    pub fn operation(mut self, operation: Operation) -> Self {
        self.operation = operation;
        self
    }

    /// Append a positional argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several positional arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Mark uploaded objects as publicly readable
    ///
    /// Ignored for operations that do not upload.
    pub fn public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    /// Produce the final invocation
    ///
    /// Layout: `--config <file> <subcommand...> <args...> [--s3-acl public-read]`
    pub fn build(self) -> Invocation {
        let mut args = Vec::with_capacity(self.args.len() + 6);
        args.push("--config".to_string());
        args.push(self.profile.config_file.to_string_lossy().into_owned());
        args.extend(self.operation.subcommand().iter().map(|s| s.to_string()));
        args.extend(self.args);
        if self.public && self.operation.accepts_acl() {
            args.extend(PUBLIC_ACL_ARGS.iter().map(|s| s.to_string()));
        }

        Invocation {
            operation: self.operation,
            program: self.program,
            args,
            envs: self.profile.env_overlay(&self.env_prefix),
        }
    }
}
