//! ls command - List files and directories
//!
//! Runs `rclone lsjson` and prints the entries, or passes them through
//! untouched in JSON mode.

use clap::Args;
use rcw_core::{ListEntry, RemoteStore as _, parse_remote_path};
use serde::Serialize;

use super::Context;
use crate::exit_code::ExitCode;

/// List files and directories
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Path to list (remote:bucket/prefix)
    pub path: String,

    /// Only list directories
    #[arg(long, conflicts_with = "files_only")]
    pub dirs_only: bool,

    /// Only list files
    #[arg(long)]
    pub files_only: bool,

    /// Show a summary line
    #[arg(long)]
    pub summarize: bool,
}

/// JSON output for ls
///
/// `entries` is null when rclone printed nothing at all.
#[derive(Debug, Serialize)]
struct LsOutput {
    path: String,
    entries: Option<Vec<ListEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

#[derive(Debug, Serialize)]
struct Summary {
    total_files: usize,
    total_dirs: usize,
    total_size_bytes: u64,
    total_size_human: String,
}

impl Summary {
    fn of(entries: &[ListEntry]) -> Self {
        let total_dirs = entries.iter().filter(|e| e.is_dir()).count();
        let total_size_bytes: u64 = entries
            .iter()
            .filter(|e| !e.is_dir())
            .filter_map(ListEntry::size)
            .map(|s| s.max(0) as u64)
            .sum();
        Self {
            total_files: entries.len() - total_dirs,
            total_dirs,
            total_size_bytes,
            total_size_human: humansize::format_size(total_size_bytes, humansize::BINARY),
        }
    }
}

/// Execute the ls command
pub async fn execute(args: LsArgs, ctx: &Context) -> ExitCode {
    let path = match parse_remote_path(&args.path) {
        Ok(p) => p,
        Err(e) => return ctx.fail(&e),
    };

    let profile = match ctx.profile(&path.remote) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let target = args.path.clone();
    let result = if args.dirs_only {
        ctx.client.list_dirs(&profile, &target).await
    } else if args.files_only {
        ctx.client.list_files(&profile, &target).await
    } else {
        ctx.client.list(&profile, &target).await
    };

    let entries = match result {
        Ok(entries) => entries,
        Err(e) => return ctx.fail(&e),
    };

    if ctx.formatter.is_json() {
        let summary = match (&entries, args.summarize) {
            (Some(list), true) => Some(Summary::of(list)),
            _ => None,
        };
        ctx.formatter.json(&LsOutput {
            path: target,
            entries,
            summary,
        });
        return ExitCode::Success;
    }

    let entries = entries.unwrap_or_default();
    for entry in &entries {
        ctx.formatter.println(&format_entry(entry));
    }

    if args.summarize {
        let summary = Summary::of(&entries);
        ctx.formatter.println(&format!(
            "\nTotal: {} files, {} directories, {}",
            summary.total_files, summary.total_dirs, summary.total_size_human
        ));
    }

    ExitCode::Success
}

fn format_entry(entry: &ListEntry) -> String {
    let date = entry
        .mod_time()
        .map(|t| t.strftime("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| " ".repeat(19));
    let name = entry.path().or(entry.name()).unwrap_or("?");

    if entry.is_dir() {
        format!("[{date}]     0B {name}/")
    } else {
        let size = entry.size().unwrap_or(0).max(0) as u64;
        let size = humansize::format_size(size, humansize::BINARY);
        format!("[{date}] {size:>6} {name}")
    }
}
