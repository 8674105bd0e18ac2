//! cp command - Copy files
//!
//! Copies between a local path and a remote, or within one remote, with
//! `rclone copy`.

use clap::Args;
use rcw_core::RemoteStore as _;
use serde::Serialize;

use super::{Context, Transfer, resolve_transfer};
use crate::exit_code::ExitCode;
use crate::output::Spinner;

/// Copy files
#[derive(Args, Debug)]
pub struct CpArgs {
    /// Source path (local path or remote:bucket/key)
    pub source: String,

    /// Destination directory (local path or remote:bucket/key)
    pub target: String,

    /// Make uploaded objects publicly readable
    #[arg(long)]
    pub public: bool,
}

/// JSON output for transfer commands
#[derive(Debug, Serialize)]
pub(super) struct TransferOutput {
    pub status: &'static str,
    pub operation: &'static str,
    pub source: String,
    pub target: String,
    pub public: bool,
}

/// Execute the cp command
pub async fn execute(args: CpArgs, ctx: &Context) -> ExitCode {
    let transfer = match resolve_transfer(&args.source, &args.target) {
        Ok(t) => t,
        Err(e) => return ctx.fail(&e),
    };

    let profile = match ctx.profile(&transfer.remote) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let public = effective_public(&transfer, args.public, ctx);

    let spinner = Spinner::start(
        ctx.formatter.config(),
        &format!("Copying {} -> {}", transfer.source, transfer.target),
    );
    let result = ctx
        .client
        .copy(&profile, &transfer.source, &transfer.target, public)
        .await;
    spinner.finish_and_clear();

    match result {
        Ok(()) => {
            report_transfer(ctx, "copy", transfer, public);
            ExitCode::Success
        }
        Err(e) => ctx.fail(&e),
    }
}

/// The ACL flag only applies when writing to a remote
pub(super) fn effective_public(transfer: &Transfer, public: bool, ctx: &Context) -> bool {
    if public && transfer.target_is_local {
        ctx.formatter
            .warning("--public has no effect when the target is a local path");
        return false;
    }
    public
}

pub(super) fn report_transfer(
    ctx: &Context,
    operation: &'static str,
    transfer: Transfer,
    public: bool,
) {
    if ctx.formatter.is_json() {
        ctx.formatter.json(&TransferOutput {
            status: "success",
            operation,
            source: transfer.source,
            target: transfer.target,
            public,
        });
    } else {
        ctx.formatter.success(&format!(
            "{} -> {}",
            transfer.source, transfer.target
        ));
    }
}
