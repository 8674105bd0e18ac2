//! mkdir command - Create a directory
//!
//! Runs `rclone mkdir` against a remote path.

use clap::Args;
use rcw_core::{RemoteStore as _, parse_remote_path};
use serde::Serialize;

use super::Context;
use crate::exit_code::ExitCode;

/// Create a directory
#[derive(Args, Debug)]
pub struct MkdirArgs {
    /// Directory to create (remote:bucket/path)
    pub path: String,
}

#[derive(Debug, Serialize)]
struct MkdirOutput {
    status: &'static str,
    path: String,
}

/// Execute the mkdir command
pub async fn execute(args: MkdirArgs, ctx: &Context) -> ExitCode {
    let path = match parse_remote_path(&args.path) {
        Ok(p) => p,
        Err(e) => return ctx.fail(&e),
    };

    let profile = match ctx.profile(&path.remote) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let target = args.path.clone();
    match ctx.client.mkdir(&profile, &target).await {
        Ok(()) => {
            if ctx.formatter.is_json() {
                ctx.formatter.json(&MkdirOutput {
                    status: "success",
                    path: target,
                });
            } else {
                ctx.formatter
                    .success(&format!("Directory '{target}' created."));
            }
            ExitCode::Success
        }
        Err(e) => ctx.fail(&e),
    }
}
