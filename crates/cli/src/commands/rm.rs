//! rm command - Remove files
//!
//! Runs `rclone delete`, optionally with `--rmdirs` to also drop the
//! directories it empties.

use clap::Args;
use rcw_core::{RemoteStore as _, parse_remote_path};
use serde::Serialize;

use super::Context;
use crate::exit_code::ExitCode;
use crate::output::Spinner;

/// Remove files
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Path to remove (remote:bucket/path)
    pub path: String,

    /// Also remove directories left empty
    #[arg(long)]
    pub rmdirs: bool,
}

#[derive(Debug, Serialize)]
struct RmOutput {
    status: &'static str,
    path: String,
    rmdirs: bool,
}

/// Execute the rm command
pub async fn execute(args: RmArgs, ctx: &Context) -> ExitCode {
    let path = match parse_remote_path(&args.path) {
        Ok(p) => p,
        Err(e) => return ctx.fail(&e),
    };

    let profile = match ctx.profile(&path.remote) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let target = args.path.clone();
    let spinner = Spinner::start(ctx.formatter.config(), &format!("Removing {target}"));
    let result = if args.rmdirs {
        ctx.client.delete_tree(&profile, &target).await
    } else {
        ctx.client.delete(&profile, &target).await
    };
    spinner.finish_and_clear();

    match result {
        Ok(()) => {
            if ctx.formatter.is_json() {
                ctx.formatter.json(&RmOutput {
                    status: "success",
                    path: target,
                    rmdirs: args.rmdirs,
                });
            } else {
                ctx.formatter.success(&format!("Removed '{target}'."));
            }
            ExitCode::Success
        }
        Err(e) => ctx.fail(&e),
    }
}
