//! mv command - Move files
//!
//! By default the source lands at exactly the target path (`rclone moveto`).
//! With `--merge` the contents of the source are moved into the target
//! directory (`rclone move`).

use clap::Args;
use rcw_core::RemoteStore as _;

use super::cp::{effective_public, report_transfer};
use super::{Context, resolve_transfer};
use crate::exit_code::ExitCode;
use crate::output::Spinner;

/// Move files
#[derive(Args, Debug)]
pub struct MvArgs {
    /// Source path (local path or remote:bucket/key)
    pub source: String,

    /// Destination path (local path or remote:bucket/key)
    pub target: String,

    /// Move the contents of source into target instead of renaming it
    #[arg(long)]
    pub merge: bool,

    /// Make uploaded objects publicly readable
    #[arg(long)]
    pub public: bool,
}

/// Execute the mv command
pub async fn execute(args: MvArgs, ctx: &Context) -> ExitCode {
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
        &format!("Moving {} -> {}", transfer.source, transfer.target),
    );
    let result = if args.merge {
        ctx.client
            .move_into(&profile, &transfer.source, &transfer.target, public)
            .await
    } else {
        ctx.client
            .move_to(&profile, &transfer.source, &transfer.target, public)
            .await
    };
    spinner.finish_and_clear();

    match result {
        Ok(()) => {
            let operation = if args.merge { "move" } else { "moveto" };
            report_transfer(ctx, operation, transfer, public);
            ExitCode::Success
        }
        Err(e) => ctx.fail(&e),
    }
}
