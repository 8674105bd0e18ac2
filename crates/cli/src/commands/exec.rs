//! exec command - Run any rclone subcommand
//!
//! Everything after `--` is handed to rclone unchanged, after the remote's
//! `--config` file and with its credentials in the environment.

use clap::Args;
use rcw_core::{RemoteStore as _, is_valid_remote_name};

use super::Context;
use crate::exit_code::ExitCode;

/// Run any rclone subcommand with a remote's credentials
#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Remote profile whose credentials are used
    pub remote: String,

    /// rclone arguments, e.g. `-- size wasabi:bucket`
    #[arg(last = true, required = true)]
    pub args: Vec<String>,
}

/// Execute the exec command
pub async fn execute(args: ExecArgs, ctx: &Context) -> ExitCode {
    if !is_valid_remote_name(&args.remote) {
        ctx.formatter
            .error(&format!("Invalid remote name '{}'", args.remote));
        return ExitCode::UsageError;
    }

    let profile = match ctx.profile(&args.remote) {
        Ok(p) => p,
        Err(code) => return code,
    };

    match ctx.client.exec(&profile, &args.args).await {
        Ok(()) => ExitCode::Success,
        Err(e) => ctx.fail(&e),
    }
}
