//! exists command - Check whether an entry exists
//!
//! With a name, looks for an entry of exactly that name in the directory.
//! Without one, checks whether the path can be listed at all.

use clap::Args;
use rcw_core::{RemoteStore as _, parse_remote_path};
use serde::Serialize;

use super::Context;
use crate::exit_code::ExitCode;

/// Check whether an entry exists
#[derive(Args, Debug)]
pub struct ExistsArgs {
    /// Directory to look in (remote:bucket/prefix)
    pub dir: String,

    /// Entry name to look for in the directory
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExistsOutput {
    exists: bool,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

/// Execute the exists command
///
/// Exits with `Success` when found and `NotFound` otherwise.
pub async fn execute(args: ExistsArgs, ctx: &Context) -> ExitCode {
    let path = match parse_remote_path(&args.dir) {
        Ok(p) => p,
        Err(e) => return ctx.fail(&e),
    };

    let profile = match ctx.profile(&path.remote) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let target = args.dir.clone();
    let result = match &args.name {
        Some(name) => ctx.client.exists(&profile, &target, name).await,
        None => ctx.client.is_reachable(&profile, &target).await,
    };

    let exists = match result {
        Ok(exists) => exists,
        Err(e) => return ctx.fail(&e),
    };

    if ctx.formatter.is_json() {
        ctx.formatter.json(&ExistsOutput {
            exists,
            path: target,
            name: args.name,
        });
    } else {
        let subject = match &args.name {
            Some(name) => format!("'{name}' in '{target}'"),
            None => format!("'{target}'"),
        };
        if exists {
            ctx.formatter.println(&format!("{subject} exists"));
        } else {
            ctx.formatter.println(&format!("{subject} does not exist"));
        }
    }

    if exists {
        ExitCode::Success
    } else {
        ExitCode::NotFound
    }
}
