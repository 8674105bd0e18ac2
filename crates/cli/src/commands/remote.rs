//! Remote profile commands
//!
//! Profiles pair an rclone remote name with the credentials rcw passes to
//! rclone for it.

use clap::Subcommand;
use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};
use serde::Serialize;

use rcw_core::{Error, RemoteProfile, is_valid_remote_name};
use rcw_core::remote::DEFAULT_CONFIG_FILE;

use super::Context;
use crate::exit_code::ExitCode;

/// Remote subcommands
#[derive(Subcommand, Debug)]
pub enum RemoteCommands {
    /// Add or update a remote profile
    Set(SetArgs),

    /// List configured remote profiles
    List(ListArgs),

    /// Remove a remote profile
    Remove(RemoveArgs),
}

/// Arguments for the `remote set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Remote name as declared in the rclone config file (e.g., "wasabi")
    pub name: String,

    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// rclone config file passed with --config
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: String,
}

/// Arguments for the `remote list` command
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show credential variable names as well
    #[arg(short, long)]
    pub long: bool,
}

/// Arguments for the `remote remove` command
#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Name of the remote to remove
    pub name: String,
}

/// Remote information for JSON output (without secrets)
#[derive(Debug, Serialize)]
struct RemoteInfo {
    name: String,
    config_file: String,
    access_key_var: String,
    secret_key_var: String,
}

impl RemoteInfo {
    fn new(profile: &RemoteProfile, env_prefix: &str) -> Self {
        let (access_key_var, secret_key_var) = profile.env_var_names(env_prefix);
        Self {
            name: profile.name.clone(),
            config_file: profile.config_file.display().to_string(),
            access_key_var,
            secret_key_var,
        }
    }
}

#[derive(Serialize)]
struct RemoteListOutput {
    remotes: Vec<RemoteInfo>,
}

#[derive(Serialize)]
struct RemoteOperationOutput {
    success: bool,
    remote: String,
    message: String,
}

/// Execute a remote subcommand
pub fn execute(cmd: RemoteCommands, ctx: &Context) -> ExitCode {
    match cmd {
        RemoteCommands::Set(args) => execute_set(args, ctx),
        RemoteCommands::List(args) => execute_list(args, ctx),
        RemoteCommands::Remove(args) => execute_remove(args, ctx),
    }
}

fn execute_set(args: SetArgs, ctx: &Context) -> ExitCode {
    if !is_valid_remote_name(&args.name) {
        ctx.formatter.error(&format!(
            "Invalid remote name '{}': use letters, digits, '-' and '_'",
            args.name
        ));
        return ExitCode::UsageError;
    }

    let profile = RemoteProfile::new(&args.name, &args.access_key, &args.secret_key)
        .with_config_file(&args.config_file);

    match ctx.remotes.set(profile) {
        Ok(()) => {
            let message = format!("Remote '{}' configured successfully", args.name);
            if ctx.formatter.is_json() {
                ctx.formatter.json(&RemoteOperationOutput {
                    success: true,
                    remote: args.name,
                    message,
                });
            } else {
                ctx.formatter.success(&format!("{message}."));
            }
            ExitCode::Success
        }
        Err(e) => ctx.fail(&e),
    }
}

fn execute_list(args: ListArgs, ctx: &Context) -> ExitCode {
    let remotes = match ctx.remotes.list() {
        Ok(r) => r,
        Err(e) => return ctx.fail(&e),
    };

    if ctx.formatter.is_json() {
        ctx.formatter.json(&RemoteListOutput {
            remotes: remotes
                .iter()
                .map(|r| RemoteInfo::new(r, &ctx.env_prefix))
                .collect(),
        });
    } else if remotes.is_empty() {
        ctx.formatter.println("No remotes configured.");
    } else if args.long {
        ctx.formatter
            .println(&render_table(&remotes, &ctx.env_prefix));
    } else {
        for profile in &remotes {
            ctx.formatter.println(&format!(
                "{:<12} {}",
                profile.name,
                profile.config_file.display()
            ));
        }
    }
    ExitCode::Success
}

fn execute_remove(args: RemoveArgs, ctx: &Context) -> ExitCode {
    match ctx.remotes.remove(&args.name) {
        Ok(()) => {
            let message = format!("Remote '{}' removed successfully", args.name);
            if ctx.formatter.is_json() {
                ctx.formatter.json(&RemoteOperationOutput {
                    success: true,
                    remote: args.name,
                    message,
                });
            } else {
                ctx.formatter.success(&format!("{message}."));
            }
            ExitCode::Success
        }
        Err(Error::RemoteNotFound(_)) => {
            ctx.formatter
                .error(&format!("Remote '{}' not found", args.name));
            ExitCode::NotFound
        }
        Err(e) => ctx.fail(&e),
    }
}

fn render_table(remotes: &[RemoteProfile], env_prefix: &str) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(["Remote", "rclone config", "Access key variable", "Secret variable"]);
    for info in remotes.iter().map(|r| RemoteInfo::new(r, env_prefix)) {
        table.add_row([
            info.name,
            info.config_file,
            info.access_key_var,
            info.secret_key_var,
        ]);
    }
    table.to_string()
}
