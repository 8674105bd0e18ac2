//! CLI command definitions and execution
//!
//! Each subcommand lives in its own module and runs against a shared
//! `Context` holding the formatter, the remote registry and the rclone client.

use clap::{Parser, Subcommand};
use rcw_core::{
    ConfigManager, Error, FailurePolicy, ParsedPath, RemoteManager, RemoteProfile, parse_path,
};
use rcw_rclone::RcloneClient;

use crate::exit_code::ExitCode;
use crate::output::{ColorMode, Formatter, OutputConfig};

mod completions;
mod cp;
mod exec;
mod exists;
mod ls;
mod mkdir;
mod mv;
mod remote;
mod rm;

/// rcw - a typed wrapper around rclone
///
/// Runs rclone operations against named remotes whose credentials are kept in
/// the rcw config and handed to rclone through environment variables.
#[derive(Parser, Debug)]
#[command(name = "rcw")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable the spinner
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    /// Treat any rclone stderr output as failure, even on exit status 0
    #[arg(long, global = true, default_value = "false")]
    pub strict_stderr: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage remote profiles
    #[command(subcommand)]
    Remote(remote::RemoteCommands),

    /// Create a directory
    Mkdir(mkdir::MkdirArgs),

    /// List files and directories
    Ls(ls::LsArgs),

    /// Copy files (local<->remote, remote<->remote)
    Cp(cp::CpArgs),

    /// Move files (local<->remote, remote<->remote)
    Mv(mv::MvArgs),

    /// Remove files
    Rm(rm::RmArgs),

    /// Check whether an entry exists
    Exists(exists::ExistsArgs),

    /// Run any rclone subcommand with a remote's credentials
    Exec(exec::ExecArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Shared state for command execution
pub struct Context {
    pub formatter: Formatter,
    pub env_prefix: String,
    pub remotes: RemoteManager,
    pub client: RcloneClient,
}

impl Context {
    /// Look up a remote profile, reporting a missing one
    pub fn profile(&self, name: &str) -> Result<RemoteProfile, ExitCode> {
        self.remotes.get(name).map_err(|e| {
            match &e {
                Error::RemoteNotFound(_) => self.formatter.error(&format!(
                    "Remote '{name}' not found. Add it with: rcw remote set {name} <access-key> <secret-key>"
                )),
                _ => self.formatter.error(&format!("Failed to load remotes: {e}")),
            }
            ExitCode::from_error(&e)
        })
    }

    /// Report an error and map it to an exit code
    pub fn fail(&self, err: &Error) -> ExitCode {
        self.formatter.error(&err.to_string());
        ExitCode::from_error(err)
    }
}

/// Source and target of a transfer, resolved to one remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub remote: String,
    pub source: String,
    pub target: String,
    pub target_is_local: bool,
}

/// Resolve the remote whose credentials a transfer runs with
///
/// At least one side must be remote, and both remote sides must name the
/// same remote. Both paths are passed on exactly as given.
pub fn resolve_transfer(source: &str, target: &str) -> rcw_core::Result<Transfer> {
    let src = parse_path(source)?;
    let dst = parse_path(target)?;

    let remote = match (&src, &dst) {
        (ParsedPath::Local(_), ParsedPath::Local(_)) => {
            return Err(Error::InvalidPath(
                "At least one of source and target must be a remote path (remote:bucket/key)"
                    .into(),
            ));
        }
        (ParsedPath::Remote(s), ParsedPath::Remote(d)) if s.remote != d.remote => {
            return Err(Error::UnsupportedFeature(format!(
                "Transfers between different remotes ('{}' and '{}') are not supported",
                s.remote, d.remote
            )));
        }
        (ParsedPath::Remote(r), _) | (_, ParsedPath::Remote(r)) => r.remote.clone(),
    };

    Ok(Transfer {
        remote,
        source: source.to_string(),
        target: target.to_string(),
        target_is_local: dst.is_local(),
    })
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let mut output_config = OutputConfig {
        json: cli.json,
        color: if cli.no_color {
            ColorMode::Never
        } else {
            ColorMode::Auto
        },
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    };

    let command = match cli.command {
        Commands::Completions(args) => return completions::execute(args),
        command => command,
    };

    let config_manager = match ConfigManager::new() {
        Ok(cm) => cm,
        Err(e) => {
            Formatter::new(output_config).error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let config = match config_manager.load() {
        Ok(c) => c,
        Err(e) => {
            Formatter::new(output_config).error(&format!("Failed to load config: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    tracing::debug!(
        path = %config_manager.config_path().display(),
        remotes = config.remotes.len(),
        "loaded config"
    );

    output_config.json |= config.defaults.output == "json";
    if !cli.no_color {
        output_config.color = config.defaults.color;
    }
    output_config.no_progress |= !config.defaults.progress;

    let policy = if cli.strict_stderr {
        FailurePolicy::Stderr
    } else {
        config.defaults.failure_policy
    };

    let env_prefix = config.defaults.env_prefix.clone();
    let client = RcloneClient::from_defaults(&config.defaults)
        .failure_policy(policy)
        .echo_stdout(!output_config.quiet && !output_config.json);

    let ctx = Context {
        formatter: Formatter::new(output_config),
        env_prefix,
        remotes: RemoteManager::with_config_manager(config_manager),
        client,
    };

    match command {
        Commands::Remote(cmd) => remote::execute(cmd, &ctx),
        Commands::Mkdir(args) => mkdir::execute(args, &ctx).await,
        Commands::Ls(args) => ls::execute(args, &ctx).await,
        Commands::Cp(args) => cp::execute(args, &ctx).await,
        Commands::Mv(args) => mv::execute(args, &ctx).await,
        Commands::Rm(args) => rm::execute(args, &ctx).await,
        Commands::Exists(args) => exists::execute(args, &ctx).await,
        Commands::Exec(args) => exec::execute(args, &ctx).await,
        Commands::Completions(args) => completions::execute(args),
    }
}
