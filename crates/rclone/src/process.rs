//! Child process runner
//!
//! Spawns rclone with tokio, overlaying the invocation's variables on a copy
//! of the inherited environment, and waits for it to exit.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use rcw_core::{Error, Invocation, ProcessOutput, Result, Runner};

/// Runs invocations as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl Runner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput> {
        tracing::debug!(
            command = %invocation,
            env = ?invocation.envs.keys().collect::<Vec<_>>(),
            "spawning rclone"
        );

        // The parent environment is never modified; `envs` applies to the child only.
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(&invocation.envs)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => Error::ToolNotFound(invocation.program.clone()),
                _ => Error::Io(e),
            })?;

        let result = ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        tracing::debug!(
            operation = %invocation.operation,
            code = ?result.code,
            stdout_bytes = result.stdout.len(),
            stderr_bytes = result.stderr.len(),
            "rclone exited"
        );

        Ok(result)
    }
}
