//! rclone client implementation
//!
//! Builds one invocation per operation, runs it through a `Runner`, and
//! translates the captured output into results or `Error::CommandFailed`.

use std::io::Write as _;

use async_trait::async_trait;

use rcw_core::config::Defaults;
use rcw_core::remote::DEFAULT_ENV_PREFIX;
use rcw_core::{
    Error, FailurePolicy, Invocation, InvocationBuilder, ListEntry, Operation, ProcessOutput,
    RemoteProfile, RemoteStore, Result, Runner, contains_name, parse_listing,
};

use crate::process::ProcessRunner;

/// Default executable name, resolved through PATH
const DEFAULT_BINARY: &str = "rclone";

/// rclone client wrapper
pub struct RcloneClient<R = ProcessRunner> {
    runner: R,
    binary: String,
    env_prefix: String,
    policy: FailurePolicy,
    echo_stdout: bool,
}

impl RcloneClient<ProcessRunner> {
    /// Create a client that spawns `rclone` from PATH
    pub fn new() -> Self {
        Self::with_runner(ProcessRunner)
    }

    /// Create a client from configured defaults
    pub fn from_defaults(defaults: &Defaults) -> Self {
        Self::new()
            .binary(&defaults.binary)
            .env_prefix(&defaults.env_prefix)
            .failure_policy(defaults.failure_policy)
    }
}

impl Default for RcloneClient<ProcessRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Runner> RcloneClient<R> {
    /// Create a client backed by a custom runner
    pub fn with_runner(runner: R) -> Self {
        Self {
            runner,
            binary: DEFAULT_BINARY.to_string(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            policy: FailurePolicy::default(),
            echo_stdout: true,
        }
    }

    /// Use a different rclone executable
    pub fn binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Use a different credential environment prefix
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Select how failures are detected
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Whether mutating operations copy rclone's stdout to our stdout
    pub fn echo_stdout(mut self, echo: bool) -> Self {
        self.echo_stdout = echo;
        self
    }

    /// Start an invocation for the given profile and operation
    pub fn invocation<'a>(
        &self,
        profile: &'a RemoteProfile,
        operation: Operation,
    ) -> InvocationBuilder<'a> {
        InvocationBuilder::new(&self.binary, profile)
            .env_prefix(&self.env_prefix)
            .operation(operation)
    }

    /// Run an invocation and apply the failure policy
    async fn execute(&self, invocation: Invocation) -> Result<ProcessOutput> {
        let output = self.runner.run(&invocation).await?;

        if output.failed(self.policy) {
            tracing::debug!(
                operation = %invocation.operation,
                code = ?output.code,
                "rclone reported failure"
            );
            return Err(Error::CommandFailed {
                operation: invocation.operation,
                stderr: output.stderr,
                code: output.code,
            });
        }

        if !output.stderr.is_empty() {
            tracing::warn!(
                operation = %invocation.operation,
                stderr = %output.stderr.trim_end(),
                "rclone wrote to stderr"
            );
        }

        Ok(output)
    }

    async fn run_listing(
        &self,
        profile: &RemoteProfile,
        operation: Operation,
        path: &str,
    ) -> Result<Option<Vec<ListEntry>>> {
        let invocation = self.invocation(profile, operation).arg(path).build();
        let output = self.execute(invocation).await?;
        parse_listing(&output.stdout)
    }

    async fn run_mutation(&self, invocation: Invocation) -> Result<()> {
        let output = self.execute(invocation).await?;
        if !output.stdout.is_empty() {
            tracing::debug!(stdout = %output.stdout.trim_end(), "rclone output");
            if self.echo_stdout {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(output.stdout.as_bytes())?;
            }
        }
        Ok(())
    }

    async fn transfer(
        &self,
        profile: &RemoteProfile,
        operation: Operation,
        source: &str,
        target: &str,
        public: bool,
    ) -> Result<()> {
        let invocation = self
            .invocation(profile, operation)
            .args([source, target])
            .public(public)
            .build();
        self.run_mutation(invocation).await
    }
}

#[async_trait]
impl<R: Runner> RemoteStore for RcloneClient<R> {
    async fn mkdir(&self, profile: &RemoteProfile, path: &str) -> Result<()> {
        let invocation = self.invocation(profile, Operation::Mkdir).arg(path).build();
        self.run_mutation(invocation).await
    }

    async fn list(&self, profile: &RemoteProfile, path: &str) -> Result<Option<Vec<ListEntry>>> {
        self.run_listing(profile, Operation::List, path).await
    }

    async fn list_dirs(
        &self,
        profile: &RemoteProfile,
        path: &str,
    ) -> Result<Option<Vec<ListEntry>>> {
        self.run_listing(profile, Operation::ListDirs, path).await
    }

    async fn list_files(
        &self,
        profile: &RemoteProfile,
        path: &str,
    ) -> Result<Option<Vec<ListEntry>>> {
        self.run_listing(profile, Operation::ListFiles, path).await
    }

    async fn copy(
        &self,
        profile: &RemoteProfile,
        source: &str,
        target: &str,
        public: bool,
    ) -> Result<()> {
        self.transfer(profile, Operation::Copy, source, target, public)
            .await
    }

    async fn move_to(
        &self,
        profile: &RemoteProfile,
        source: &str,
        target: &str,
        public: bool,
    ) -> Result<()> {
        self.transfer(profile, Operation::MoveTo, source, target, public)
            .await
    }

    async fn move_into(
        &self,
        profile: &RemoteProfile,
        source: &str,
        target: &str,
        public: bool,
    ) -> Result<()> {
        self.transfer(profile, Operation::Move, source, target, public)
            .await
    }

    async fn delete(&self, profile: &RemoteProfile, path: &str) -> Result<()> {
        let invocation = self.invocation(profile, Operation::Delete).arg(path).build();
        self.run_mutation(invocation).await
    }

    async fn delete_tree(&self, profile: &RemoteProfile, path: &str) -> Result<()> {
        let invocation = self
            .invocation(profile, Operation::DeleteTree)
            .arg(path)
            .build();
        self.run_mutation(invocation).await
    }

    async fn exists(&self, profile: &RemoteProfile, dir: &str, name: &str) -> Result<bool> {
        match self.list(profile, dir).await? {
            Some(entries) => Ok(contains_name(&entries, name)),
            None => Ok(false),
        }
    }

    async fn is_reachable(&self, profile: &RemoteProfile, path: &str) -> Result<bool> {
        match self.list(profile, path).await {
            Ok(_) => Ok(true),
            Err(Error::CommandFailed { stderr, .. }) => {
                tracing::debug!(path, stderr = %stderr.trim_end(), "listing failed, treating as absent");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn exec(&self, profile: &RemoteProfile, args: &[String]) -> Result<()> {
        let invocation = self
            .invocation(profile, Operation::Exec)
            .args(args.iter().cloned())
            .build();
        self.run_mutation(invocation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mockall::mock! {
        pub Process {}

        #[async_trait]
        impl Runner for Process {
            async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput>;
        }
    }

    fn profile() -> RemoteProfile {
        RemoteProfile::new("Wasabi", "AKID", "SECRET").with_config_file("/etc/rclone.conf")
    }

    fn output(code: i32, stdout: &str, stderr: &str) -> ProcessOutput {
        ProcessOutput {
            code: Some(code),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }

    fn client_returning(out: ProcessOutput) -> RcloneClient<MockProcess> {
        let mut runner = MockProcess::new();
        runner
            .expect_run()
            .times(1)
            .returning(move |_| Ok(out.clone()));
        RcloneClient::with_runner(runner).echo_stdout(false)
    }

    fn client_expecting(
        args: &'static [&'static str],
        out: ProcessOutput,
    ) -> RcloneClient<MockProcess> {
        let mut runner = MockProcess::new();
        runner
            .expect_run()
            .withf(move |inv: &Invocation| {
                inv.program == "rclone" && inv.args.iter().map(String::as_str).eq(args.iter().copied())
            })
            .times(1)
            .returning(move |_| Ok(out.clone()));
        RcloneClient::with_runner(runner).echo_stdout(false)
    }

    #[tokio::test]
    async fn test_mkdir_invocation() {
        let client = client_expecting(
            &["--config", "/etc/rclone.conf", "mkdir", "wasabi:bucket/new"],
            output(0, "", ""),
        );
        client.mkdir(&profile(), "wasabi:bucket/new").await.unwrap();
    }

    #[tokio::test]
    async fn test_invocation_carries_credentials() {
        let mut runner = MockProcess::new();
        runner
            .expect_run()
            .withf(|inv: &Invocation| {
                inv.envs.len() == 2
                    && inv.envs.get("RCLONE_CONFIG_WASABI_ACCESS_KEY_ID").map(String::as_str)
                        == Some("AKID")
                    && inv
                        .envs
                        .get("RCLONE_CONFIG_WASABI_SECRET_ACCESS_KEY")
                        .map(String::as_str)
                        == Some("SECRET")
            })
            .times(1)
            .returning(|_| Ok(output(0, "[]", "")));
        let client = RcloneClient::with_runner(runner);
        client.list(&profile(), "wasabi:bucket").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_decodes_entries() {
        let stdout = serde_json::json!([
            {"Path": "a.txt", "Name": "a.txt", "Size": 3, "IsDir": false},
            {"Path": "b", "Name": "b", "Size": -1, "IsDir": true},
            {"Path": "c.txt", "Name": "c.txt", "Size": 9, "IsDir": false}
        ])
        .to_string();
        let client = client_expecting(
            &["--config", "/etc/rclone.conf", "lsjson", "wasabi:bucket"],
            output(0, &stdout, ""),
        );

        let entries = client.list(&profile(), "wasabi:bucket").await.unwrap().unwrap();
        let names: Vec<_> = entries.iter().filter_map(ListEntry::name).collect();
        assert_eq!(names, ["a.txt", "b", "c.txt"]);
        assert!(entries[1].is_dir());
    }

    #[tokio::test]
    async fn test_list_dirs_and_files_flags() {
        let client = client_expecting(
            &["--config", "/etc/rclone.conf", "lsjson", "--dirs-only", "wasabi:bucket"],
            output(0, "[]", ""),
        );
        let dirs = client.list_dirs(&profile(), "wasabi:bucket").await.unwrap();
        assert_eq!(dirs, Some(vec![]));

        let client = client_expecting(
            &["--config", "/etc/rclone.conf", "lsjson", "--files-only", "wasabi:bucket"],
            output(0, "[]", ""),
        );
        client.list_files(&profile(), "wasabi:bucket").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_empty_stdout_is_none() {
        let client = client_returning(output(0, "", ""));
        assert!(client.list(&profile(), "wasabi:bucket").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_invalid_json_is_error() {
        let client = client_returning(output(0, "{not json", ""));
        let err = client.list(&profile(), "wasabi:bucket").await.unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[tokio::test]
    async fn test_failure_carries_stderr_verbatim() {
        let stderr = "2024/01/01 ERROR : directory not found\n";
        let client = client_returning(output(3, "", stderr));

        let err = client.list(&profile(), "wasabi:missing").await.unwrap_err();
        assert_eq!(err.stderr(), Some(stderr));
        assert!(err.to_string().starts_with("Could not list files: "));
        assert!(err.to_string().contains(stderr));
        assert!(matches!(err, Error::CommandFailed { code: Some(3), .. }));
    }

    #[tokio::test]
    async fn test_failure_prefix_per_operation() {
        let client = client_returning(output(1, "", "boom"));
        let err = client.delete_tree(&profile(), "wasabi:b/p").await.unwrap_err();
        assert_eq!(err.to_string(), "Could not remove files: boom");

        let client = client_returning(output(1, "", "boom"));
        let err = client
            .move_into(&profile(), "./a", "wasabi:b/p", false)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Could not move files: boom");

        let client = client_returning(output(1, "", "boom"));
        let err = client.mkdir(&profile(), "wasabi:b/p").await.unwrap_err();
        assert_eq!(err.to_string(), "Could not create the directory: boom");
    }

    #[tokio::test]
    async fn test_stderr_on_success_is_diagnostic_by_default() {
        let client = client_returning(output(0, "[]", "NOTICE: config file not found"));
        let entries = client.list(&profile(), "wasabi:bucket").await.unwrap();
        assert_eq!(entries, Some(vec![]));
    }

    #[tokio::test]
    async fn test_strict_stderr_policy_fails_on_any_stderr() {
        let client = client_returning(output(0, "[]", "NOTICE: config file not found"))
            .failure_policy(FailurePolicy::Stderr);
        let err = client.list(&profile(), "wasabi:bucket").await.unwrap_err();
        assert!(err.to_string().contains("NOTICE: config file not found"));
    }

    #[tokio::test]
    async fn test_stderr_policy_accepts_silent_non_zero_exit() {
        let client = client_returning(output(1, "", "")).failure_policy(FailurePolicy::Stderr);
        assert_eq!(client.list(&profile(), "wasabi:bucket").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_copy_public_appends_acl() {
        let client = client_expecting(
            &[
                "--config",
                "/etc/rclone.conf",
                "copy",
                "./site",
                "wasabi:www",
                "--s3-acl",
                "public-read",
            ],
            output(0, "", ""),
        );
        client
            .copy(&profile(), "./site", "wasabi:www", true)
            .await
            .unwrap();

        let client = client_expecting(
            &["--config", "/etc/rclone.conf", "copy", "./site", "wasabi:www"],
            output(0, "", ""),
        );
        client
            .copy(&profile(), "./site", "wasabi:www", false)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_move_variants() {
        let client = client_expecting(
            &["--config", "/etc/rclone.conf", "moveto", "wasabi:a/x", "wasabi:a/y"],
            output(0, "", ""),
        );
        client
            .move_to(&profile(), "wasabi:a/x", "wasabi:a/y", false)
            .await
            .unwrap();

        let client = client_expecting(
            &["--config", "/etc/rclone.conf", "move", "wasabi:a/x", "wasabi:a/y"],
            output(0, "", ""),
        );
        client
            .move_into(&profile(), "wasabi:a/x", "wasabi:a/y", false)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_variants() {
        let client = client_expecting(
            &["--config", "/etc/rclone.conf", "delete", "wasabi:a/old"],
            output(0, "", ""),
        );
        client.delete(&profile(), "wasabi:a/old").await.unwrap();

        let client = client_expecting(
            &["--config", "/etc/rclone.conf", "delete", "--rmdirs", "wasabi:a/old"],
            output(0, "", ""),
        );
        client.delete_tree(&profile(), "wasabi:a/old").await.unwrap();
    }

    #[tokio::test]
    async fn test_paths_with_spaces_stay_whole() {
        let client = client_expecting(
            &[
                "--config",
                "/etc/rclone.conf",
                "copy",
                "./Q1 report.pdf",
                "wasabi:bucket/finance reports",
            ],
            output(0, "", ""),
        );
        client
            .copy(&profile(), "./Q1 report.pdf", "wasabi:bucket/finance reports", false)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_exists_matches_name_exactly() {
        let stdout = r#"[{"Name":"report.json","IsDir":false},{"Name":"report.json.bak","IsDir":false}]"#;

        let client = client_returning(output(0, stdout, ""));
        assert!(client
            .exists(&profile(), "wasabi:bucket/out", "report.json")
            .await
            .unwrap());

        let client = client_returning(output(0, stdout, ""));
        assert!(!client
            .exists(&profile(), "wasabi:bucket/out", "report")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_exists_on_empty_listing() {
        let client = client_returning(output(0, "", ""));
        assert!(!client
            .exists(&profile(), "wasabi:bucket/out", "report.json")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_exists_propagates_failure() {
        let client = client_returning(output(3, "", "directory not found"));
        assert!(client
            .exists(&profile(), "wasabi:nope", "report.json")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_is_reachable() {
        let client = client_returning(output(0, "", ""));
        assert!(client.is_reachable(&profile(), "wasabi:bucket").await.unwrap());

        let client = client_returning(output(3, "", "directory not found"));
        assert!(!client.is_reachable(&profile(), "wasabi:nope").await.unwrap());
    }

    #[tokio::test]
    async fn test_is_reachable_propagates_spawn_errors() {
        let mut runner = MockProcess::new();
        runner
            .expect_run()
            .returning(|inv| Err(Error::ToolNotFound(inv.program.clone())));
        let client = RcloneClient::with_runner(runner);

        let err = client.is_reachable(&profile(), "wasabi:").await.unwrap_err();
        assert!(matches!(err, Error::ToolNotFound(_)));
    }

    #[tokio::test]
    async fn test_exec_passes_args_through() {
        let client = client_expecting(
            &["--config", "/etc/rclone.conf", "size", "--json", "wasabi:bucket"],
            output(0, "{\"count\":1}", ""),
        );
        let args = vec!["size".to_string(), "--json".into(), "wasabi:bucket".into()];
        client.exec(&profile(), &args).await.unwrap();
    }

    #[tokio::test]
    async fn test_custom_binary_and_prefix() {
        let mut runner = MockProcess::new();
        runner
            .expect_run()
            .withf(|inv: &Invocation| {
                inv.program == "/opt/rclone"
                    && inv.envs.contains_key("ACME_CONFIG_WASABI_ACCESS_KEY_ID")
            })
            .times(1)
            .returning(|_| Ok(output(0, "", "")));

        let client = RcloneClient::with_runner(runner)
            .binary("/opt/rclone")
            .env_prefix("ACME");
        client.mkdir(&profile(), "wasabi:b").await.unwrap();
    }
}
