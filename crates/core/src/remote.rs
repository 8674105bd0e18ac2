//! Remote profile management
//!
//! A remote profile names an rclone remote together with the credentials
//! rclone should use for it. Credentials never go into rclone's own config
//! file: they are handed to each child process through environment variables.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::ConfigManager;
use crate::error::{Error, Result};

/// Default environment variable prefix understood by rclone
pub const DEFAULT_ENV_PREFIX: &str = "RCLONE";

/// Default rclone configuration file passed via `--config`
pub const DEFAULT_CONFIG_FILE: &str = "rclone.conf";

/// A named rclone remote and the credentials used to reach it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteProfile {
    /// Remote name as declared in the rclone config file
    pub name: String,

    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// Path to the rclone configuration file
    #[serde(default = "default_config_file")]
    pub config_file: PathBuf,
}

fn default_config_file() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

impl RemoteProfile {
    /// Create a new profile using the default rclone config file
    pub fn new(
        name: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            config_file: default_config_file(),
        }
    }

    /// Use a specific rclone config file
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = path.into();
        self
    }

    /// Names of the two credential variables for this remote
    ///
    /// The remote name is upper-cased regardless of how it was written.
    pub fn env_var_names(&self, prefix: &str) -> (String, String) {
        let remote = self.name.to_uppercase();
        (
            format!("{prefix}_CONFIG_{remote}_ACCESS_KEY_ID"),
            format!("{prefix}_CONFIG_{remote}_SECRET_ACCESS_KEY"),
        )
    }

    /// Environment overlay carrying this profile's credentials
    ///
    /// Always exactly two entries. Values are passed through verbatim, even
    /// when empty.
    pub fn env_overlay(&self, prefix: &str) -> BTreeMap<String, String> {
        let (key_id, secret) = self.env_var_names(prefix);
        BTreeMap::from([
            (key_id, self.access_key.clone()),
            (secret, self.secret_key.clone()),
        ])
    }
}

/// Manager for remote profiles stored in the rcw config file
pub struct RemoteManager {
    config_manager: ConfigManager,
}

impl RemoteManager {
    /// Create a new RemoteManager with a specific ConfigManager
    pub fn with_config_manager(config_manager: ConfigManager) -> Self {
        Self { config_manager }
    }

    /// List all configured remotes
    pub fn list(&self) -> Result<Vec<RemoteProfile>> {
        let config = self.config_manager.load()?;
        Ok(config.remotes)
    }

    /// Get a remote by name
    pub fn get(&self, name: &str) -> Result<RemoteProfile> {
        let config = self.config_manager.load()?;
        config
            .remotes
            .into_iter()
            .find(|r| r.name == name)
            .ok_or_else(|| Error::RemoteNotFound(name.to_string()))
    }

    /// Add or replace a remote
    pub fn set(&self, remote: RemoteProfile) -> Result<()> {
        let mut config = self.config_manager.load()?;

        config.remotes.retain(|r| r.name != remote.name);
        config.remotes.push(remote);

        self.config_manager.save(&config)
    }

    /// Remove a remote
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut config = self.config_manager.load()?;
        let original_len = config.remotes.len();

        config.remotes.retain(|r| r.name != name);

        if config.remotes.len() == original_len {
            return Err(Error::RemoteNotFound(name.to_string()));
        }

        self.config_manager.save(&config)
    }

    /// Check if a remote exists
    pub fn exists(&self, name: &str) -> Result<bool> {
        let config = self.config_manager.load()?;
        Ok(config.remotes.iter().any(|r| r.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_remote_manager() -> (RemoteManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_manager = ConfigManager::with_path(config_path);
        let remote_manager = RemoteManager::with_config_manager(config_manager);
        (remote_manager, temp_dir)
    }

    #[test]
    fn test_profile_new() {
        let profile = RemoteProfile::new("wasabi", "id", "secret");
        assert_eq!(profile.name, "wasabi");
        assert_eq!(profile.config_file, PathBuf::from("rclone.conf"));

        let profile = profile.with_config_file("/etc/rclone/rclone.conf");
        assert_eq!(
            profile.config_file,
            PathBuf::from("/etc/rclone/rclone.conf")
        );
    }

    #[test]
    fn test_env_overlay_upper_cases_remote() {
        for name in ["wasabi", "Wasabi", "WASABI", "waSAbi"] {
            let overlay = RemoteProfile::new(name, "id", "secret").env_overlay("RCLONE");
            assert_eq!(overlay.len(), 2);
            assert_eq!(
                overlay.get("RCLONE_CONFIG_WASABI_ACCESS_KEY_ID"),
                Some(&"id".to_string())
            );
            assert_eq!(
                overlay.get("RCLONE_CONFIG_WASABI_SECRET_ACCESS_KEY"),
                Some(&"secret".to_string())
            );
        }
    }

    #[test]
    fn test_env_overlay_passes_empty_credentials() {
        let overlay = RemoteProfile::new("s3", "", "").env_overlay(DEFAULT_ENV_PREFIX);
        assert_eq!(overlay.len(), 2);
        assert!(overlay.values().all(String::is_empty));
    }

    #[test]
    fn test_env_overlay_custom_prefix() {
        let (id, secret) = RemoteProfile::new("b2", "a", "b").env_var_names("RCW");
        assert_eq!(id, "RCW_CONFIG_B2_ACCESS_KEY_ID");
        assert_eq!(secret, "RCW_CONFIG_B2_SECRET_ACCESS_KEY");
    }

    #[test]
    fn test_remote_manager_set_and_get() {
        let (manager, _temp_dir) = temp_remote_manager();

        manager
            .set(RemoteProfile::new("wasabi", "id", "secret"))
            .unwrap();

        let retrieved = manager.get("wasabi").unwrap();
        assert_eq!(retrieved.access_key, "id");
        assert_eq!(retrieved.config_file, PathBuf::from("rclone.conf"));
    }

    #[test]
    fn test_remote_manager_list_and_replace() {
        let (manager, _temp_dir) = temp_remote_manager();

        manager.set(RemoteProfile::new("a", "1", "1")).unwrap();
        manager.set(RemoteProfile::new("b", "2", "2")).unwrap();
        manager.set(RemoteProfile::new("a", "3", "3")).unwrap();

        let remotes = manager.list().unwrap();
        assert_eq!(remotes.len(), 2);
        assert_eq!(manager.get("a").unwrap().access_key, "3");
    }

    #[test]
    fn test_remote_manager_remove() {
        let (manager, _temp_dir) = temp_remote_manager();

        manager.set(RemoteProfile::new("gone", "a", "b")).unwrap();
        assert!(manager.exists("gone").unwrap());

        manager.remove("gone").unwrap();
        assert!(!manager.exists("gone").unwrap());
    }

    #[test]
    fn test_remote_manager_not_found() {
        let (manager, _temp_dir) = temp_remote_manager();

        assert!(matches!(
            manager.get("nonexistent").unwrap_err(),
            Error::RemoteNotFound(_)
        ));
        assert!(matches!(
            manager.remove("nonexistent").unwrap_err(),
            Error::RemoteNotFound(_)
        ));
    }
}
