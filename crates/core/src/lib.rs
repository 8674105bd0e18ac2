//! rcw-core: Core library for the rcw rclone wrapper
//!
//! This crate provides the core functionality for rcw, including:
//! - Configuration and remote profile management
//! - rclone command construction
//! - Remote path parsing
//! - Listing records
//! - Runner and RemoteStore traits
//!
//! It never spawns processes itself, so everything here can be tested
//! without an rclone binary.

pub mod command;
pub mod config;
pub mod error;
pub mod listing;
pub mod path;
pub mod remote;
pub mod traits;

pub use command::{Invocation, InvocationBuilder, Operation};
pub use config::{Config, ConfigManager};
pub use error::{Error, Result};
pub use listing::{ListEntry, contains_name, parse_listing};
pub use path::{ParsedPath, RemotePath, is_valid_remote_name, parse_path, parse_remote_path};
pub use remote::{RemoteManager, RemoteProfile};
pub use traits::{FailurePolicy, ProcessOutput, RemoteStore, Runner};
