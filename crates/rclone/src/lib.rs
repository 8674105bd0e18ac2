//! rcw-rclone: rclone subprocess adapter for rcw
//!
//! This crate provides the implementation of the RemoteStore trait by
//! running the rclone executable as a child process. It is the only crate
//! that spawns processes.

pub mod client;
pub mod process;

pub use client::RcloneClient;
pub use process::ProcessRunner;
