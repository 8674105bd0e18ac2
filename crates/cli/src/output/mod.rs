//! Output formatting utilities
//!
//! Human-readable and JSON output, plus the spinner shown while rclone runs.

mod formatter;
mod progress;

pub use formatter::Formatter;
pub use rcw_core::config::ColorMode;
pub use progress::Spinner;

/// Output configuration derived from CLI flags
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Use JSON output format
    pub json: bool,
    /// When to color human-readable output
    pub color: ColorMode,
    /// Disable the spinner
    pub no_progress: bool,
    /// Suppress non-error output
    pub quiet: bool,
}
