#![deny(missing_docs)]
//! Shared logging utilities for the PetSight workspace.
//!
//! This crate provides the `pipeline_*` logging macros used across the
//! codebase, a per-thread "current upload" tag that the macros prefix onto
//! every record, and a minimal test initializer for the global logger.

use std::cell::Cell;

#[doc(hidden)]
pub use log;

thread_local! {
    /// Upload id of the pipeline run the current thread is working on (0 = none).
    static CURRENT_UPLOAD: Cell<u64> = const { Cell::new(0) };
}

/// Tags log records emitted on this thread with `upload_id`.
///
/// Pass 0 to clear the tag.
pub fn set_current_upload(upload_id: u64) {
    CURRENT_UPLOAD.with(|v| v.set(upload_id));
}

/// Returns the upload id log records on this thread are tagged with.
/// Returns 0 if no upload is active.
pub fn current_upload() -> u64 {
    CURRENT_UPLOAD.with(|v| v.get())
}

/// Formats the prefix the macros put in front of every message.
#[doc(hidden)]
pub fn upload_prefix() -> String {
    match current_upload() {
        0 => String::new(),
        id => format!("[upload #{id}] "),
    }
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! pipeline_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!("{}{}", $crate::upload_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! pipeline_info {
    ($($arg:tt)*) => {{
        $crate::log::info!("{}{}", $crate::upload_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! pipeline_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!("{}{}", $crate::upload_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! pipeline_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!("{}{}", $crate::upload_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! pipeline_error {
    ($($arg:tt)*) => {{
        $crate::log::error!("{}{}", $crate::upload_prefix(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::{current_upload, set_current_upload, upload_prefix};

    #[test]
    fn prefix_follows_current_upload() {
        assert_eq!(upload_prefix(), "");
        set_current_upload(7);
        assert_eq!(current_upload(), 7);
        assert_eq!(upload_prefix(), "[upload #7] ");
        set_current_upload(0);
        assert_eq!(upload_prefix(), "");
    }
}
