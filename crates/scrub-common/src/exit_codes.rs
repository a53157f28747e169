//! Exit codes for the scrub CLI.
//!
//! Exit codes communicate run outcome without requiring output parsing,
//! so automated callers can alarm appropriately. Ranges:
//! - 0-9: Success/operational outcomes
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors (bugs, should be reported)

/// Exit codes for scrub operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Fully succeeded: every document read was written.
    Clean = 0,

    /// Succeeded with N skipped: some documents failed and were skipped.
    PartialFail = 3,

    /// Invalid command-line arguments.
    ArgsError = 10,

    /// Configuration file missing or invalid.
    ConfigError = 11,

    /// A component or resource failed to initialize before the first document.
    InitError = 12,

    /// The run aborted fatally after starting.
    FatalError = 20,
}

impl ExitCode {
    /// Numeric exit code value.
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.code() as u8)
    }
}
