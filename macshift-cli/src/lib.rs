//! CLI interface for macshift
//!
//! This crate provides the command-line surface of macshift: argument
//! parsing, terminal formatting and the sequencing of gateway calls.

pub mod app;
pub mod args;
pub mod console;

pub use app::{report_error, run};
pub use args::Cli;
pub use console::{banner, format_status, Console, Status};

/// Exit code for validation, command and verification failures
pub const EXIT_FAILURE: u8 = 1;

/// Exit code used when the user interrupts with Ctrl-C
pub const INTERRUPT_EXIT_CODE: i32 = 0;

/// Exit code for an argument parsing outcome.
///
/// Help and version requests are not failures; every usage error exits with
/// [`EXIT_FAILURE`] instead of clap's default of 2.
pub fn parse_error_exit_code(error: &clap::Error) -> u8 {
    if error.use_stderr() {
        EXIT_FAILURE
    } else {
        0
    }
}
