//! Subprocess plumbing shared by the probe and speedtest runners.

use std::io;
use std::process::{Command, Output};

/// Trait for running shell commands to completion.
///
/// The speedtest interpreter check goes through this seam so tests can
/// substitute a mock instead of depending on what the host has installed.
pub trait CommandRunner {
    /// Runs a command with the given arguments and waits for it to finish.
    fn run_command(&self, command: &str, args: &[&str]) -> Result<Output, io::Error>;
}

/// Struct for running real shell commands.
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run_command(&self, command: &str, args: &[&str]) -> Result<Output, io::Error> {
        Command::new(command).args(args).env("LC_ALL", "C").output()
    }
}

/// Checks if a command is installed on the system.
pub fn is_command_installed(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}
