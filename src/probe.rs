//! Live-streaming probe runner.
//!
//! A probe is one invocation of the platform ping or traceroute tool against
//! one address. The runner merges the child's stdout and stderr and forwards
//! each line into the report as soon as it arrives, so long traceroutes show
//! progress instead of a silent pause followed by a wall of text.

use std::io;
use std::process::Stdio;

use async_trait::async_trait;
use log::debug;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::error::Error;
use crate::report::Report;

/// Well-known public resolver pinged for the latency baseline.
pub const BASELINE_RESOLVER: &str = "8.8.8.8";

/// One external command invocation, ready to be streamed into the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeCommand {
    pub program: &'static str,
    pub args: Vec<String>,
}

impl ProbeCommand {
    fn new(program: &'static str, args: &[&str]) -> Self {
        Self {
            program,
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Platform ping with a fixed 10-packet count against one endpoint.
#[cfg(windows)]
pub fn ping(endpoint: &str) -> ProbeCommand {
    ProbeCommand::new("ping", &["-n", "10", endpoint])
}

/// Platform ping with a fixed 10-packet count against one endpoint.
#[cfg(not(windows))]
pub fn ping(endpoint: &str) -> ProbeCommand {
    ProbeCommand::new("ping", &["-c", "10", endpoint])
}

/// Platform traceroute: 15 hops maximum, 3 second per-hop wait.
#[cfg(windows)]
pub fn traceroute(endpoint: &str) -> ProbeCommand {
    // tracert has no -q equivalent; -h is the hop limit.
    ProbeCommand::new("tracert", &["-w", "3", "-h", "15", endpoint])
}

/// Platform traceroute: 15 hops maximum, 3 second per-hop wait, one query
/// per hop.
#[cfg(not(windows))]
pub fn traceroute(endpoint: &str) -> ProbeCommand {
    ProbeCommand::new("traceroute", &["-w", "3", "-q", "1", "-m", "15", endpoint])
}

/// Short 5-packet ping against a public resolver, as a latency baseline
/// independent of the Shotgun endpoints.
#[cfg(windows)]
pub fn ping_benchmark() -> ProbeCommand {
    ProbeCommand::new("ping", &["-n", "5", BASELINE_RESOLVER])
}

/// Short 5-packet ping against a public resolver, as a latency baseline
/// independent of the Shotgun endpoints.
#[cfg(not(windows))]
pub fn ping_benchmark() -> ProbeCommand {
    ProbeCommand::new("ping", &["-c", "5", BASELINE_RESOLVER])
}

/// Trait for streaming one probe's output into the report.
///
/// The seam exists so the group testers and the speedtest step can be
/// exercised in tests without spawning real ping/traceroute processes.
#[async_trait]
pub trait ProbeRunner {
    /// Runs `command`, forwarding its merged stdout/stderr line by line into
    /// `report`, and returns once both streams are exhausted.
    async fn run(&self, report: &mut Report, command: &ProbeCommand) -> Result<(), Error>;
}

/// Probe runner that spawns the real platform tools.
pub struct StreamingRunner;

#[async_trait]
impl ProbeRunner for StreamingRunner {
    async fn run(&self, report: &mut Report, command: &ProbeCommand) -> Result<(), Error> {
        debug!("Running probe: {} {}", command.program, command.args.join(" "));

        let mut child = Command::new(command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::ProbeLaunch {
                tool: command.program.to_string(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::LocalIo(io::Error::other("child stdout not captured")))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::LocalIo(io::Error::other("child stderr not captured")))?;

        let mut out_lines = BufReader::new(stdout).lines();
        let mut err_lines = BufReader::new(stderr).lines();
        let mut out_done = false;
        let mut err_done = false;

        // Both streams drain into the report in arrival order, which is the
        // merged view an operator would see in a terminal.
        while !(out_done && err_done) {
            tokio::select! {
                line = out_lines.next_line(), if !out_done => match line? {
                    Some(line) => report.line(line.trim_end_matches('\r'))?,
                    None => out_done = true,
                },
                line = err_lines.next_line(), if !err_done => match line? {
                    Some(line) => report.line(line.trim_end_matches('\r'))?,
                    None => err_done = true,
                },
            }
        }

        // The exit code is intentionally not inspected: an unreachable host
        // is a report finding, not a program error.
        let _ = child.wait().await;
        Ok(())
    }
}
