//! Shotgun Connectivity Test Library
//!
//! Probes the Shotgun service end-points (load balancer IPs, CDNetworks
//! CNAMEs and S3 media buckets) with the platform ping and traceroute tools,
//! optionally runs the speedtest-cli bandwidth test, and collects everything
//! into a single report file mirrored live to the console.

pub mod command;
pub mod diagnostics;
pub mod endpoints;
pub mod error;
pub mod logger;
pub mod probe;
pub mod report;
pub mod speedtest;

// Re-export commonly used types and functions
pub use command::{is_command_installed, CommandRunner, RealCommandRunner};
pub use diagnostics::{run_tests, RunSelection, SelectionFlags};
pub use endpoints::Region;
pub use error::Error;
pub use probe::{ProbeCommand, ProbeRunner, StreamingRunner};
pub use report::{Report, REPORT_FILENAME};
