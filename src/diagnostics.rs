//! Endpoint group testers and the fixed-order orchestrator.
//!
//! Each tester walks its address list in declaration order; for every address
//! it writes a section header, pings it and, outside short mode, traces the
//! route to it. There is no parallelism, no retry and no early abort: a probe
//! that cannot even be launched is reported inline and the walk continues, so
//! the report covers as much of the endpoint set as possible.

use log::debug;

use crate::command::CommandRunner;
use crate::endpoints::{s3_accelerated_buckets, s3_buckets, Region, CDN_CNAMES, LOAD_BALANCERS};
use crate::error::Error;
use crate::probe::{ping, ping_benchmark, traceroute, ProbeCommand, ProbeRunner, BASELINE_RESOLVER};
use crate::report::Report;
use crate::speedtest;

/// Raw category flags as parsed from the command line.
#[derive(Debug, Default, Clone, Copy)]
pub struct SelectionFlags {
    pub short: bool,
    pub all: bool,
    pub cdn: bool,
    pub lb: bool,
    pub s3: bool,
    pub s3a: bool,
    pub speedtest: bool,
}

/// Which test categories actually run, derived once from the flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSelection {
    pub lb: bool,
    pub cdn: bool,
    pub s3: bool,
    pub s3a: bool,
    pub speedtest: bool,
    pub skip_traceroute: bool,
}

impl RunSelection {
    /// Expands the convenience flags.
    ///
    /// `--all`, or the absence of any individual category flag, enables every
    /// category; `--short` on its own therefore also enables everything and
    /// only switches the traceroute sub-probes off.
    pub fn from_flags(flags: SelectionFlags) -> Self {
        let any_category = flags.lb || flags.cdn || flags.s3 || flags.s3a || flags.speedtest;
        let run_all = flags.all || !any_category;
        Self {
            lb: run_all || flags.lb,
            cdn: run_all || flags.cdn,
            s3: run_all || flags.s3,
            s3a: run_all || flags.s3a,
            speedtest: run_all || flags.speedtest,
            skip_traceroute: flags.short,
        }
    }
}

/// Runs one probe, downgrading a launch failure to an inline report line so
/// the remaining probes still run.
async fn run_probe(
    report: &mut Report,
    runner: &dyn ProbeRunner,
    command: &ProbeCommand,
) -> Result<(), Error> {
    match runner.run(report, command).await {
        Err(e) if e.is_probe_launch() => {
            report.line(&format!("ERROR: {e}"))?;
            Ok(())
        }
        other => other,
    }
}

/// Probes one endpoint: ping, then traceroute unless `skip_traceroute`.
async fn test_endpoint(
    report: &mut Report,
    runner: &dyn ProbeRunner,
    endpoint: &str,
    skip_traceroute: bool,
) -> Result<(), Error> {
    run_probe(report, runner, &ping(endpoint)).await?;
    if !skip_traceroute {
        run_probe(report, runner, &traceroute(endpoint)).await?;
    }
    Ok(())
}

/// Tests connectivity to the Shotgun load balancers.
pub async fn test_load_balancers(
    report: &mut Report,
    runner: &dyn ProbeRunner,
    skip_traceroute: bool,
) -> Result<(), Error> {
    for ip in LOAD_BALANCERS {
        report.header(&format!(
            "Testing connectivity to Shotgun Load Balancer at {ip}"
        ))?;
        test_endpoint(report, runner, ip, skip_traceroute).await?;
    }
    Ok(())
}

/// Tests connectivity to Shotgun through the CDNetworks CNAMEs.
pub async fn test_cdnetworks(
    report: &mut Report,
    runner: &dyn ProbeRunner,
    skip_traceroute: bool,
) -> Result<(), Error> {
    for cname in CDN_CNAMES {
        report.header(&format!(
            "Testing connectivity to Shotgun through CDNetworks: {cname}"
        ))?;
        test_endpoint(report, runner, cname, skip_traceroute).await?;
    }
    Ok(())
}

/// Tests connectivity to the Shotgun S3 media buckets.
pub async fn test_s3(
    report: &mut Report,
    runner: &dyn ProbeRunner,
    region: Option<Region>,
    skip_traceroute: bool,
) -> Result<(), Error> {
    for addr in s3_buckets(region) {
        report.header(&format!(
            "Testing connectivity to Shotgun S3 Bucket: {addr}"
        ))?;
        test_endpoint(report, runner, addr, skip_traceroute).await?;
    }
    Ok(())
}

/// Tests connectivity to the Shotgun S3 accelerated-transfer buckets.
pub async fn test_s3_accelerated(
    report: &mut Report,
    runner: &dyn ProbeRunner,
    region: Option<Region>,
    skip_traceroute: bool,
) -> Result<(), Error> {
    for addr in s3_accelerated_buckets(region) {
        report.header(&format!(
            "Testing connectivity to Shotgun S3 Bucket: {addr}"
        ))?;
        test_endpoint(report, runner, addr, skip_traceroute).await?;
    }
    Ok(())
}

/// Optional latency baseline against a public resolver, independent of the
/// Shotgun endpoints.
pub async fn run_baseline(report: &mut Report, runner: &dyn ProbeRunner) -> Result<(), Error> {
    report.header(&format!(
        "Pinging public resolver {BASELINE_RESOLVER} for a latency baseline"
    ))?;
    run_probe(report, runner, &ping_benchmark()).await
}

/// Runs the selected test groups in fixed order and finishes with a pointer
/// to the report location.
pub async fn run_tests(
    report: &mut Report,
    command_runner: &dyn CommandRunner,
    probe_runner: &dyn ProbeRunner,
    selection: RunSelection,
    region: Option<Region>,
    baseline: bool,
) -> Result<(), Error> {
    debug!("Run selection: {selection:?}, region: {region:?}");

    if baseline {
        run_baseline(report, probe_runner).await?;
    }
    if selection.lb {
        test_load_balancers(report, probe_runner, selection.skip_traceroute).await?;
    }
    if selection.cdn {
        test_cdnetworks(report, probe_runner, selection.skip_traceroute).await?;
    }
    if selection.s3 {
        test_s3(report, probe_runner, region, selection.skip_traceroute).await?;
    }
    if selection.s3a {
        test_s3_accelerated(report, probe_runner, region, selection.skip_traceroute).await?;
    }
    if selection.speedtest {
        speedtest::run_speed_test(report, command_runner, probe_runner).await?;
    }

    let located = format!(
        "Connectivity report located at: {}",
        report.absolute_path().display()
    );
    report.line(&located)?;
    Ok(())
}
