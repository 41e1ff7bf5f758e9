//! Shotgun connectivity test binary.
//!
//! Invoked with no options this behaves like `--short` with every test
//! category enabled; `--all` additionally runs traceroutes to every
//! end-point.

use std::process::ExitCode;

use clap::Parser;
use log::error;

use shotgun_connectivity_test::{
    diagnostics, logger, Error, RealCommandRunner, Region, Report, RunSelection, SelectionFlags,
    StreamingRunner, REPORT_FILENAME,
};

/// Command-line arguments structure for the application.
#[derive(Parser, Debug, Clone)]
#[command(version, about = "Test connectivity to the Shotgun end-points.", long_about = None)]
struct Args {
    /// Default. Test connectivity to all end-points, skipping traceroutes.
    #[arg(long)]
    short: bool,

    /// Test connectivity to all end-points in depth; executes traceroutes
    /// to all end-points.
    #[arg(long)]
    all: bool,

    /// Test connectivity to the Shotgun Web Acceleration Service
    /// (CDNetworks).
    #[arg(long)]
    cdn: bool,

    /// Test connectivity to the Shotgun load balancers.
    #[arg(long)]
    lb: bool,

    /// Test connectivity to the Shotgun S3 buckets.
    #[arg(long)]
    s3: bool,

    /// Test connectivity to the Shotgun S3 accelerated transfer buckets.
    #[arg(long)]
    s3a: bool,

    /// Run SpeedTest.
    #[arg(long)]
    speedtest: bool,

    /// Ping a public resolver first, as a latency baseline independent of
    /// the Shotgun end-points.
    #[arg(long)]
    baseline: bool,

    /// Specifically test for the oregon geo.
    #[arg(long = "geo_oregon", group = "geo")]
    geo_oregon: bool,

    /// Specifically test for the tokyo geo.
    #[arg(long = "geo_tokyo", group = "geo")]
    geo_tokyo: bool,

    /// Specifically test for the ireland geo.
    #[arg(long = "geo_ireland", group = "geo")]
    geo_ireland: bool,

    /// Specifically test for the saopaulo geo.
    #[arg(long = "geo_saopaulo", group = "geo")]
    geo_saopaulo: bool,

    /// Increase log verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn selection_flags(&self) -> SelectionFlags {
        SelectionFlags {
            short: self.short,
            all: self.all,
            cdn: self.cdn,
            lb: self.lb,
            s3: self.s3,
            s3a: self.s3a,
            speedtest: self.speedtest,
        }
    }

    /// The single requested geo, if any; the clap group keeps the flags
    /// mutually exclusive.
    fn region(&self) -> Option<Region> {
        if self.geo_oregon {
            Some(Region::Oregon)
        } else if self.geo_tokyo {
            Some(Region::Tokyo)
        } else if self.geo_ireland {
            Some(Region::Ireland)
        } else if self.geo_saopaulo {
            Some(Region::SaoPaulo)
        } else {
            None
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if args.verbose > 0 {
        std::env::set_var("RUST_LOG", "debug");
    }
    logger::init();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<(), Error> {
    let selection = RunSelection::from_flags(args.selection_flags());
    let region = args.region();

    let mut report = Report::create(REPORT_FILENAME)?;
    diagnostics::run_tests(
        &mut report,
        &RealCommandRunner,
        &StreamingRunner,
        selection,
        region,
        args.baseline,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_geo_flags_are_mutually_exclusive() {
        let parsed = Args::try_parse_from(["sct", "--geo_oregon", "--geo_tokyo"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_geo_flag_maps_to_region() {
        let args = Args::try_parse_from(["sct", "--s3", "--geo_saopaulo"]).unwrap();
        assert_eq!(args.region(), Some(Region::SaoPaulo));
        assert!(args.selection_flags().s3);
    }

    #[test]
    fn test_no_arguments_expands_to_every_category() {
        let args = Args::try_parse_from(["sct"]).unwrap();
        let selection = RunSelection::from_flags(args.selection_flags());
        assert!(selection.lb && selection.cdn && selection.s3 && selection.s3a);
        assert!(selection.speedtest);
        assert!(!selection.skip_traceroute);
    }

    #[test]
    fn test_verbose_flag_counts() {
        let args = Args::try_parse_from(["sct", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }
}
