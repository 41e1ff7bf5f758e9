//! Static endpoint tables for the Shotgun service.
//!
//! Warning: these addresses are subject to change.

/// Shotgun load balancer IPs.
pub const LOAD_BALANCERS: [&str; 2] = ["74.50.63.109", "74.50.63.111"];

/// CDNetworks CNAMEs fronting Shotgun.
pub const CDN_CNAMES: [&str; 2] = [
    "wildcard-geo.shotgunstudio.com",
    "wildcard-cdn.shotgunstudio.com.",
];

const S3_OREGON: &str = "sg-media-usor-01.s3.amazonaws.com";
const S3_TOKYO: &str = "sg-media-tokyo.s3.amazonaws.com";
const S3_IRELAND: &str = "sg-media-ireland.s3.amazonaws.com";
const S3_SAOPAULO: &str = "sg-media-saopaulo.s3.amazonaws.com";

const S3A_OREGON: &str = "sg-media-usor-01.s3-accelerate.amazonaws.com";
const S3A_TOKYO: &str = "sg-media-tokyo.s3-accelerate.amazonaws.com";
const S3A_IRELAND: &str = "sg-media-ireland.s3-accelerate.amazonaws.com";
const S3A_SAOPAULO: &str = "sg-media-saopaulo.s3-accelerate.amazonaws.com";

/// Geographic regions hosting Shotgun media buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Oregon,
    Tokyo,
    Ireland,
    SaoPaulo,
}

/// S3 media bucket hostnames, optionally narrowed to one region.
pub fn s3_buckets(region: Option<Region>) -> Vec<&'static str> {
    match region {
        None => vec![S3_OREGON, S3_TOKYO, S3_IRELAND, S3_SAOPAULO],
        Some(Region::Oregon) => vec![S3_OREGON],
        Some(Region::Tokyo) => vec![S3_TOKYO],
        Some(Region::Ireland) => vec![S3_IRELAND],
        Some(Region::SaoPaulo) => vec![S3_SAOPAULO],
    }
}

/// S3 accelerated-transfer bucket hostnames, optionally narrowed to one
/// region.
pub fn s3_accelerated_buckets(region: Option<Region>) -> Vec<&'static str> {
    match region {
        None => vec![S3A_OREGON, S3A_TOKYO, S3A_IRELAND, S3A_SAOPAULO],
        Some(Region::Oregon) => vec![S3A_OREGON],
        Some(Region::Tokyo) => vec![S3A_TOKYO],
        Some(Region::Ireland) => vec![S3A_IRELAND],
        Some(Region::SaoPaulo) => vec![S3A_SAOPAULO],
    }
}
