//! Error taxonomy for a connectivity test run.

use std::io;

use thiserror::Error;

/// Errors raised while running the connectivity tests.
///
/// Only [`Error::Setup`] aborts the whole run. Every other variant is caught
/// at the point of use, written into the report with an `ERROR:` prefix, and
/// the remaining test groups keep running.
#[derive(Debug, Error)]
pub enum Error {
    /// The report file could not be created.
    #[error("could not create report file: {0}")]
    Setup(#[source] io::Error),

    /// An external probe tool is missing or could not be launched. Aborts
    /// that single probe only.
    #[error("could not launch '{tool}': {source}")]
    ProbeLaunch {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// The speedtest script download failed at the transport level.
    #[error(transparent)]
    Network(#[from] reqwest::Error),

    /// The speedtest script download returned a non-success status.
    #[error("HTTP error code {0}")]
    HttpStatus(reqwest::StatusCode),

    /// Local file I/O failed, either on the report sink or on the temporary
    /// speedtest script.
    #[error("local I/O error: {0}")]
    LocalIo(#[from] io::Error),
}

impl Error {
    /// True for a failed probe launch, the one error a group tester
    /// downgrades to an inline report line instead of propagating.
    pub fn is_probe_launch(&self) -> bool {
        matches!(self, Error::ProbeLaunch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_launch_display_names_tool() {
        let err = Error::ProbeLaunch {
            tool: "traceroute".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().contains("traceroute"));
        assert!(err.is_probe_launch());
    }

    #[test]
    fn test_http_status_display_names_code() {
        let err = Error::HttpStatus(reqwest::StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "HTTP error code 404 Not Found");
        assert!(!err.is_probe_launch());
    }
}
