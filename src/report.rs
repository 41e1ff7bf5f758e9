//! Report sink shared by every test section.
//!
//! Every line written here lands in the report file and is mirrored to the
//! console, one line at a time, so the operator sees live progress during
//! long traceroutes while the file keeps an identical copy.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::Error;

/// Report file name, created in the current working directory.
pub const REPORT_FILENAME: &str = "shotgun_connectivity_report.txt";

const BANNER_WIDTH: usize = 64;

/// Dual console/file sink for the connectivity report.
pub struct Report {
    file: File,
    path: PathBuf,
}

impl Report {
    /// Creates a fresh report file at `path`, replacing any previous run's
    /// file.
    ///
    /// A pre-existing file that cannot be removed is tolerated; failing to
    /// create the new file is the one fatal condition of the whole run.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        if path.exists() {
            if let Err(e) = fs::remove_file(&path) {
                debug!("Could not remove previous report {}: {}", path.display(), e);
            }
        }
        let file = File::create(&path).map_err(Error::Setup)?;
        Ok(Self { file, path })
    }

    /// Writes one line to the report file and mirrors it to the console.
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        println!("{text}");
        writeln!(self.file, "{text}")?;
        self.file.flush()
    }

    /// Writes a banner-delimited section header.
    pub fn header(&mut self, title: &str) -> io::Result<()> {
        let banner = "#".repeat(BANNER_WIDTH);
        self.line(&banner)?;
        self.line(title)?;
        self.line(&banner)
    }

    /// Path of the report file as given at creation time.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute path of the report file, for the final pointer line.
    pub fn absolute_path(&self) -> PathBuf {
        fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone())
    }
}
