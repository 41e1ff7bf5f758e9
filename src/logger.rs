//! Logging setup.
//!
//! Quiet by default; `RUST_LOG` or `--verbose` turn on debug traces. The
//! report itself is ordinary program output, not log records, so the log
//! level never changes what ends up in the report file.

use std::io::Write;

use chrono::Local;
use env_logger::{Builder, Env};
use log::debug;

/// Initialize the logging system.
///
/// The level is taken from `RUST_LOG` when set and defaults to `warn`.
pub fn init() {
    let env = Env::default().filter_or("RUST_LOG", "warn");

    Builder::from_env(env)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {} {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();

    debug!("Logger initialized");
}
