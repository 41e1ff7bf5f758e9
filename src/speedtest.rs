//! Speed test runner.
//!
//! Downloads the sivel speedtest-cli script and runs it with the host's
//! Python. Every failure in here is written to the report and the step is
//! skipped; the speed test never takes the rest of the run down with it.

use std::fs;
use std::path::Path;
use std::time::Duration;

use log::debug;
use reqwest::StatusCode;

use crate::command::{is_command_installed, CommandRunner};
use crate::error::Error;
use crate::probe::{ProbeCommand, ProbeRunner};
use crate::report::Report;

/// Upstream location of the speedtest-cli script.
pub const SPEEDTEST_URL: &str =
    "https://raw.githubusercontent.com/sivel/speedtest-cli/master/speedtest.py";

/// Interpreter used to run the downloaded script.
pub const PYTHON: &str = "python";

/// Scratch name the script is written under, in the working directory.
pub const TEMP_SCRIPT: &str = "speedtest_latest.py";

// The original tool had no download timeout and could hang forever on a bad
// network, which is exactly the situation this tool gets run in.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Checks that a Python interpreter is present and executable by asking it
/// for its version.
fn interpreter_available(runner: &dyn CommandRunner) -> bool {
    if !is_command_installed(PYTHON) {
        return false;
    }
    runner
        .run_command(PYTHON, &["--version"])
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Fetches the speedtest script body, treating any non-200 status as an
/// error carrying the concrete status code.
async fn download_script(url: &str) -> Result<String, Error> {
    let client = reqwest::Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .build()?;
    let response = client.get(url).send().await?;
    let status = response.status();
    if status != StatusCode::OK {
        return Err(Error::HttpStatus(status));
    }
    Ok(response.text().await?)
}

/// Runs the whole speed test step: interpreter check, script download,
/// execution, cleanup.
pub async fn run_speed_test(
    report: &mut Report,
    command_runner: &dyn CommandRunner,
    probe_runner: &dyn ProbeRunner,
) -> Result<(), Error> {
    run_speed_test_at(
        report,
        command_runner,
        probe_runner,
        SPEEDTEST_URL,
        Path::new(TEMP_SCRIPT),
    )
    .await
}

/// [`run_speed_test`] with the download URL and scratch path injectable, so
/// tests can point it at a local stub server and a temp directory.
pub async fn run_speed_test_at(
    report: &mut Report,
    command_runner: &dyn CommandRunner,
    probe_runner: &dyn ProbeRunner,
    url: &str,
    script_path: &Path,
) -> Result<(), Error> {
    report.header("Running SpeedTest to test network speed")?;

    report.line("Detecting installed Python version")?;
    if !interpreter_available(command_runner) {
        report.line("WARNING: Python environment not detected. Skipping speed test...")?;
        return Ok(());
    }

    report.line("Trying to fetch latest version of speedtest-cli...")?;
    let body = match download_script(url).await {
        Ok(body) => body,
        Err(e) => {
            report.line(&format!(
                "ERROR: Could not get latest version of speedtest-cli: {e}"
            ))?;
            return Ok(());
        }
    };

    if let Err(e) = fs::write(script_path, &body) {
        debug!("Writing {}: {}", script_path.display(), e);
        report.line("ERROR: Could not create temporary speedtest-cli script file")?;
        return Ok(());
    }

    let script = ProbeCommand {
        program: PYTHON,
        args: vec![script_path.display().to_string()],
    };
    let outcome = probe_runner.run(report, &script).await;

    // Cleanup happens regardless of how the script run went.
    if let Err(e) = fs::remove_file(script_path) {
        debug!("Removing {}: {}", script_path.display(), e);
    }

    match outcome {
        Err(e) if e.is_probe_launch() => {
            report.line(&format!("ERROR: {e}"))?;
            Ok(())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Read, Write};
    use std::net::TcpListener;
    use std::process::Output;
    use std::sync::Mutex;
    use std::thread;
    use tempfile::tempdir;

    /// Serves one canned HTTP response on a local port.
    fn one_shot_http_server(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/speedtest.py")
    }

    struct RecordingRunner {
        commands: Mutex<Vec<ProbeCommand>>,
    }

    impl RecordingRunner {
        fn new() -> Self {
            Self {
                commands: Mutex::new(Vec::new()),
            }
        }

        fn recorded(&self) -> Vec<ProbeCommand> {
            self.commands.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ProbeRunner for RecordingRunner {
        async fn run(&self, report: &mut Report, command: &ProbeCommand) -> Result<(), Error> {
            // The script must still exist while it is "running".
            assert!(Path::new(&command.args[0]).exists());
            self.commands.lock().unwrap().push(command.clone());
            report.line("Download: 42.00 Mbit/s")?;
            Ok(())
        }
    }

    struct StubCommandRunner {
        succeed: bool,
    }

    impl CommandRunner for StubCommandRunner {
        fn run_command(&self, command: &str, args: &[&str]) -> Result<Output, io::Error> {
            assert_eq!(command, PYTHON);
            assert_eq!(args, ["--version"]);
            if !self.succeed {
                return Err(io::Error::new(io::ErrorKind::NotFound, "not found"));
            }
            #[cfg(unix)]
            {
                use std::os::unix::process::ExitStatusExt;
                Ok(Output {
                    status: std::process::ExitStatus::from_raw(0),
                    stdout: b"Python 2.7.18\n".to_vec(),
                    stderr: Vec::new(),
                })
            }
            #[cfg(not(unix))]
            unimplemented!("tests only run on unix hosts");
        }
    }

    fn report_in(dir: &tempfile::TempDir) -> (Report, std::path::PathBuf) {
        let path = dir.path().join("report.txt");
        (Report::create(&path).unwrap(), path)
    }

    #[tokio::test]
    async fn test_missing_interpreter_warns_once_and_skips() {
        let dir = tempdir().unwrap();
        let (mut report, path) = report_in(&dir);
        let runner = RecordingRunner::new();
        let script = dir.path().join(TEMP_SCRIPT);

        // URL is unroutable on purpose; a skip must never even resolve it.
        run_speed_test_at(
            &mut report,
            &StubCommandRunner { succeed: false },
            &runner,
            "http://127.0.0.1:1/speedtest.py",
            &script,
        )
        .await
        .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents.lines().filter(|l| l.starts_with("WARNING:")).count(),
            1
        );
        assert!(!contents.contains("Trying to fetch"));
        assert!(runner.recorded().is_empty());
        assert!(!script.exists());
    }

    #[tokio::test]
    async fn test_http_error_logs_status_and_leaves_no_script() {
        let dir = tempdir().unwrap();
        let (mut report, path) = report_in(&dir);
        let runner = RecordingRunner::new();
        let script = dir.path().join(TEMP_SCRIPT);
        let url = one_shot_http_server("HTTP/1.1 404 Not Found", "");

        run_speed_test_at(
            &mut report,
            &StubCommandRunner { succeed: true },
            &runner,
            &url,
            &script,
        )
        .await
        .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let errors: Vec<&str> = contents
            .lines()
            .filter(|l| l.starts_with("ERROR:"))
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("404"));
        assert!(runner.recorded().is_empty());
        assert!(!script.exists());
    }

    #[tokio::test]
    async fn test_successful_download_runs_script_and_cleans_up() {
        let dir = tempdir().unwrap();
        let (mut report, path) = report_in(&dir);
        let runner = RecordingRunner::new();
        let script = dir.path().join(TEMP_SCRIPT);
        let url = one_shot_http_server("HTTP/1.1 200 OK", "print('speedtest')");

        run_speed_test_at(
            &mut report,
            &StubCommandRunner { succeed: true },
            &runner,
            &url,
            &script,
        )
        .await
        .unwrap();

        let commands = runner.recorded();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].program, PYTHON);
        assert_eq!(commands[0].args, vec![script.display().to_string()]);
        // Best-effort cleanup removed the scratch script.
        assert!(!script.exists());

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Running SpeedTest to test network speed"));
        assert!(contents.contains("Download: 42.00 Mbit/s"));
    }

    #[tokio::test]
    async fn test_unwritable_script_path_logs_error_and_skips() {
        let dir = tempdir().unwrap();
        let (mut report, path) = report_in(&dir);
        let runner = RecordingRunner::new();
        // Parent directory does not exist, so the write must fail.
        let script = dir.path().join("missing").join(TEMP_SCRIPT);
        let url = one_shot_http_server("HTTP/1.1 200 OK", "print('speedtest')");

        run_speed_test_at(
            &mut report,
            &StubCommandRunner { succeed: true },
            &runner,
            &url,
            &script,
        )
        .await
        .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("ERROR: Could not create temporary speedtest-cli script file"));
        assert!(runner.recorded().is_empty());
    }
}
