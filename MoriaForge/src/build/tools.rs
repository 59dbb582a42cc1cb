//! External tool invocation (JSON converter, repackager)

use std::ffi::OsStr;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Captured output of a finished tool
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Display name of a tool (its file name)
pub fn tool_name(tool: &Path) -> String {
    tool.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| tool.display().to_string())
}

/// Run `tool` with `args`, waiting at most `timeout`.
///
/// Fails with [`Error::ToolNotFound`] if the executable does not exist,
/// [`Error::ToolTimedOut`] if it is still running after `timeout` (it is
/// killed), and [`Error::ToolFailed`] on a non-zero exit status.
///
/// Output is collected until the same deadline. A stream still held open
/// by a leftover child process at that point is dropped.
pub fn run_tool<I, S>(tool: &Path, args: I, working_dir: Option<&Path>, timeout: Duration) -> Result<ToolOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let name = tool_name(tool);
    if !tool.is_file() {
        tracing::error!("{} not found at {}", name, tool.display());
        return Err(Error::ToolNotFound {
            tool: name,
            path: tool.to_path_buf(),
        });
    }

    let mut command = Command::new(tool);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = working_dir {
        command.current_dir(dir);
    }
    tracing::debug!("Running {:?}", command);

    let mut child = command.spawn()?;
    let stdout = child.stdout.take().map(spawn_reader);
    let stderr = child.stderr.take().map(spawn_reader);

    let started = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if started.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            tracing::error!("{} timed out after {:?}", name, timeout);
            return Err(Error::ToolTimedOut {
                tool: name,
                seconds: timeout.as_secs(),
            });
        }
        thread::sleep(POLL_INTERVAL);
    };

    let deadline = started + timeout;
    let output = ToolOutput {
        code: status.code(),
        stdout: stdout.map(|rx| collect_output(&name, "stdout", &rx, deadline)).unwrap_or_default(),
        stderr: stderr.map(|rx| collect_output(&name, "stderr", &rx, deadline)).unwrap_or_default(),
    };

    if !status.success() {
        tracing::error!("{} failed with code {:?}", name, output.code);
        tracing::error!("stdout: {}", output.stdout);
        tracing::error!("stderr: {}", output.stderr);
        return Err(Error::ToolFailed {
            tool: name,
            code: output.code,
            stderr: output.stderr,
        });
    }

    Ok(output)
}

fn spawn_reader<R: Read + Send + 'static>(mut reader: R) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(e) = reader.read_to_end(&mut buf) {
            tracing::debug!("Tool output read error: {}", e);
        }
        // Receiver is gone if the deadline passed
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    rx
}

fn collect_output(tool: &str, stream: &str, rx: &Receiver<String>, deadline: Instant) -> String {
    let remaining = deadline.saturating_duration_since(Instant::now());
    match rx.recv_timeout(remaining.max(POLL_INTERVAL)) {
        Ok(text) => text,
        Err(_) => {
            tracing::warn!("{} exited but its {} is still open; ignoring it", tool, stream);
            String::new()
        }
    }
}
