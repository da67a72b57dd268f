//! Process execution with explicit timeouts.
//!
//! All external tool invocations go through the [`ProcessRunner`] trait so
//! engine logic can be tested without ffmpeg installed. The real
//! [`SystemRunner`] polls the child against a deadline and kills it on
//! timeout; exceeding the budget is reported as [`MediaError::Timeout`],
//! never as a generic failure.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::MediaError;

/// Poll interval while waiting for a child process.
const WAIT_POLL: Duration = Duration::from_millis(25);

/// An explicit command specification: the tool and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable name or path (e.g., "ffmpeg").
    pub tool: String,
    /// Arguments, one token per element.
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a command spec.
    pub fn new(tool: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            tool: tool.into(),
            args,
        }
    }

    /// Single-line rendering for logs.
    pub fn display(&self) -> String {
        format!("{} {}", self.tool, self.args.join(" "))
    }
}

/// Captured output of a finished process.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the process exited zero.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Capability for running external commands under a timeout.
pub trait ProcessRunner: Send + Sync {
    /// Run the command, blocking until it finishes, fails, or the timeout
    /// expires. A nonzero exit is NOT an error at this layer; callers
    /// decide what exit codes mean.
    fn run(&self, spec: &CommandSpec, timeout: Duration) -> Result<ProcessOutput, MediaError>;
}

/// Runner backed by real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec, timeout: Duration) -> Result<ProcessOutput, MediaError> {
        tracing::debug!(command = %spec.display(), "running external tool");

        let mut child = Command::new(&spec.tool)
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| MediaError::Launch {
                tool: spec.tool.clone(),
                source,
            })?;

        // Drain both pipes on background threads so a chatty child cannot
        // fill a pipe buffer and deadlock against our wait loop.
        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        tracing::warn!(
                            tool = %spec.tool,
                            timeout_secs = timeout.as_secs(),
                            "external tool timed out and was killed"
                        );
                        return Err(MediaError::timeout(&spec.tool, timeout.as_secs()));
                    }
                    thread::sleep(WAIT_POLL);
                }
                Err(source) => {
                    return Err(MediaError::Launch {
                        tool: spec.tool.clone(),
                        source,
                    });
                }
            }
        };

        let stdout = join_reader(stdout_reader);
        let stderr = join_reader(stderr_reader);

        Ok(ProcessOutput {
            exit_code: status.code().unwrap_or(-1),
            stdout,
            stderr,
        })
    }
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut handle| {
        thread::spawn(move || {
            let mut buf = String::new();
            let _ = handle.read_to_string(&mut buf);
            buf
        })
    })
}

fn join_reader(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_and_exit_code() {
        let spec = CommandSpec::new("sh", vec!["-c".into(), "echo hello; exit 3".into()]);
        let out = SystemRunner::new()
            .run(&spec, Duration::from_secs(5))
            .unwrap();
        assert_eq!(out.exit_code, 3);
        assert_eq!(out.stdout.trim(), "hello");
        assert!(!out.success());
    }

    #[test]
    fn missing_tool_is_a_launch_error() {
        let spec = CommandSpec::new("definitely-not-a-real-binary", vec![]);
        let err = SystemRunner::new()
            .run(&spec, Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, MediaError::Launch { .. }));
    }

    #[test]
    fn slow_process_times_out() {
        let spec = CommandSpec::new("sh", vec!["-c".into(), "sleep 10".into()]);
        let err = SystemRunner::new()
            .run(&spec, Duration::from_millis(100))
            .unwrap_err();
        assert!(matches!(err, MediaError::Timeout { .. }));
    }

    #[test]
    fn command_display_joins_tokens() {
        let spec = CommandSpec::new("ffmpeg", vec!["-y".into(), "-i".into(), "in.mp4".into()]);
        assert_eq!(spec.display(), "ffmpeg -y -i in.mp4");
    }
}
