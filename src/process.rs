//! External process execution
//!
//! Every call to an external binary goes through [`ProcessRunner`], so the
//! operations can be exercised with a test double instead of real tools.

use crate::error::{Error, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit status, see [`exit_code`]
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Capability to run an external program to completion
pub trait ProcessRunner {
    /// Run `program` with `args`, inheriting stdout/stderr, and return its exit status.
    fn run(&self, program: &Path, args: &[OsString]) -> Result<i32>;

    /// Run `program` with `args` and capture its output.
    fn capture(&self, program: &Path, args: &[OsString]) -> Result<ProcessOutput>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<i32> {
        (**self).run(program, args)
    }

    fn capture(&self, program: &Path, args: &[OsString]) -> Result<ProcessOutput> {
        (**self).capture(program, args)
    }
}

/// Runs programs with `std::process::Command`, blocking until they exit
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(program: &Path, args: &[OsString]) -> Command {
        tracing::debug!(
            program = %program.display(),
            args = ?args,
            "Spawning external tool"
        );
        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::null());
        cmd
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<i32> {
        let status = Self::command(program, args)
            .status()
            .map_err(|e| launch_error(program, e))?;
        Ok(exit_code(status))
    }

    fn capture(&self, program: &Path, args: &[OsString]) -> Result<ProcessOutput> {
        let output = Self::command(program, args)
            .output()
            .map_err(|e| launch_error(program, e))?;
        Ok(ProcessOutput {
            status: exit_code(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn launch_error(program: &Path, source: std::io::Error) -> Error {
    Error::ToolLaunch {
        tool: program.display().to_string(),
        source,
    }
}

/// Numeric exit status: the exit code, `-N` when killed by signal `N`, `-1` otherwise.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_launch_error() {
        let runner = SystemRunner;
        let result = runner.run(Path::new("/nonexistent/definitely-not-a-tool"), &[]);
        match result {
            Err(Error::ToolLaunch { tool, .. }) => {
                assert_eq!(tool, "/nonexistent/definitely-not-a-tool")
            }
            other => panic!("expected ToolLaunch, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_run_reports_exit_code() {
        let runner = SystemRunner;
        let args: Vec<OsString> = vec!["-c".into(), "exit 3".into()];
        assert_eq!(runner.run(Path::new("sh"), &args).unwrap(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_capture_collects_streams() {
        let runner = SystemRunner;
        let args: Vec<OsString> = vec!["-c".into(), "echo out; echo err >&2".into()];
        let output = runner.capture(Path::new("sh"), &args).unwrap();
        assert_eq!(output.status, 0);
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }

    #[cfg(unix)]
    #[test]
    fn test_signal_is_negative() {
        let runner = SystemRunner;
        let args: Vec<OsString> = vec!["-c".into(), "kill -9 $$".into()];
        assert_eq!(runner.run(Path::new("sh"), &args).unwrap(), -9);
    }
}
