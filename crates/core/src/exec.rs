//! External process invocation
//!
//! Thin wrapper around `std::process::Command` used for every engine call.
//! The one distinction that matters here: a missing executable surfaces as
//! `EngineError::NotInstalled`, while a command that ran and exited non-zero
//! is reported through its exit code (or `CommandFailed` for the checked
//! variants). Nothing here retries.

use crate::errors::{EngineError, Result};
use std::io::ErrorKind;
use std::process::{Command, Stdio};
use tracing::debug;

/// Exit code reported when the child was terminated by a signal.
const SIGNAL_EXIT: i32 = -1;

/// Render a command line for logs and error messages.
fn command_line(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

fn spawn_error(program: &str, args: &[String], error: std::io::Error) -> EngineError {
    if error.kind() == ErrorKind::NotFound {
        EngineError::NotInstalled {
            program: program.to_string(),
        }
    } else {
        EngineError::Spawn {
            command: command_line(program, args),
            source: error,
        }
    }
}

fn run(program: &str, args: &[String], quiet: bool) -> Result<i32> {
    debug!("Executing: {}", command_line(program, args));

    let mut command = Command::new(program);
    command.args(args);
    if quiet {
        command.stdout(Stdio::null()).stderr(Stdio::null());
    }

    match command.status() {
        Ok(status) => Ok(status.code().unwrap_or(SIGNAL_EXIT)),
        Err(error) => Err(spawn_error(program, args, error).into()),
    }
}

/// Run to completion with inherited streams, returning the exit status.
///
/// Never errors on a non-zero exit; callers decide what the code means.
pub fn call(program: &str, args: &[String]) -> Result<i32> {
    run(program, args, false)
}

/// Like [`call`] but with the child's stdout/stderr discarded.
pub fn call_quiet(program: &str, args: &[String]) -> Result<i32> {
    run(program, args, true)
}

/// Run to completion, failing with `CommandFailed` on a non-zero exit.
pub fn check_call(program: &str, args: &[String]) -> Result<()> {
    checked(program, args, false)
}

/// Like [`check_call`] but with the child's stdout/stderr discarded.
pub fn check_call_quiet(program: &str, args: &[String]) -> Result<()> {
    checked(program, args, true)
}

fn checked(program: &str, args: &[String], quiet: bool) -> Result<()> {
    let code = run(program, args, quiet)?;
    if code != 0 {
        return Err(EngineError::CommandFailed {
            command: command_line(program, args),
            code,
        }
        .into());
    }
    Ok(())
}

/// Run to completion capturing stdout, failing with `CommandFailed` on a
/// non-zero exit.
pub fn check_output(program: &str, args: &[String]) -> Result<Vec<u8>> {
    debug!("Executing (captured): {}", command_line(program, args));

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|error| spawn_error(program, args, error))?;

    if !output.status.success() {
        return Err(EngineError::CommandFailed {
            command: command_line(program, args),
            code: output.status.code().unwrap_or(SIGNAL_EXIT),
        }
        .into());
    }

    Ok(output.stdout)
}
