//! Thin wrappers around the external tools the pipeline drives
//! (ffmpeg, ffprobe, whisperx, rclone).

use std::ffi::OsStr;
use std::process::{Command, Stdio};

use crate::error::PipelineError;

/// Run a command with inherited stdio, so long-running tools keep their
/// progress output. Fails when the command cannot be spawned or exits
/// non-zero.
pub fn run_streamed<I, S>(program: &str, args: I) -> Result<(), PipelineError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|source| PipelineError::Spawn {
            command: program.to_string(),
            source,
        })?;

    if !status.success() {
        return Err(PipelineError::CommandFailed {
            command: program.to_string(),
            status,
        });
    }

    Ok(())
}

/// Run a command and return its stdout. Stderr is inherited.
pub fn run_captured<I, S>(program: &str, args: I) -> Result<Vec<u8>, PipelineError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(program)
        .args(args)
        .stderr(Stdio::inherit())
        .output()
        .map_err(|source| PipelineError::Spawn {
            command: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(PipelineError::CommandFailed {
            command: program.to_string(),
            status: output.status,
        });
    }

    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captured_output_is_returned() {
        let stdout = run_captured("echo", ["tribuna"]).unwrap();
        assert_eq!(stdout, b"tribuna\n");
    }

    #[test]
    fn non_zero_exits_are_errors() {
        let result = run_streamed("false", Vec::<&str>::new());
        assert!(matches!(
            result,
            Err(PipelineError::CommandFailed { command, .. }) if command == "false"
        ));
    }

    #[test]
    fn missing_programs_fail_to_spawn() {
        let result = run_captured("tribuna-no-such-tool", Vec::<&str>::new());
        assert!(matches!(result, Err(PipelineError::Spawn { .. })));
    }
}
