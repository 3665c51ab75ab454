//! Process execution helpers.

use std::process::{Command, Stdio};

use crate::error::UtilError;

/// How a child process finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Whether the command exited successfully.
    pub success: bool,
    /// The exit code, if the process was not killed by a signal.
    pub exit_code: Option<i32>,
}

/// Run a command to completion, forwarding its output to our stderr.
///
/// The child's stdout is redirected to stderr so that anything it prints can
/// never be confused with the single result line this tool writes to stdout.
///
/// # Errors
/// Returns an error if the command cannot be spawned (e.g. binary not found).
/// A non-zero exit code is **not** an error; check `ExitOutcome::success` instead.
pub fn run_forwarding(cmd: &mut Command) -> Result<ExitOutcome, UtilError> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    tracing::debug!(%program, args = ?cmd.get_args().collect::<Vec<_>>(), "spawning");

    let status = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::from(std::io::stderr()))
        .stderr(Stdio::inherit())
        .status()
        .map_err(|source| UtilError::CommandExec { program, source })?;

    Ok(ExitOutcome {
        success: status.success(),
        exit_code: status.code(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn run_forwarding_success() {
        let outcome = run_forwarding(Command::new("sh").arg("-c").arg("echo hello")).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.exit_code, Some(0));
    }

    #[test]
    fn run_forwarding_reports_exit_code() {
        let outcome = run_forwarding(Command::new("sh").arg("-c").arg("exit 3")).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.exit_code, Some(3));
    }

    #[test]
    fn run_forwarding_missing_binary() {
        let err = run_forwarding(&mut Command::new("nonexistent_binary_xyz_123")).unwrap_err();
        assert!(
            err.to_string().contains("nonexistent_binary_xyz_123"),
            "error was: {err}"
        );
    }

    #[test]
    fn run_forwarding_applies_cwd() {
        let tmp = tempfile::tempdir().unwrap();
        let outcome = run_forwarding(
            Command::new("sh")
                .arg("-c")
                .arg("touch marker")
                .current_dir(tmp.path()),
        )
        .unwrap();
        assert!(outcome.success);
        assert!(tmp.path().join("marker").exists());
    }
}
