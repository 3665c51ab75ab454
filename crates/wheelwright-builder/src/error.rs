//! Error types for wheelwright-builder.

use std::path::PathBuf;

/// Errors produced while running the build script.
#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    /// The build script does not exist at its expected location.
    #[error("missing build script: {path}")]
    MissingDependency { path: PathBuf },

    /// The build script ran but exited unsuccessfully.
    #[error("build script {script} failed: {}", describe_exit(.code))]
    BuildFailed { script: PathBuf, code: Option<i32> },

    /// The build script succeeded but left no wheels behind.
    #[error("build script did not produce any wheels under {output_root}")]
    NoArtifactsProduced { output_root: PathBuf },

    /// An error propagated from wheelwright-util.
    #[error("{0}")]
    Util(#[from] wheelwright_util::error::UtilError),
}

impl BuilderError {
    /// The script's exit code, for errors that carry one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::BuildFailed { code, .. } => *code,
            _ => None,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by a signal".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_failed_mentions_exit_code() {
        let err = BuilderError::BuildFailed {
            script: PathBuf::from("scripts/build_all.sh"),
            code: Some(2),
        };
        assert_eq!(
            err.to_string(),
            "build script scripts/build_all.sh failed: exit code 2"
        );
        assert_eq!(err.exit_code(), Some(2));
    }

    #[test]
    fn build_failed_by_signal() {
        let err = BuilderError::BuildFailed {
            script: PathBuf::from("build.sh"),
            code: None,
        };
        assert!(err.to_string().ends_with("terminated by a signal"));
        assert_eq!(err.exit_code(), None);
    }
}
