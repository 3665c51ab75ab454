//! Running the external build script.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::artifacts::ArtifactSet;
use crate::environment::{AmbientEnv, BuildEnvironment};
use crate::error::BuilderError;

/// Location of the build script, relative to the project root.
pub const BUILD_SCRIPT: &str = "scripts/build_all.sh";

/// Builder for one run of the project's build script.
#[derive(Debug, Clone)]
pub struct BuildScript {
    project_root: PathBuf,
    script: PathBuf,
    shell: String,
    ambient: AmbientEnv,
    interpreter: Option<PathBuf>,
}

impl BuildScript {
    /// Prepare a run of `scripts/build_all.sh` under `project_root` with the
    /// given environment snapshot.
    pub fn new(project_root: &Path, ambient: AmbientEnv) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            script: PathBuf::from(BUILD_SCRIPT),
            shell: "bash".to_owned(),
            ambient,
            interpreter: None,
        }
    }

    /// Use a different script path, relative to the project root.
    #[must_use]
    pub fn script(mut self, relative: &Path) -> Self {
        self.script = relative.to_path_buf();
        self
    }

    /// Export `path` as `PYTHON_BIN`.
    #[must_use]
    pub fn interpreter(mut self, path: Option<&Path>) -> Self {
        self.interpreter = path.map(Path::to_path_buf);
        self
    }

    /// Absolute path of the script.
    pub fn script_path(&self) -> PathBuf {
        self.project_root.join(&self.script)
    }

    /// The environment a run with `scratch_root` would receive.
    pub fn environment(&self, scratch_root: &Path) -> BuildEnvironment {
        BuildEnvironment::new(&self.ambient, scratch_root, self.interpreter.as_deref())
    }

    /// Run the script and collect the wheels it produced.
    ///
    /// `scratch_root` must be a directory owned by this call; the script may
    /// write anything beneath it and nothing is cleaned up here.
    ///
    /// # Errors
    /// - [`BuilderError::MissingDependency`] if the script does not exist
    /// - [`BuilderError::BuildFailed`] if it exits non-zero
    /// - [`BuilderError::NoArtifactsProduced`] if no wheel was found
    /// - [`BuilderError::Util`] if it cannot be spawned or the output cannot be listed
    pub fn invoke(&self, scratch_root: &Path) -> Result<ArtifactSet, BuilderError> {
        let env = self.environment(scratch_root);
        let script = self.script_path();
        if !script.is_file() {
            return Err(BuilderError::MissingDependency { path: script });
        }

        tracing::info!(
            script = %script.display(),
            output_root = %env.output_root().display(),
            "running build script"
        );

        let mut cmd = Command::new(&self.shell);
        cmd.arg(&script)
            .current_dir(&self.project_root)
            .env_clear()
            .envs(env.vars());
        let outcome = wheelwright_util::process::run_forwarding(&mut cmd)?;
        if !outcome.success {
            return Err(BuilderError::BuildFailed {
                script: self.script.clone(),
                code: outcome.exit_code,
            });
        }

        let artifacts = ArtifactSet::scan(env.output_root())?;
        if artifacts.is_empty() {
            return Err(BuilderError::NoArtifactsProduced {
                output_root: env.output_root().to_path_buf(),
            });
        }
        tracing::debug!(count = artifacts.len(), "build script produced wheels");
        Ok(artifacts)
    }
}
