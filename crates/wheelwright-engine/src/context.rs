//! Everything a build hook needs to know about the project and its caller.

use std::path::{Path, PathBuf};

use wheelwright_builder::{AmbientEnv, BuildScript};
use wheelwright_config::{ConfigSettings, ProjectDescriptor};

use crate::error::EngineError;
use crate::metadata::{synthesize, MetadataRecord, README_FILE};

/// Prefix of the scratch directory a build runs in.
pub const BUILD_SCRATCH_PREFIX: &str = "wheelwright-build-";

/// Prefix of the scratch directory a wheel is unpacked into.
pub const UNZIP_SCRATCH_PREFIX: &str = "wheelwright-unzip-";

/// The project being built and the environment it is built in.
#[derive(Debug, Clone)]
pub struct BackendContext {
    project_root: PathBuf,
    ambient: AmbientEnv,
    interpreter: Option<PathBuf>,
    settings: ConfigSettings,
}

impl BackendContext {
    pub fn new(project_root: &Path, ambient: AmbientEnv) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            ambient,
            interpreter: None,
            settings: ConfigSettings::default(),
        }
    }

    /// Set the interpreter exported to the build script as `PYTHON_BIN`.
    #[must_use]
    pub fn with_interpreter(mut self, interpreter: Option<PathBuf>) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Attach the frontend's `config_settings`.
    #[must_use]
    pub fn with_settings(mut self, settings: ConfigSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn settings(&self) -> &ConfigSettings {
        &self.settings
    }

    /// Read `pyproject.toml`. Never fails.
    pub fn descriptor(&self) -> ProjectDescriptor {
        wheelwright_config::read_descriptor(&self.project_root)
    }

    /// Metadata synthesized from the descriptor and the README, if any.
    pub fn metadata(&self) -> MetadataRecord {
        let readme = std::fs::read_to_string(self.project_root.join(README_FILE)).ok();
        synthesize(&self.descriptor(), readme.as_deref())
    }

    /// The distribution name wheels are matched against.
    pub fn distribution_name(&self) -> String {
        synthesize(&self.descriptor(), None).name
    }

    pub(crate) fn build_script(&self) -> BuildScript {
        BuildScript::new(&self.project_root, self.ambient.clone())
            .interpreter(self.interpreter.as_deref())
    }

    pub(crate) fn log_settings(&self, hook: &str) {
        for (key, value) in self.settings.iter() {
            tracing::debug!(hook, key, value, "ignoring config setting");
        }
    }
}

/// Create a scratch directory that is removed when dropped.
///
/// Removal failures on drop are ignored.
pub(crate) fn scratch_dir(prefix: &str) -> Result<tempfile::TempDir, EngineError> {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .map_err(|source| EngineError::Io {
            path: std::env::temp_dir().display().to_string(),
            source,
        })
}
