//! The environment handed to the build script.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Output-root variable read by the build script.
pub const OUTPUT_ROOT_VAR: &str = "BUILD_ROOT";

/// Interpreter the build script should target.
pub const INTERPRETER_VAR: &str = "PYTHON_BIN";

/// Variables that would let the outer frontend leak into the inner build's
/// backend discovery.
pub const SCRUBBED_VARS: [&str; 2] = ["PYTHONPATH", "PEP517_BUILD_BACKEND"];

/// An immutable snapshot of process environment variables.
///
/// Captured once at startup and passed down explicitly; the live process
/// environment is never modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmbientEnv(BTreeMap<OsString, OsString>);

impl AmbientEnv {
    /// Snapshot the current process environment.
    pub fn capture() -> Self {
        Self(std::env::vars_os().collect())
    }

    pub fn get(&self, key: &str) -> Option<&OsStr> {
        self.0.get(OsStr::new(key)).map(OsString::as_os_str)
    }

    /// Return `key`'s value unless it is absent or only whitespace.
    pub fn non_blank(&self, key: &str) -> Option<&OsStr> {
        self.get(key)
            .filter(|value| !value.to_string_lossy().trim().is_empty())
    }

    /// A copy of this snapshot with `key` set to `value`.
    #[must_use]
    pub fn with(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// A copy of this snapshot without `key`.
    #[must_use]
    pub fn without(mut self, key: &str) -> Self {
        self.0.remove(OsStr::new(key));
        self
    }
}

impl<K: Into<OsString>, V: Into<OsString>> FromIterator<(K, V)> for AmbientEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// The complete environment of one build-script run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEnvironment {
    vars: BTreeMap<OsString, OsString>,
    output_root: PathBuf,
}

impl BuildEnvironment {
    /// Derive the build environment from an ambient snapshot.
    ///
    /// 1. `BUILD_ROOT` is set to `scratch_root` unless the ambient value is non-blank.
    /// 2. `PYTHON_BIN` is set to `interpreter` when one is known.
    /// 3. `PYTHONPATH` and `PEP517_BUILD_BACKEND` are removed.
    pub fn new(ambient: &AmbientEnv, scratch_root: &Path, interpreter: Option<&Path>) -> Self {
        let mut vars = ambient.0.clone();

        let output_root = match ambient.non_blank(OUTPUT_ROOT_VAR) {
            Some(root) => PathBuf::from(root),
            None => {
                vars.insert(OUTPUT_ROOT_VAR.into(), scratch_root.as_os_str().to_owned());
                scratch_root.to_path_buf()
            }
        };

        if let Some(interpreter) = interpreter {
            vars.insert(INTERPRETER_VAR.into(), interpreter.as_os_str().to_owned());
        }

        for key in SCRUBBED_VARS {
            vars.remove(OsStr::new(key));
        }

        Self { vars, output_root }
    }

    /// Directory under which the build script leaves its wheelhouses.
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn get(&self, key: &str) -> Option<&OsStr> {
        self.vars.get(OsStr::new(key)).map(OsString::as_os_str)
    }

    /// All variables in name order.
    pub fn vars(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }
}
