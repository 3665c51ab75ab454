//! Choosing the Python interpreter the build script targets.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::environment::{AmbientEnv, INTERPRETER_VAR};

/// Resolve the interpreter path to export as `PYTHON_BIN`.
///
/// Resolution order:
/// 1. `explicit`, the interpreter the frontend is running under
/// 2. a non-blank `PYTHON_BIN` in the ambient environment
/// 3. `python3` on `PATH` via `which`
///
/// Returns `None` when nothing is found; the variable is then left untouched.
pub fn resolve_interpreter(explicit: Option<&Path>, ambient: &AmbientEnv) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = ambient.non_blank(INTERPRETER_VAR) {
        return Some(PathBuf::from(path));
    }
    let found = which("python3");
    if found.is_none() {
        tracing::warn!("no Python interpreter found; {INTERPRETER_VAR} is left unset");
    }
    found
}

fn which(program: &str) -> Option<PathBuf> {
    let output = Command::new("which").arg(program).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let path_str = String::from_utf8_lossy(&output.stdout);
    let trimmed = path_str.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}
