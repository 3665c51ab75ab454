//! Wheels left behind by the build script.

use std::path::{Path, PathBuf};

use crate::error::BuilderError;

/// Wheels after `auditwheel`/`delocate`-style repair. Preferred.
pub const REPAIRED_DIR: &str = "wheelhouse-repaired";

/// Wheels as produced by the compiler.
pub const PRIMARY_DIR: &str = "wheelhouse";

/// File suffix of a built artifact.
pub const ARTIFACT_SUFFIX: &str = ".whl";

/// The wheels found after a build, grouped by the directory they came from.
///
/// Each group is sorted by file name. Iteration yields the repaired group
/// first, then the primary group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSet {
    repaired: Vec<PathBuf>,
    primary: Vec<PathBuf>,
}

impl ArtifactSet {
    /// Build a set from explicit groups, sorting each by file name.
    ///
    /// The sort is stable, so entries with equal names keep the given order.
    pub fn new(mut repaired: Vec<PathBuf>, mut primary: Vec<PathBuf>) -> Self {
        sort_by_file_name(&mut repaired);
        sort_by_file_name(&mut primary);
        Self { repaired, primary }
    }

    /// Scan `<output_root>/wheelhouse-repaired` and `<output_root>/wheelhouse`.
    ///
    /// Missing directories contribute nothing.
    ///
    /// # Errors
    /// Returns an error if a directory exists but cannot be listed.
    pub fn scan(output_root: &Path) -> Result<Self, BuilderError> {
        let repaired =
            wheelwright_util::fs::collect_files(&output_root.join(REPAIRED_DIR), ARTIFACT_SUFFIX)?;
        let primary =
            wheelwright_util::fs::collect_files(&output_root.join(PRIMARY_DIR), ARTIFACT_SUFFIX)?;
        tracing::debug!(
            repaired = repaired.len(),
            primary = primary.len(),
            "scanned {}",
            output_root.display()
        );
        Ok(Self::new(repaired, primary))
    }

    pub fn repaired(&self) -> &[PathBuf] {
        &self.repaired
    }

    pub fn primary(&self) -> &[PathBuf] {
        &self.primary
    }

    pub fn is_empty(&self) -> bool {
        self.repaired.is_empty() && self.primary.is_empty()
    }

    pub fn len(&self) -> usize {
        self.repaired.len() + self.primary.len()
    }

    /// Repaired wheels, then primary wheels.
    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.repaired.iter().chain(&self.primary)
    }
}

fn sort_by_file_name(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
}
