//! Picking the one wheel to hand back to the frontend.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use wheelwright_builder::ArtifactSet;

/// Choose the wheel belonging to `distribution` from a build's output.
///
/// Wheel file names may spell the distribution with hyphens or underscores,
/// so both `foo-bar-` and `foo_bar-` prefixes match.
///
/// 1. The repaired wheels, last file name first.
/// 2. All wheels, last file name first.
/// 3. Without any match: the last repaired wheel, else the last wheel overall.
///
/// Returns `None` only for an empty set.
pub fn select_artifact<'a>(artifacts: &'a ArtifactSet, distribution: &str) -> Option<&'a Path> {
    let prefixes = [
        format!("{}-", distribution.replace('_', "-")),
        format!("{}-", distribution.replace('-', "_")),
    ];
    let is_match = |path: &&PathBuf| {
        path.file_name()
            .and_then(OsStr::to_str)
            .is_some_and(|name| prefixes.iter().any(|prefix| name.starts_with(prefix)))
    };

    let mut all: Vec<&PathBuf> = artifacts.iter().collect();
    all.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let chosen = artifacts
        .repaired()
        .iter()
        .rev()
        .find(is_match)
        .or_else(|| all.iter().rev().copied().find(is_match));

    let chosen = match chosen {
        Some(path) => path,
        None => {
            let fallback = artifacts.repaired().last().or_else(|| all.last().copied())?;
            tracing::warn!(
                "no wheel named after `{distribution}`; using {}",
                fallback.display()
            );
            fallback
        }
    };
    Some(chosen.as_path())
}
