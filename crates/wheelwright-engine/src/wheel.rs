//! The wheel hooks: `build_wheel` and `prepare_metadata_for_build_wheel`.

use std::path::{Path, PathBuf};

use wheelwright_builder::BuilderError;

use crate::context::{scratch_dir, BackendContext, BUILD_SCRATCH_PREFIX, UNZIP_SCRATCH_PREFIX};
use crate::error::EngineError;
use crate::select::select_artifact;

const DIST_INFO_SUFFIX: &str = ".dist-info";

/// Run the build script in `scratch` and return the wheel that belongs to
/// this project.
fn build_and_select(ctx: &BackendContext, scratch: &Path) -> Result<PathBuf, EngineError> {
    let script = ctx.build_script();
    let artifacts = script.invoke(scratch)?;
    let distribution = ctx.distribution_name();
    let wheel = select_artifact(&artifacts, &distribution).ok_or_else(|| {
        BuilderError::NoArtifactsProduced {
            output_root: script.environment(scratch).output_root().to_path_buf(),
        }
    })?;
    tracing::info!(wheel = %wheel.display(), "selected wheel");
    Ok(wheel.to_path_buf())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Build the project and copy the selected wheel into `wheel_dir`.
///
/// `metadata_dir` is the directory a frontend may pass from an earlier
/// `prepare_metadata` call. The wheel is always rebuilt, so it is only logged.
///
/// Returns the wheel's file name.
///
/// # Errors
/// Returns an error if the build fails, produces no wheel, or the wheel
/// cannot be copied.
pub fn build_wheel(
    ctx: &BackendContext,
    wheel_dir: &Path,
    metadata_dir: Option<&Path>,
) -> Result<String, EngineError> {
    ctx.log_settings("build_wheel");
    if let Some(dir) = metadata_dir {
        tracing::debug!(metadata_dir = %dir.display(), "not reusing prepared metadata");
    }

    let scratch = scratch_dir(BUILD_SCRATCH_PREFIX)?;
    let wheel = build_and_select(ctx, scratch.path())?;
    let name = file_name_of(&wheel);

    wheelwright_util::fs::ensure_dir(wheel_dir)?;
    let dest = wheel_dir.join(&name);
    wheelwright_util::fs::copy_file(&wheel, &dest)?;

    let digest = wheelwright_util::hash::digest_file(&dest)?;
    tracing::info!(wheel = %dest.display(), %digest, "wrote wheel");
    Ok(name)
}

/// Build the project and copy the `.dist-info` directory of the selected
/// wheel into `metadata_dir`.
///
/// An existing directory of the same name is replaced. Returns the name of
/// the `.dist-info` directory.
///
/// # Errors
/// Returns an error if the build fails, the wheel cannot be unpacked, or
/// [`EngineError::NoMetadataFound`] if it has no `.dist-info` directory.
pub fn prepare_metadata(ctx: &BackendContext, metadata_dir: &Path) -> Result<String, EngineError> {
    ctx.log_settings("prepare_metadata_for_build_wheel");

    let scratch = scratch_dir(BUILD_SCRATCH_PREFIX)?;
    let wheel = build_and_select(ctx, scratch.path())?;

    let unpacked = scratch_dir(UNZIP_SCRATCH_PREFIX)?;
    unzip(&wheel, unpacked.path())?;
    let dist_info = find_dist_info(unpacked.path())?
        .ok_or_else(|| EngineError::NoMetadataFound {
            wheel: wheel.clone(),
        })?;
    let name = file_name_of(&dist_info);

    wheelwright_util::fs::ensure_dir(metadata_dir)?;
    let dest = metadata_dir.join(&name);
    wheelwright_util::fs::remove_dir_all_if_exists(&dest)?;
    wheelwright_util::fs::copy_dir_all(&dist_info, &dest)?;
    tracing::info!(metadata = %dest.display(), "prepared metadata");
    Ok(name)
}

/// Extract every entry of `wheel` below `dest`.
fn unzip(wheel: &Path, dest: &Path) -> Result<(), EngineError> {
    let file = std::fs::File::open(wheel).map_err(|source| EngineError::Io {
        path: wheel.display().to_string(),
        source,
    })?;
    let wheel_error = |source| EngineError::Wheel {
        wheel: wheel.to_path_buf(),
        source,
    };
    let mut archive = zip::ZipArchive::new(file).map_err(wheel_error)?;
    archive.extract(dest).map_err(wheel_error)?;
    tracing::debug!(entries = archive.len(), "unpacked {}", wheel.display());
    Ok(())
}

/// The first `*.dist-info` directory directly under `root`, by name.
fn find_dist_info(root: &Path) -> Result<Option<PathBuf>, EngineError> {
    let io_err = |source| EngineError::Io {
        path: root.display().to_string(),
        source,
    };
    let mut found = Vec::new();
    for entry in std::fs::read_dir(root).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let is_dist_info = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(DIST_INFO_SUFFIX));
        if is_dist_info && path.is_dir() {
            found.push(path);
        }
    }
    found.sort();
    Ok(found.into_iter().next())
}
