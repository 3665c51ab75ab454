//! Filesystem utilities.

use std::path::{Path, PathBuf};

use crate::error::UtilError;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> UtilError + '_ {
    move |source| UtilError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Create a directory and all parent directories if they do not exist.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> Result<(), UtilError> {
    std::fs::create_dir_all(path).map_err(io_error(path))
}

/// Copy `src` to `dest`, replacing `dest` if it exists.
///
/// Parent directories of `dest` are created as needed.
///
/// # Errors
/// Returns an error if the parent directory cannot be created or the copy fails.
pub fn copy_file(src: &Path, dest: &Path) -> Result<(), UtilError> {
    if let Some(parent) = dest.parent() {
        ensure_dir(parent)?;
    }
    std::fs::copy(src, dest).map_err(io_error(dest))?;
    Ok(())
}

/// Recursively copy the directory `src` to `dest`.
///
/// `dest` is created if absent; files already present in it are overwritten.
///
/// # Errors
/// Returns an error if any directory cannot be read or created, or any file
/// cannot be copied.
pub fn copy_dir_all(src: &Path, dest: &Path) -> Result<(), UtilError> {
    ensure_dir(dest)?;
    let entries = std::fs::read_dir(src).map_err(io_error(src))?;
    for entry in entries {
        let entry = entry.map_err(io_error(src))?;
        let path = entry.path();
        let target = dest.join(entry.file_name());
        if path.is_dir() {
            copy_dir_all(&path, &target)?;
        } else {
            std::fs::copy(&path, &target).map_err(io_error(&target))?;
        }
    }
    Ok(())
}

/// Remove a directory and all its contents. No error if the directory is absent.
///
/// # Errors
/// Returns an error if the directory exists but cannot be removed.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<(), UtilError> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(UtilError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}

/// Collect the regular files directly inside `dir` whose name ends in `suffix`.
///
/// Results are sorted by file name. A missing `dir` yields an empty list.
///
/// # Errors
/// Returns an error if `dir` contains glob metacharacters that make the pattern
/// invalid.
pub fn collect_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>, UtilError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let escaped = glob::Pattern::escape(&dir.display().to_string());
    let pattern = format!("{escaped}/*{suffix}");
    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| UtilError::GlobPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn ensure_dir_creates_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b").join("c");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn copy_file_creates_parent_and_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src.whl");
        let dest = tmp.path().join("dist").join("src.whl");
        fs::write(&src, b"new").unwrap();
        fs::create_dir_all(dest.parent().unwrap()).unwrap();
        fs::write(&dest, b"old").unwrap();

        copy_file(&src, &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"new");
    }

    #[test]
    fn copy_dir_all_copies_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("demo-1.0.dist-info");
        fs::create_dir_all(src.join("licenses")).unwrap();
        fs::write(src.join("METADATA"), b"Name: demo\n").unwrap();
        fs::write(src.join("licenses").join("LICENSE"), b"MIT").unwrap();

        let dest = tmp.path().join("out").join("demo-1.0.dist-info");
        copy_dir_all(&src, &dest).unwrap();

        assert_eq!(fs::read(dest.join("METADATA")).unwrap(), b"Name: demo\n");
        assert_eq!(
            fs::read(dest.join("licenses").join("LICENSE")).unwrap(),
            b"MIT"
        );
    }

    #[test]
    fn remove_dir_all_if_exists_removes() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("target");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("file.txt"), b"x").unwrap();

        remove_dir_all_if_exists(&dir).unwrap();
        assert!(!dir.exists());
    }

    #[test]
    fn remove_dir_all_if_exists_absent_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        remove_dir_all_if_exists(&tmp.path().join("nonexistent")).unwrap();
    }

    #[test]
    fn collect_files_filters_and_sorts_by_name() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("b-1.0-py3-none-any.whl"), b"").unwrap();
        fs::write(tmp.path().join("a-1.0-py3-none-any.whl"), b"").unwrap();
        fs::write(tmp.path().join("a-1.0.tar.gz"), b"").unwrap();
        fs::create_dir_all(tmp.path().join("nested.whl")).unwrap();

        let files = collect_files(tmp.path(), ".whl").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a-1.0-py3-none-any.whl", "b-1.0-py3-none-any.whl"]);
    }

    #[test]
    fn collect_files_does_not_recurse() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub").join("x.whl"), b"").unwrap();

        assert!(collect_files(tmp.path(), ".whl").unwrap().is_empty());
    }

    #[test]
    fn collect_files_missing_dir_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let files = collect_files(&tmp.path().join("wheelhouse"), ".whl").unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn collect_files_tolerates_glob_characters_in_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let odd = tmp.path().join("build[1]");
        fs::create_dir_all(&odd).unwrap();
        fs::write(odd.join("x-1.0-py3-none-any.whl"), b"").unwrap();

        assert_eq!(collect_files(&odd, ".whl").unwrap().len(), 1);
    }
}
