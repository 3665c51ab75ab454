//! The `build_sdist` hook.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tar::{EntryType, Header};
use wheelwright_builder::invoke::BUILD_SCRIPT;
use wheelwright_config::DESCRIPTOR_FILE;

use crate::context::BackendContext;
use crate::error::EngineError;
use crate::metadata::{LICENSE_FILE, PKG_INFO, README_FILE};

/// In-tree module that exposes the build hooks to Python frontends.
pub const BACKEND_SHIM: &str = "build_backend.py";

/// Build configuration read by the build script.
pub const BUILD_CONFIG: &str = "wheelwright.toml";

/// Project files shipped in every source archive, relative to the project
/// root. Missing files are skipped.
pub const SDIST_MEMBERS: [&str; 6] = [
    DESCRIPTOR_FILE,
    README_FILE,
    LICENSE_FILE,
    BACKEND_SHIM,
    BUILD_CONFIG,
    BUILD_SCRIPT,
];

/// Write `<name>-<version>.tar.gz` into `sdist_dir` and return its file name.
///
/// The archive holds one top-level `<name>-<version>/` directory with the
/// [`SDIST_MEMBERS`] that exist and a synthesized `PKG-INFO`. Entry modes
/// and timestamps are fixed, so the same tree always yields the same archive.
///
/// # Errors
/// Returns an error if `sdist_dir` cannot be created, a member cannot be
/// read, or the archive cannot be written.
pub fn build_sdist(ctx: &BackendContext, sdist_dir: &Path) -> Result<String, EngineError> {
    ctx.log_settings("build_sdist");

    let record = ctx.metadata();
    let base = format!("{}-{}", record.name, record.version);
    let file_name = format!("{base}.tar.gz");

    wheelwright_util::fs::ensure_dir(sdist_dir)?;
    let dest = sdist_dir.join(&file_name);

    // Written beside the destination and renamed, so a failed build never
    // leaves a truncated archive behind.
    let temp = tempfile::NamedTempFile::new_in(sdist_dir).map_err(|source| {
        EngineError::Archive {
            path: dest.clone(),
            source,
        }
    })?;

    let mut writer = TarGzWriter::new(temp.as_file(), &dest);
    writer.write_directory(&base)?;
    for member in SDIST_MEMBERS {
        let src = ctx.project_root().join(member);
        if !src.is_file() {
            tracing::debug!(member, "not in project, skipping");
            continue;
        }
        writer.write_file(&format!("{base}/{member}"), &src)?;
    }
    writer.write_bytes(&format!("{base}/{PKG_INFO}"), record.render().as_bytes())?;
    writer.finish()?;

    temp.persist(&dest).map_err(|err| EngineError::Archive {
        path: dest.clone(),
        source: err.error,
    })?;

    let digest = wheelwright_util::hash::digest_file(&dest)?;
    tracing::info!(sdist = %dest.display(), %digest, "wrote source distribution");
    Ok(file_name)
}

/// Gzipped tar writer with fixed entry modes and zero timestamps.
struct TarGzWriter<W: Write> {
    path: PathBuf,
    tar: tar::Builder<GzEncoder<W>>,
    directories: BTreeSet<String>,
}

impl<W: Write> TarGzWriter<W> {
    /// `path` is only used for error messages.
    fn new(out: W, path: &Path) -> Self {
        let tar = tar::Builder::new(GzEncoder::new(out, Compression::default()));
        Self {
            path: path.to_path_buf(),
            tar,
            directories: BTreeSet::new(),
        }
    }

    fn archive_error(&self) -> impl FnOnce(io::Error) -> EngineError + '_ {
        move |source| EngineError::Archive {
            path: self.path.clone(),
            source,
        }
    }

    fn write_directory(&mut self, directory: &str) -> Result<(), EngineError> {
        if !self.directories.insert(directory.to_owned()) {
            return Ok(());
        }
        let mut header = Header::new_gnu();
        header.set_mode(0o755);
        header.set_entry_type(EntryType::Directory);
        header.set_size(0);
        let result = self
            .tar
            .append_data(&mut header, directory, io::empty());
        result.map_err(self.archive_error())
    }

    /// Directory entries for every ancestor of `path` not yet written.
    fn write_parents(&mut self, path: &str) -> Result<(), EngineError> {
        let mut end = 0;
        while let Some(offset) = path.get(end..).and_then(|rest| rest.find('/')) {
            end += offset;
            if let Some(dir) = path.get(..end) {
                self.write_directory(dir)?;
            }
            end += 1;
        }
        Ok(())
    }

    fn write_bytes(&mut self, path: &str, bytes: &[u8]) -> Result<(), EngineError> {
        self.write_parents(path)?;
        let mut header = Header::new_gnu();
        header.set_size(bytes.len() as u64);
        header.set_mode(0o644);
        let result = self.tar.append_data(&mut header, path, Cursor::new(bytes));
        result.map_err(self.archive_error())
    }

    fn write_file(&mut self, path: &str, file: &Path) -> Result<(), EngineError> {
        self.write_parents(path)?;
        let io_err = |source| EngineError::Io {
            path: file.display().to_string(),
            source,
        };
        let metadata = std::fs::metadata(file).map_err(io_err)?;
        #[cfg(unix)]
        let executable = {
            use std::os::unix::fs::PermissionsExt;
            metadata.permissions().mode() & 0o111 != 0
        };
        #[cfg(not(unix))]
        let executable = false;

        let mut header = Header::new_gnu();
        header.set_mode(if executable { 0o755 } else { 0o644 });
        header.set_size(metadata.len());
        let reader = BufReader::new(File::open(file).map_err(io_err)?);
        let result = self.tar.append_data(&mut header, path, reader);
        result.map_err(self.archive_error())
    }

    fn finish(self) -> Result<(), EngineError> {
        let Self { path, tar, .. } = self;
        let archive_error = |source| EngineError::Archive {
            path: path.clone(),
            source,
        };
        let encoder = tar.into_inner().map_err(archive_error)?;
        encoder.finish().map_err(archive_error)?;
        Ok(())
    }
}
