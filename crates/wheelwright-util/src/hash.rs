//! SHA-256 digests of built artifacts.

use std::fmt;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::UtilError;

/// Size and SHA-256 digest of a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigest {
    /// Lowercase hex SHA-256.
    pub sha256: String,
    /// Size in bytes.
    pub size: u64,
}

impl fmt::Display for FileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sha256={} ({} bytes)", self.sha256, self.size)
    }
}

/// Compute the SHA-256 hex digest of a byte slice.
pub fn sha256_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Digest a file using streaming reads.
///
/// Uses a 64 KiB buffer so large native wheels are never loaded whole.
///
/// # Errors
/// Returns an error if the file cannot be opened or read.
pub fn digest_file(path: &Path) -> Result<FileDigest, UtilError> {
    let io_err = |source| UtilError::Io {
        path: path.display().to_string(),
        source,
    };
    let file = std::fs::File::open(path).map_err(io_err)?;
    let mut reader = std::io::BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 64 * 1024];
    let mut size: u64 = 0;
    loop {
        let n = reader.read(&mut buf).map_err(io_err)?;
        let Some(chunk) = buf.get(..n) else {
            break;
        };
        if chunk.is_empty() {
            break;
        }
        hasher.update(chunk);
        size += chunk.len() as u64;
    }
    Ok(FileDigest {
        sha256: format!("{:x}", hasher.finalize()),
        size,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn sha256_bytes_empty() {
        assert_eq!(
            sha256_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn digest_file_matches_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let wheel = dir.path().join("demo-1.0-py3-none-any.whl");
        fs::write(&wheel, b"not really a zip").unwrap();

        let digest = digest_file(&wheel).unwrap();
        assert_eq!(digest.sha256, sha256_bytes(b"not really a zip"));
        assert_eq!(digest.size, 16);
    }

    #[test]
    fn digest_file_spans_multiple_buffers() {
        let dir = tempfile::tempdir().unwrap();
        let big = dir.path().join("big.whl");
        let data = vec![7u8; 200 * 1024];
        fs::write(&big, &data).unwrap();

        let digest = digest_file(&big).unwrap();
        assert_eq!(digest.sha256, sha256_bytes(&data));
        assert_eq!(digest.size, 200 * 1024);
    }

    #[test]
    fn digest_file_missing() {
        let err = digest_file(Path::new("/nonexistent/demo.whl")).unwrap_err();
        assert!(err.to_string().contains("cannot access"), "error was: {err}");
    }

    #[test]
    fn digest_display_includes_size() {
        let digest = FileDigest {
            sha256: "ab".to_owned(),
            size: 3,
        };
        assert_eq!(digest.to_string(), "sha256=ab (3 bytes)");
    }
}
