//! BLAKE3 content digests for component directories
//!
//! A [`TreeDigest`] maps every file below a directory to the hash of its
//! contents. Comparing digests tells whether a copy would change anything.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;
use walkdir::WalkDir;

use crate::error::{Result, TresorError};

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

/// Calculate BLAKE3 hash of a file
pub fn hash_file(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| TresorError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut reader = BufReader::new(file);
    let mut hasher = Hasher::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| TresorError::FileReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex()))
}

/// Content-addressed view of a directory tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeDigest {
    /// Relative path (`/`-separated) to file hash
    pub files: BTreeMap<String, String>,
}

impl TreeDigest {
    /// Digest every regular file below `root`, skipping `.git` directories
    ///
    /// A missing directory yields an empty digest.
    pub fn of(root: &Path) -> Result<Self> {
        let mut files = BTreeMap::new();
        if !root.is_dir() {
            return Ok(Self { files });
        }

        let walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|e| e.file_name() != ".git");

        for entry in walker {
            let entry = entry.map_err(|e| TresorError::FileReadFailed {
                path: root.display().to_string(),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            files.insert(relative, hash_file(entry.path())?);
        }

        Ok(Self { files })
    }

    /// Whether every file of `self` exists in `other` with the same content
    pub fn is_subset_of(&self, other: &TreeDigest) -> bool {
        self.files
            .iter()
            .all(|(path, hash)| other.files.get(path) == Some(hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_hash_file() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("test.txt");
        std::fs::write(&file_path, "test content").unwrap();

        let hash = hash_file(&file_path).unwrap();
        assert!(hash.starts_with(HASH_PREFIX));
    }

    #[test]
    fn test_hash_file_not_found() {
        let result = hash_file(Path::new("/nonexistent/file.txt"));
        assert!(result.is_err());
    }

    #[test]
    fn test_tree_digest_relative_paths() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("file1.md"), "content1").unwrap();
        std::fs::create_dir(temp.path().join("subdir")).unwrap();
        std::fs::write(temp.path().join("subdir/file2.md"), "content2").unwrap();

        let digest = TreeDigest::of(temp.path()).unwrap();
        let paths: Vec<_> = digest.files.keys().cloned().collect();
        assert_eq!(paths, vec!["file1.md", "subdir/file2.md"]);
    }

    #[test]
    fn test_tree_digest_skips_git() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(".git")).unwrap();
        std::fs::write(temp.path().join(".git/HEAD"), "ref").unwrap();
        std::fs::write(temp.path().join("a.md"), "a").unwrap();

        let digest = TreeDigest::of(temp.path()).unwrap();
        assert_eq!(digest.files.len(), 1);
    }

    #[test]
    fn test_tree_digest_missing_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        let digest = TreeDigest::of(&temp.path().join("missing")).unwrap();
        assert!(digest.files.is_empty());
    }

    #[test]
    fn test_subset() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        std::fs::create_dir_all(&a).unwrap();
        std::fs::create_dir_all(&b).unwrap();
        std::fs::write(a.join("x.md"), "x").unwrap();
        std::fs::write(b.join("x.md"), "x").unwrap();
        std::fs::write(b.join("extra.md"), "extra").unwrap();

        let da = TreeDigest::of(&a).unwrap();
        let db = TreeDigest::of(&b).unwrap();
        assert!(da.is_subset_of(&db));
        assert!(!db.is_subset_of(&da));

        std::fs::write(b.join("x.md"), "changed").unwrap();
        let db = TreeDigest::of(&b).unwrap();
        assert!(!da.is_subset_of(&db));
    }
}
