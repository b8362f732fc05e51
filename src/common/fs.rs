//! Common file system operations

use std::fs;
use std::path::Path;

#[derive(Default, Clone)]
pub struct CopyOptions {
    pub exclude: Vec<String>,
}

impl CopyOptions {
    pub fn exclude_git() -> Self {
        Self {
            exclude: vec![".git".to_string()],
        }
    }

    fn is_excluded(&self, file_name: &std::ffi::OsStr) -> bool {
        self.exclude
            .iter()
            .any(|excluded| file_name.to_str() == Some(excluded.as_str()))
    }
}

/// Copy a directory recursively, merging into `dst`
///
/// Same-named files are overwritten, files only present in `dst` are kept.
/// Returns the number of files copied.
pub fn copy_dir_recursive<P1, P2>(src: P1, dst: P2, options: &CopyOptions) -> std::io::Result<usize>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    let src_ref = src.as_ref();
    let dst_ref = dst.as_ref();

    if !dst_ref.exists() {
        fs::create_dir_all(dst_ref)?;
    }

    let mut copied = 0;
    for entry in fs::read_dir(src_ref)? {
        let entry = entry?;
        let entry_path = entry.path();
        let file_name = entry.file_name();

        if options.is_excluded(&file_name) {
            continue;
        }

        let dst_path = dst_ref.join(&file_name);

        if entry_path.is_dir() {
            copied += copy_dir_recursive(&entry_path, &dst_path, options)?;
        } else {
            fs::copy(&entry_path, &dst_path)?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Replace `dst` with a fresh copy of `src`
///
/// The copy is staged in a temporary directory next to `dst` and renamed
/// into place, so `dst` is either the old tree or the complete new one.
/// Returns the number of files copied.
pub fn replace_dir(src: &Path, dst: &Path, options: &CopyOptions) -> std::io::Result<usize> {
    let parent = dst.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let staging = tempfile::Builder::new()
        .prefix(".tresor-staging-")
        .tempdir_in(parent)?;
    let staged = staging.path().join("new");
    let copied = copy_dir_recursive(src, &staged, options)?;

    swap_dir(&staged, dst, &staging.path().join("old"))?;
    Ok(copied)
}

/// Move `staged` to `dst`, parking the current `dst` at `old`
///
/// If the second rename fails the parked tree is moved back.
fn swap_dir(staged: &Path, dst: &Path, old: &Path) -> std::io::Result<()> {
    if !dst.exists() {
        return fs::rename(staged, dst);
    }
    fs::rename(dst, old)?;
    fs::rename(staged, dst).inspect_err(|_| {
        let _ = fs::rename(old, dst);
    })
}

/// Copy a single file, creating parent directories of `dst`
pub fn copy_file(src: &Path, dst: &Path) -> std::io::Result<u64> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst)
}
