//! Copy primitives shared by install, update and backup
//!
//! Each helper returns a [`CopyOutcome`] rather than an error so a single
//! failing component never hides what happened to the others.

use std::path::Path;

use crate::common::fs::{CopyOptions, copy_dir_recursive, copy_file, replace_dir};
use crate::hash::{TreeDigest, hash_file};
use crate::report::CopyOutcome;
use crate::ui::log;

/// Merge `from` into `to`: overwrite same-named files, keep extra files
pub fn merge_component(from: &Path, to: &Path, options: &CopyOptions) -> CopyOutcome {
    if !from.is_dir() {
        return CopyOutcome::skipped("not present in source");
    }
    if to.starts_with(from) {
        return CopyOutcome::failed("destination lies inside the source directory");
    }

    if let (Ok(src), Ok(dst)) = (TreeDigest::of(from), TreeDigest::of(to)) {
        if to.is_dir() && src.is_subset_of(&dst) {
            log::debug(format!("{} already up to date", to.display()));
            return CopyOutcome::Unchanged;
        }
    }

    match copy_dir_recursive(from, to, options) {
        Ok(files) => CopyOutcome::Copied { files },
        Err(e) => CopyOutcome::failed(e),
    }
}

/// Replace `to` wholesale with a copy of `from`
///
/// A missing `from` leaves `to` alone.
pub fn replace_component(from: &Path, to: &Path, options: &CopyOptions) -> CopyOutcome {
    if !from.is_dir() {
        return CopyOutcome::skipped("not present in source");
    }
    if to.starts_with(from) {
        return CopyOutcome::failed("destination lies inside the source directory");
    }

    if let (Ok(src), Ok(dst)) = (TreeDigest::of(from), TreeDigest::of(to)) {
        if to.is_dir() && src == dst {
            log::debug(format!("{} already identical", to.display()));
            return CopyOutcome::Unchanged;
        }
    }

    match replace_dir(from, to, options) {
        Ok(files) => CopyOutcome::Copied { files },
        Err(e) => CopyOutcome::failed(e),
    }
}

/// Copy one file unless the destination already has the same content
pub fn copy_single(from: &Path, to: &Path) -> CopyOutcome {
    if !from.is_file() {
        return CopyOutcome::skipped("not present in source");
    }

    if to.is_file() {
        if let (Ok(a), Ok(b)) = (hash_file(from), hash_file(to)) {
            if a == b {
                return CopyOutcome::Unchanged;
            }
        }
    }

    match copy_file(from, to) {
        Ok(_) => CopyOutcome::Copied { files: 1 },
        Err(e) => CopyOutcome::failed(e),
    }
}

/// Whether two files hold identical bytes
pub fn same_content(a: &Path, b: &Path) -> bool {
    match (hash_file(a), hash_file(b)) {
        (Ok(x), Ok(y)) => x == y,
        _ => false,
    }
}
