//! Backup snapshots inside the installation root
//!
//! The installer writes `backup-<YYYYMMDD-HHMMSS>`, the updater
//! `backup-update-<YYYYMMDD-HHMMSS>`. Two snapshots taken within the same
//! second get a `-N` counter appended.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime};

use crate::common::fs::{CopyOptions, copy_dir_recursive, copy_file, replace_dir};
use crate::error::{Result, TresorError};
use crate::report::{CopyOutcome, SyncReport};

/// Number of snapshots `update --cleanup` keeps
pub const KEEP_BACKUPS: usize = 5;

const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";
const TIMESTAMP_LEN: usize = 15;

/// Which command took the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    Install,
    Update,
}

impl SnapshotKind {
    pub fn prefix(self) -> &'static str {
        match self {
            SnapshotKind::Install => "backup-",
            SnapshotKind::Update => "backup-update-",
        }
    }
}

/// A backup directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub path: PathBuf,
    pub name: String,
    pub kind: SnapshotKind,
    pub taken_at: Option<NaiveDateTime>,
    counter: u32,
}

impl Snapshot {
    /// Parse a directory name; `None` if it is not a snapshot
    pub fn from_dir(path: PathBuf) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_string();

        let (kind, rest) = if let Some(rest) = name.strip_prefix(SnapshotKind::Update.prefix()) {
            (SnapshotKind::Update, rest)
        } else {
            (SnapshotKind::Install, name.strip_prefix(SnapshotKind::Install.prefix())?)
        };

        let (stamp, suffix) = if rest.len() >= TIMESTAMP_LEN && rest.is_char_boundary(TIMESTAMP_LEN) {
            rest.split_at(TIMESTAMP_LEN)
        } else {
            (rest, "")
        };
        let taken_at = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok();
        let counter = suffix
            .strip_prefix('-')
            .and_then(|c| c.parse().ok())
            .unwrap_or(0);

        Some(Self {
            path,
            name,
            kind,
            taken_at,
            counter,
        })
    }

    /// Oldest first; unparseable timestamps sort before everything else
    fn chronological(&self, other: &Self) -> Ordering {
        self.taken_at
            .cmp(&other.taken_at)
            .then(self.counter.cmp(&other.counter))
            .then_with(|| self.name.cmp(&other.name))
    }
}

/// All snapshots in `root`, oldest first
pub fn list(root: &Path) -> Result<Vec<Snapshot>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut snapshots: Vec<Snapshot> = fs::read_dir(root)?
        .filter_map(std::result::Result::ok)
        .filter(|e| e.path().is_dir())
        .filter_map(|e| Snapshot::from_dir(e.path()))
        .collect();

    snapshots.sort_by(Snapshot::chronological);
    Ok(snapshots)
}

/// The most recent snapshot of `kind`
pub fn newest(root: &Path, kind: SnapshotKind) -> Result<Option<Snapshot>> {
    Ok(list(root)?.into_iter().rev().find(|s| s.kind == kind))
}

/// Copy the existing `items` (names relative to `root`) into a new snapshot
///
/// Any copy failure is fatal: callers overwrite these items next.
pub fn create(root: &Path, kind: SnapshotKind, items: &[&str], now: DateTime<Local>) -> Result<Snapshot> {
    let path = unique_path(root, kind, now);
    fs::create_dir_all(&path).map_err(|e| TresorError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    for item in items {
        let from = root.join(item);
        let to = path.join(item);
        let copied = if from.is_dir() {
            copy_dir_recursive(&from, &to, &CopyOptions::default()).map(|_| ())
        } else if from.is_file() {
            copy_file(&from, &to).map(|_| ())
        } else {
            continue;
        };

        copied.map_err(|e| TresorError::CopyFailed {
            from: from.display().to_string(),
            to: to.display().to_string(),
            reason: e.to_string(),
        })?;
    }

    Snapshot::from_dir(path.clone()).ok_or_else(|| TresorError::IoError {
        message: format!("Invalid snapshot path: {}", path.display()),
    })
}

fn unique_path(root: &Path, kind: SnapshotKind, now: DateTime<Local>) -> PathBuf {
    let base = format!("{}{}", kind.prefix(), now.format(TIMESTAMP_FORMAT));
    let mut candidate = root.join(&base);
    let mut counter = 1;
    while candidate.exists() {
        candidate = root.join(format!("{base}-{counter}"));
        counter += 1;
    }
    candidate
}

/// Put the contents of `snapshot` back into `root`
///
/// Directories replace their live counterparts wholesale; files overwrite.
pub fn restore(snapshot: &Snapshot, root: &Path) -> Result<SyncReport> {
    let mut report = SyncReport::new();

    let mut entries: Vec<_> = fs::read_dir(&snapshot.path)?
        .filter_map(std::result::Result::ok)
        .collect();
    entries.sort_by_key(fs::DirEntry::file_name);

    for entry in entries {
        let name = entry.file_name().to_string_lossy().to_string();
        let from = entry.path();
        let to = root.join(&name);

        let outcome = if from.is_dir() {
            replace_dir(&from, &to, &CopyOptions::default())
                .map(|files| CopyOutcome::Copied { files })
        } else {
            copy_file(&from, &to).map(|_| CopyOutcome::Copied { files: 1 })
        };
        report.record(name, outcome.unwrap_or_else(CopyOutcome::failed));
    }

    Ok(report)
}

/// Delete all but the `keep` newest snapshots; returns what was removed
pub fn cleanup(root: &Path, keep: usize) -> Result<Vec<Snapshot>> {
    let snapshots = list(root)?;
    let excess = snapshots.len().saturating_sub(keep);

    let mut removed = Vec::with_capacity(excess);
    for snapshot in snapshots.into_iter().take(excess) {
        fs::remove_dir_all(&snapshot.path).map_err(|e| TresorError::FileWriteFailed {
            path: snapshot.path.display().to_string(),
            reason: e.to_string(),
        })?;
        removed.push(snapshot);
    }

    Ok(removed)
}
