//! Update, rollback and cleanup operations
//!
//! The update pulls the clone at `<root>/tresor` and then replaces each
//! component directory in scope with the clone's copy. Rollback and cleanup
//! only work on the backup snapshots in the installation root.

use chrono::{Local, Utc};
use git2::Repository;

use crate::common::fs::CopyOptions;
use crate::domain::UpdateScope;
use crate::error::{Result, TresorError};
use crate::git::{self, UpstreamStatus};
use crate::layout::{Layout, MANIFEST_FILE, SETTINGS_DIR, SETTINGS_FILE};
use crate::lock::InstallGuard;
use crate::manifest::Manifest;
use crate::report::{CopyOutcome, SyncReport};
use crate::snapshot::{self, Snapshot, SnapshotKind};
use crate::ui::ProgressReporter;
use crate::ui::log;

use super::sync::replace_component;

/// Options for an update
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    /// Only report whether updates exist
    pub check: bool,
    /// Copy even when the clone is already up to date
    pub force: bool,
    pub skip_backup: bool,
    pub scope: UpdateScope,
    pub remote: String,
    pub branch: String,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            check: false,
            force: false,
            skip_backup: false,
            scope: UpdateScope::All,
            remote: "origin".to_string(),
            branch: "main".to_string(),
        }
    }
}

/// What an update did
#[derive(Debug)]
pub enum UpdateOutcome {
    /// `--check`: nothing pending
    CheckedUpToDate { target: String },
    /// `--check`: commits are pending
    UpdatesAvailable(UpstreamStatus),
    /// Nothing pending and not forced; nothing was written
    AlreadyUpToDate { target: String },
    Updated(UpdateSummary),
}

#[derive(Debug)]
pub struct UpdateSummary {
    pub status: UpstreamStatus,
    pub backup: Option<Snapshot>,
    pub report: SyncReport,
    pub version: Option<String>,
}

/// Pull the clone and refresh the installed components from it
pub struct UpdateOperation<'a> {
    layout: &'a Layout,
    options: UpdateOptions,
}

impl<'a> UpdateOperation<'a> {
    pub fn new(layout: &'a Layout, options: UpdateOptions) -> Self {
        Self { layout, options }
    }

    pub fn execute(&self, progress: &mut dyn ProgressReporter) -> Result<UpdateOutcome> {
        let layout = self.layout;
        let repo = open_clone(layout)?;
        let options = &self.options;

        let _guard = if options.check {
            None
        } else {
            Some(InstallGuard::acquire(&layout.root)?)
        };

        log::info(format!("Fetching {}...", options.remote));
        git::fetch(&repo, &options.remote)?;
        let status = git::upstream_status(&repo, &options.remote, &options.branch)?;
        log::debug(format!(
            "HEAD {} vs {} {}",
            git::short_id(status.local),
            status.target,
            git::short_id(status.remote)
        ));

        if options.check {
            return Ok(if status.is_up_to_date() {
                UpdateOutcome::CheckedUpToDate {
                    target: status.target,
                }
            } else {
                UpdateOutcome::UpdatesAvailable(status)
            });
        }

        if status.is_up_to_date() && !options.force {
            return Ok(UpdateOutcome::AlreadyUpToDate {
                target: status.target,
            });
        }

        // Parse before anything is overwritten
        let installed_manifest = Manifest::load(&layout.manifest_file())?;

        let components = options.scope.components();
        let backup = if options.skip_backup {
            None
        } else {
            let mut items: Vec<&str> = components.iter().map(|c| c.dir_name()).collect();
            items.extend([SETTINGS_FILE, MANIFEST_FILE]);
            let snapshot = snapshot::create(&layout.root, SnapshotKind::Update, &items, Local::now())?;
            log::info(format!("Backed up to {}", snapshot.path.display()));
            Some(snapshot)
        };

        git::fast_forward(&repo, &status)?;
        if !status.is_up_to_date() {
            log::success(format!(
                "Pulled {} commit{} from {}",
                status.pending.len(),
                if status.pending.len() == 1 { "" } else { "s" },
                status.target
            ));
        }

        let mut report = SyncReport::new();
        progress.start(components.len() as u64 + 1);
        for component in &components {
            progress.step(component.dir_name());
            let outcome = replace_component(
                &layout.clone_component(*component),
                &layout.root_component(*component),
                &CopyOptions::default(),
            );
            report.record(component.dir_name(), outcome);
        }

        progress.step(MANIFEST_FILE);
        let version = clone_version(layout, &repo)?;
        let mut manifest = match installed_manifest {
            Some(manifest) => manifest,
            None => {
                let mut fresh = Manifest::default();
                fresh.record_install(None, Utc::now());
                fresh
            }
        };
        manifest.set_directories(layout);
        manifest.record_update(version.clone(), Utc::now());
        let outcome = match manifest.save(&layout.manifest_file()) {
            Ok(()) => CopyOutcome::Copied { files: 1 },
            Err(e) => CopyOutcome::failed(e),
        };
        report.record(MANIFEST_FILE, outcome);
        progress.finish();

        Ok(UpdateOutcome::Updated(UpdateSummary {
            status,
            backup,
            report,
            version,
        }))
    }
}

fn open_clone(layout: &Layout) -> Result<Repository> {
    let not_installed = || TresorError::NotInstalled {
        path: layout.root.display().to_string(),
    };
    if !layout.root.is_dir() || !layout.clone_dir().is_dir() {
        return Err(not_installed());
    }
    git::open(&layout.clone_dir()).map_err(|_| not_installed())
}

/// Version of the freshly pulled clone
///
/// The clone's own manifest wins; otherwise the short commit id.
fn clone_version(layout: &Layout, repo: &Repository) -> Result<Option<String>> {
    let clone = layout.clone_dir();
    let candidates = [
        clone.join(SETTINGS_DIR).join(MANIFEST_FILE),
        clone.join(MANIFEST_FILE),
    ];

    for path in candidates.iter().filter(|p| p.is_file()) {
        match Manifest::load(path) {
            Ok(Some(Manifest {
                version: Some(version),
                ..
            })) => return Ok(Some(version)),
            Ok(_) => {}
            Err(e) => log::warn(format!("Ignoring clone manifest: {e}")),
        }
    }

    Ok(Some(git::short_id(git::head_oid(repo)?)))
}

/// What a rollback restored
#[derive(Debug)]
pub struct RollbackSummary {
    pub snapshot: Snapshot,
    pub report: SyncReport,
}

/// Restore the newest `backup-update-*` snapshot
pub struct RollbackOperation<'a> {
    layout: &'a Layout,
}

impl<'a> RollbackOperation<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self { layout }
    }

    pub fn execute(&self) -> Result<RollbackSummary> {
        let root = &self.layout.root;
        let _guard = InstallGuard::acquire(root)?;

        let snapshot = snapshot::newest(root, SnapshotKind::Update)?.ok_or_else(|| {
            TresorError::NoBackup {
                path: root.display().to_string(),
            }
        })?;
        log::info(format!("Restoring {}", snapshot.name));

        let report = snapshot::restore(&snapshot, root)?;
        Ok(RollbackSummary { snapshot, report })
    }
}

/// Prune old snapshots, keeping the newest few
pub struct CleanupOperation<'a> {
    layout: &'a Layout,
    keep: usize,
}

impl<'a> CleanupOperation<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self {
            layout,
            keep: snapshot::KEEP_BACKUPS,
        }
    }

    /// Returns the removed snapshots, oldest first
    pub fn execute(&self) -> Result<Vec<Snapshot>> {
        let _guard = InstallGuard::acquire(&self.layout.root)?;
        snapshot::cleanup(&self.layout.root, self.keep)
    }
}
