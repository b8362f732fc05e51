//! Install operation
//!
//! Copies a tresor checkout into the installation root:
//!
//! 1. snapshot what would be overwritten (`backup-<ts>`, skipped by `--force`)
//! 2. merge `agents/`, `skills/`, `commands/`
//! 3. `settings/*.json`, asking before replacing `settings.json`
//! 4. write the manifest
//! 5. merge `tresor/` and `tresor-resources/` when the checkout has them
//!
//! Stale files in the installation root are never deleted.

use std::fs;
use std::path::PathBuf;

use chrono::{Local, Utc};
use wax::{CandidatePath, Glob, Pattern};

use crate::common::fs::CopyOptions;
use crate::domain::{Component, MarkdownCounts};
use crate::error::{Result, TresorError};
use crate::layout::{Layout, MANIFEST_FILE, SETTINGS_FILE};
use crate::lock::InstallGuard;
use crate::manifest::Manifest;
use crate::report::{CopyOutcome, SyncReport};
use crate::snapshot::{self, Snapshot, SnapshotKind};
use crate::ui::ProgressReporter;
use crate::ui::log;
use crate::ui::prompt::Prompter;

use super::sync::{copy_single, merge_component, same_content};

/// Items captured by the pre-install snapshot
const BACKUP_ITEMS: [&str; 5] = ["agents", "skills", "commands", SETTINGS_FILE, MANIFEST_FILE];

/// Options for installation
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    /// Skip the snapshot and the settings confirmation
    pub force: bool,
}

/// What an install did
#[derive(Debug)]
pub struct InstallSummary {
    pub report: SyncReport,
    pub backup: Option<Snapshot>,
    pub counts: MarkdownCounts,
}

/// Install a checkout into the installation root
pub struct InstallOperation<'a> {
    layout: &'a Layout,
    options: InstallOptions,
    prompter: &'a dyn Prompter,
}

impl<'a> InstallOperation<'a> {
    pub fn new(layout: &'a Layout, options: InstallOptions, prompter: &'a dyn Prompter) -> Self {
        Self {
            layout,
            options,
            prompter,
        }
    }

    pub fn execute(&self, progress: &mut dyn ProgressReporter) -> Result<InstallSummary> {
        let layout = self.layout;
        if !layout.source_is_checkout() {
            return Err(TresorError::SourceInvalid {
                path: layout.source.display().to_string(),
            });
        }

        // Parse both manifests before anything is written
        let source_manifest = match layout.source_manifest() {
            Some(path) => Manifest::load(&path)?,
            None => None,
        };
        let installed_manifest = Manifest::load(&layout.manifest_file())?;

        fs::create_dir_all(&layout.root).map_err(|e| TresorError::FileWriteFailed {
            path: layout.root.display().to_string(),
            reason: e.to_string(),
        })?;
        let _guard = InstallGuard::acquire(&layout.root)?;

        let backup = if !self.options.force && layout.has_existing_install() {
            let snapshot = snapshot::create(&layout.root, SnapshotKind::Install, &BACKUP_ITEMS, Local::now())?;
            log::info(format!("Backed up current installation to {}", snapshot.path.display()));
            Some(snapshot)
        } else {
            None
        };

        let mut report = SyncReport::new();
        let settings_files = self.settings_files();
        progress.start((Component::CORE.len() + settings_files.len() + 3) as u64);

        for component in Component::CORE {
            progress.step(component.dir_name());
            let outcome = merge_component(
                &layout.source_component(component),
                &layout.root_component(component),
                &CopyOptions::default(),
            );
            report.record(component.dir_name(), outcome);
        }

        for file in settings_files {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            progress.step(&name);
            let outcome = self.install_settings_file(&file, &name)?;
            report.record(name, outcome);
        }

        progress.step(MANIFEST_FILE);
        let outcome = self.write_manifest(source_manifest, installed_manifest.as_ref(), &report);
        report.record(MANIFEST_FILE, outcome);

        for component in [Component::Tresor, Component::Resources] {
            progress.step(component.dir_name());
            let outcome = merge_component(
                &layout.source_component(component),
                &layout.root_component(component),
                &CopyOptions::default(),
            );
            report.record(component.dir_name(), outcome);
        }

        progress.finish();

        Ok(InstallSummary {
            report,
            backup,
            counts: MarkdownCounts::from_path(&layout.root),
        })
    }

    /// `settings/*.json` in the checkout, sorted, without the manifest
    fn settings_files(&self) -> Vec<PathBuf> {
        let dir = self.layout.source_settings_dir();
        let Ok(entries) = fs::read_dir(&dir) else {
            return Vec::new();
        };
        let Ok(glob) = Glob::new("*.json") else {
            return Vec::new();
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .filter(|p| {
                p.file_name().is_some_and(|name| {
                    name != MANIFEST_FILE && glob.is_match(CandidatePath::from(name.to_string_lossy().as_ref()))
                })
            })
            .collect();
        files.sort();
        files
    }

    fn install_settings_file(&self, file: &std::path::Path, name: &str) -> Result<CopyOutcome> {
        let target = self.layout.root.join(name);

        let needs_confirmation = name == SETTINGS_FILE
            && !self.options.force
            && target.is_file()
            && !same_content(file, &target);

        if needs_confirmation {
            let overwrite = self
                .prompter
                .confirm(&format!("Overwrite {}?", target.display()), false)?;
            if !overwrite {
                return Ok(CopyOutcome::skipped("kept existing file"));
            }
        }

        Ok(copy_single(file, &target))
    }

    /// Write the manifest, leaving it alone when a reinstall changed nothing
    fn write_manifest(
        &self,
        source: Option<Manifest>,
        installed: Option<&Manifest>,
        report: &SyncReport,
    ) -> CopyOutcome {
        let mut manifest = source.unwrap_or_default();
        manifest.set_directories(self.layout);
        manifest.record_install(installed, Utc::now());

        if let Some(existing) = installed {
            let mut unstamped = manifest.clone();
            unstamped.updated.clone_from(&existing.updated);
            if report.files_copied() == 0 && &unstamped == existing {
                return CopyOutcome::Unchanged;
            }
        }

        match manifest.save(&self.layout.manifest_file()) {
            Ok(()) => CopyOutcome::Copied { files: 1 },
            Err(e) => CopyOutcome::failed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::TreeDigest;
    use crate::ui::SilentProgressReporter;
    use crate::ui::prompt::FixedAnswer;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn checkout(temp: &TempDir) -> Layout {
        let source = temp.path().join("repo");
        write(&source.join("agents/code-reviewer/agent.md"), "# Code reviewer");
        write(&source.join("skills/git/commit/SKILL.md"), "# Commit skill");
        write(&source.join("commands/review/pr/pr.md"), "# PR review");
        write(&source.join("settings/settings.json"), r#"{"theme":"repo"}"#);
        write(&source.join("settings/tresor.config.json"), r#"{"version":"2.7.0"}"#);
        Layout::new(temp.path().join("claude"), source)
    }

    fn run(layout: &Layout, force: bool, answer: bool) -> InstallSummary {
        let prompter = FixedAnswer(answer);
        InstallOperation::new(layout, InstallOptions { force }, &prompter)
            .execute(&mut SilentProgressReporter)
            .unwrap()
    }

    #[test]
    fn test_fresh_install() {
        let temp = TempDir::new().unwrap();
        let layout = checkout(&temp);

        let summary = run(&layout, false, false);

        assert!(summary.backup.is_none());
        assert_eq!(summary.report.failures(), 0);
        assert!(layout.root.join("agents/code-reviewer/agent.md").exists());
        assert_eq!(
            fs::read_to_string(layout.settings_file()).unwrap(),
            r#"{"theme":"repo"}"#
        );
        assert_eq!(summary.counts.total(), 3);

        let manifest = Manifest::load(&layout.manifest_file()).unwrap().unwrap();
        assert_eq!(manifest.version.as_deref(), Some("2.7.0"));
        assert!(manifest.installed.is_some());
        assert_eq!(
            summary.report.outcome_of("tresor-resources"),
            Some(&CopyOutcome::skipped("not present in source"))
        );
    }

    #[test]
    fn test_invalid_source() {
        let temp = TempDir::new().unwrap();
        let layout = Layout::new(temp.path().join("claude"), temp.path().join("empty"));
        let prompter = FixedAnswer(false);
        let result = InstallOperation::new(&layout, InstallOptions::default(), &prompter)
            .execute(&mut SilentProgressReporter);
        assert!(matches!(result, Err(TresorError::SourceInvalid { .. })));
        assert!(!layout.root.exists());
    }

    #[test]
    fn test_reinstall_backs_up_prior_state() {
        let temp = TempDir::new().unwrap();
        let layout = checkout(&temp);
        run(&layout, true, false);
        write(&layout.root.join("agents/local/agent.md"), "# Local agent");
        let before = TreeDigest::of(&layout.root.join("agents")).unwrap();

        let summary = run(&layout, false, false);

        let backup = summary.backup.unwrap();
        assert_eq!(TreeDigest::of(&backup.path.join("agents")).unwrap(), before);
        assert!(backup.path.join("settings.json").exists());
        // Stale files survive a merge install
        assert!(layout.root.join("agents/local/agent.md").exists());
    }

    #[test]
    fn test_declined_settings_overwrite() {
        let temp = TempDir::new().unwrap();
        let layout = checkout(&temp);
        write(&layout.settings_file(), r#"{"theme":"mine"}"#);

        let summary = run(&layout, false, false);

        assert_eq!(
            fs::read_to_string(layout.settings_file()).unwrap(),
            r#"{"theme":"mine"}"#
        );
        assert!(matches!(
            summary.report.outcome_of(SETTINGS_FILE),
            Some(CopyOutcome::Skipped { .. })
        ));
    }

    #[test]
    fn test_accepted_settings_overwrite() {
        let temp = TempDir::new().unwrap();
        let layout = checkout(&temp);
        write(&layout.settings_file(), r#"{"theme":"mine"}"#);

        run(&layout, false, true);

        assert_eq!(
            fs::read_to_string(layout.settings_file()).unwrap(),
            r#"{"theme":"repo"}"#
        );
    }

    #[test]
    fn test_force_overwrites_settings_without_backup() {
        let temp = TempDir::new().unwrap();
        let layout = checkout(&temp);
        write(&layout.settings_file(), r#"{"theme":"mine"}"#);

        let summary = run(&layout, true, false);

        assert!(summary.backup.is_none());
        assert_eq!(
            fs::read_to_string(layout.settings_file()).unwrap(),
            r#"{"theme":"repo"}"#
        );
        assert!(snapshot::list(&layout.root).unwrap().is_empty());
    }

    #[test]
    fn test_forced_reinstall_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let layout = checkout(&temp);

        run(&layout, true, false);
        let first = TreeDigest::of(&layout.root).unwrap();
        let summary = run(&layout, true, false);
        let second = TreeDigest::of(&layout.root).unwrap();

        assert_eq!(first, second);
        assert_eq!(summary.report.files_copied(), 0);
        assert_eq!(summary.report.outcome_of(MANIFEST_FILE), Some(&CopyOutcome::Unchanged));
    }

    #[test]
    fn test_reinstall_keeps_installed_timestamp() {
        let temp = TempDir::new().unwrap();
        let layout = checkout(&temp);
        run(&layout, true, false);
        let first = Manifest::load(&layout.manifest_file()).unwrap().unwrap();

        write(&layout.source.join("commands/review/pr/pr.md"), "# PR review v2");
        run(&layout, true, false);
        let second = Manifest::load(&layout.manifest_file()).unwrap().unwrap();

        assert_eq!(first.installed, second.installed);
        assert!(second.updated >= first.updated);
    }

    #[test]
    fn test_extra_settings_files_are_copied() {
        let temp = TempDir::new().unwrap();
        let layout = checkout(&temp);
        write(&layout.source.join("settings/keybindings.json"), "[]");
        write(&layout.source.join("settings/notes.txt"), "ignored");

        run(&layout, true, false);

        assert!(layout.root.join("keybindings.json").exists());
        assert!(!layout.root.join("notes.txt").exists());
    }
}
