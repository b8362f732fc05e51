//! Backup operation
//!
//! Mirrors the installation root back into the repository checkout so local
//! edits can be committed. Nothing is prompted; anything missing from the
//! root is reported as skipped.

use std::fs;

use crate::common::fs::CopyOptions;
use crate::domain::Component;
use crate::error::{Result, TresorError};
use crate::layout::{Layout, MANIFEST_FILE, PLUGINS_FILE, SETTINGS_FILE};
use crate::lock::InstallGuard;
use crate::report::{CopyOutcome, SyncReport};
use crate::ui::ProgressReporter;

use super::sync::{copy_single, replace_component};

/// Copy the installation root into the checkout
pub struct BackupOperation<'a> {
    layout: &'a Layout,
}

impl<'a> BackupOperation<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self { layout }
    }

    pub fn execute(&self, progress: &mut dyn ProgressReporter) -> Result<SyncReport> {
        let layout = self.layout;
        if !layout.source.is_dir() {
            return Err(TresorError::SourceInvalid {
                path: layout.source.display().to_string(),
            });
        }
        let _guard = InstallGuard::acquire(&layout.root)?;

        let mut report = SyncReport::new();
        progress.start(Component::CORE.len() as u64 + 5);

        for component in Component::CORE {
            progress.step(component.dir_name());
            let from = layout.root_component(component);
            let outcome = if from.is_dir() {
                replace_component(&from, &layout.source_component(component), &CopyOptions::default())
            } else {
                CopyOutcome::skipped("not present in installation")
            };
            report.record(component.dir_name(), outcome);
        }

        let settings_dir = layout.source_settings_dir();
        if let Err(e) = fs::create_dir_all(&settings_dir) {
            return Err(TresorError::FileWriteFailed {
                path: settings_dir.display().to_string(),
                reason: e.to_string(),
            });
        }

        for file in [SETTINGS_FILE, MANIFEST_FILE] {
            progress.step(file);
            report.record(file, installed_file(&layout.root.join(file), &settings_dir.join(file)));
        }

        progress.step(PLUGINS_FILE);
        let plugins = match layout.plugins_file() {
            Some(path) => copy_single(&path, &settings_dir.join(PLUGINS_FILE)),
            None => CopyOutcome::skipped("not present in installation"),
        };
        report.record(PLUGINS_FILE, plugins);

        for component in [Component::Tresor, Component::Resources] {
            progress.step(component.dir_name());
            let from = layout.root_component(component);
            let outcome = if from.is_dir() {
                replace_component(&from, &layout.source_component(component), &CopyOptions::exclude_git())
            } else {
                CopyOutcome::skipped("not present in installation")
            };
            report.record(component.dir_name(), outcome);
        }

        progress.finish();
        Ok(report)
    }
}

fn installed_file(from: &std::path::Path, to: &std::path::Path) -> CopyOutcome {
    if from.is_file() {
        copy_single(from, to)
    } else {
        CopyOutcome::skipped("not present in installation")
    }
}
