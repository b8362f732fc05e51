//! Update command implementation
//!
//! Besides the update itself this command hosts the two maintenance modes
//! `--rollback` and `--cleanup`, which never touch the network.

use crate::cli::UpdateArgs;
use crate::error::Result;
use crate::layout::Layout;
use crate::operations::{
    CleanupOperation, RollbackOperation, UpdateOperation, UpdateOptions, UpdateOutcome,
};
use crate::ui::{InteractiveProgressReporter, ProgressReporter, SilentProgressReporter, log};

impl From<&UpdateArgs> for UpdateOptions {
    fn from(args: &UpdateArgs) -> Self {
        Self {
            check: args.check,
            force: args.force,
            skip_backup: args.skip_backup,
            scope: args.scope(),
            remote: args.remote.clone(),
            branch: args.branch.clone(),
        }
    }
}

/// Run update command
pub fn run(layout: &Layout, args: UpdateArgs) -> Result<()> {
    if args.rollback {
        return rollback(layout);
    }
    if args.cleanup {
        return cleanup(layout);
    }

    let options = UpdateOptions::from(&args);
    log::debug(format!("Update scope: {}", options.scope.label()));

    let outcome = if options.check {
        UpdateOperation::new(layout, options).execute(&mut SilentProgressReporter)?
    } else {
        let mut progress = InteractiveProgressReporter::new();
        UpdateOperation::new(layout, options)
            .execute(&mut progress)
            .inspect_err(|_| progress.abandon())?
    };

    match outcome {
        UpdateOutcome::CheckedUpToDate { target } | UpdateOutcome::AlreadyUpToDate { target } => {
            log::success(format!("Already up to date with {target}"));
            Ok(())
        }
        UpdateOutcome::UpdatesAvailable(status) => {
            log::info(format!(
                "{} new commit{} on {}:",
                status.pending.len(),
                if status.pending.len() == 1 { "" } else { "s" },
                status.target
            ));
            for commit in &status.pending {
                println!("  {} {}", commit.id, commit.summary);
            }
            println!();
            println!("Run 'tresor update' to apply them.");
            Ok(())
        }
        UpdateOutcome::Updated(summary) => {
            log::heading("Update summary");
            summary.report.print();
            println!();
            if let Some(version) = &summary.version {
                log::info(format!("Version: {version}"));
            }
            if let Some(backup) = &summary.backup {
                log::info(format!("Backup: {}", backup.path.display()));
            }
            if summary.report.failures() == 0 {
                log::success("Update complete");
                println!();
                println!("Next steps:");
                println!("  - Restart Claude Code to pick up the changes");
                if summary.backup.is_some() {
                    println!("  - Run 'tresor update --rollback' to undo this update");
                }
            }
            summary.report.into_result()
        }
    }
}

fn rollback(layout: &Layout) -> Result<()> {
    let summary = RollbackOperation::new(layout).execute()?;

    log::heading("Rollback summary");
    summary.report.print();
    println!();
    if summary.report.failures() == 0 {
        log::success(format!("Restored {}", summary.snapshot.name));
    }
    summary.report.into_result()
}

fn cleanup(layout: &Layout) -> Result<()> {
    let removed = CleanupOperation::new(layout).execute()?;

    if removed.is_empty() {
        log::info("No old backups to remove");
    } else {
        for snapshot in &removed {
            log::debug(format!("Removed {}", snapshot.path.display()));
        }
        log::success(format!(
            "Removed {} old backup{}",
            removed.len(),
            if removed.len() == 1 { "" } else { "s" }
        ));
    }
    Ok(())
}
