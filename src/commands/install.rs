//! Install command implementation
//!
//! Copies the checkout given by `--source` (default: current directory) into
//! the installation root and prints what changed.

use crate::cli::InstallArgs;
use crate::error::Result;
use crate::layout::Layout;
use crate::operations::{InstallOperation, InstallOptions};
use crate::ui::prompt::TerminalPrompter;
use crate::ui::{InteractiveProgressReporter, ProgressReporter, log};

impl From<&InstallArgs> for InstallOptions {
    fn from(args: &InstallArgs) -> Self {
        Self { force: args.force }
    }
}

/// Run install command
pub fn run(layout: &Layout, args: InstallArgs) -> Result<()> {
    log::info(format!(
        "Installing from {} into {}",
        layout.source.display(),
        layout.root.display()
    ));

    let prompter = TerminalPrompter;
    let mut progress = InteractiveProgressReporter::new();
    let summary = InstallOperation::new(layout, InstallOptions::from(&args), &prompter)
        .execute(&mut progress)
        .inspect_err(|_| progress.abandon())?;

    log::heading("Installation summary");
    summary.report.print();
    println!();
    log::info(format!("Installed: {}", summary.counts.format()));
    if let Some(backup) = &summary.backup {
        log::info(format!("Previous installation backed up to {}", backup.path.display()));
    }

    if summary.report.failures() == 0 {
        log::success(format!("Installed into {}", layout.root.display()));
        println!();
        println!("Next steps:");
        println!("  - Restart Claude Code to pick up the new configuration");
        println!("  - Run 'tresor update' to pull upstream changes later");
    }

    summary.report.into_result()
}
