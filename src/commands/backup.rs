//! Backup command implementation

use crate::error::Result;
use crate::layout::Layout;
use crate::operations::BackupOperation;
use crate::ui::{InteractiveProgressReporter, ProgressReporter, log};

/// Run backup command
pub fn run(layout: &Layout) -> Result<()> {
    log::info(format!(
        "Backing up {} into {}",
        layout.root.display(),
        layout.source.display()
    ));

    let mut progress = InteractiveProgressReporter::new();
    let report = BackupOperation::new(layout)
        .execute(&mut progress)
        .inspect_err(|_| progress.abandon())?;

    log::heading("Backup summary");
    report.print();
    println!();

    if report.failures() == 0 {
        log::success(format!("Backed up into {}", layout.source.display()));
        println!();
        println!("Next steps:");
        println!("  - Review the changes with 'git status' and commit them");
    }

    report.into_result()
}
