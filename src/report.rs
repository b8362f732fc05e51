//! Per-item results of a sync run
//!
//! Every copy step records a [`CopyOutcome`] instead of swallowing errors,
//! so the summary can say exactly what happened to each target.

use console::Style;

use crate::error::{Result, TresorError};

/// What happened to a single copy target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Files were written
    Copied { files: usize },
    /// Destination already held identical content
    Unchanged,
    /// Deliberately not copied (missing source, declined prompt, ...)
    Skipped { reason: String },
    Failed { reason: String },
}

impl CopyOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        CopyOutcome::Skipped {
            reason: reason.into(),
        }
    }

    pub fn failed(reason: impl ToString) -> Self {
        CopyOutcome::Failed {
            reason: reason.to_string(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CopyOutcome::Failed { .. })
    }
}

/// One line of the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub target: String,
    pub outcome: CopyOutcome,
}

/// Ordered outcomes of one invocation
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    entries: Vec<ReportEntry>,
}

impl SyncReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, target: impl Into<String>, outcome: CopyOutcome) {
        self.entries.push(ReportEntry {
            target: target.into(),
            outcome,
        });
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn outcome_of(&self, target: &str) -> Option<&CopyOutcome> {
        self.entries
            .iter()
            .find(|e| e.target == target)
            .map(|e| &e.outcome)
    }

    pub fn failures(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_failed()).count()
    }

    pub fn files_copied(&self) -> usize {
        self.entries
            .iter()
            .map(|e| match e.outcome {
                CopyOutcome::Copied { files } => files,
                _ => 0,
            })
            .sum()
    }

    /// Turn recorded failures into an error, after the summary was shown
    pub fn into_result(self) -> Result<()> {
        match self.failures() {
            0 => Ok(()),
            failed => Err(TresorError::SyncIncomplete {
                failed,
                total: self.entries.len(),
            }),
        }
    }

    pub fn print(&self) {
        for entry in &self.entries {
            let (tag, style, detail) = match &entry.outcome {
                CopyOutcome::Copied { files } => (
                    "[COPY]",
                    Style::new().green(),
                    format!("{files} file{}", if *files == 1 { "" } else { "s" }),
                ),
                CopyOutcome::Unchanged => ("[SAME]", Style::new().dim(), "unchanged".to_string()),
                CopyOutcome::Skipped { reason } => ("[SKIP]", Style::new().yellow(), reason.clone()),
                CopyOutcome::Failed { reason } => ("[FAIL]", Style::new().red().bold(), reason.clone()),
            };
            println!(
                "  {} {} {}",
                style.apply_to(tag),
                Style::new().bold().apply_to(&entry.target),
                Style::new().dim().apply_to(format!("({detail})"))
            );
        }
    }
}
