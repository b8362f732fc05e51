//! UI/Progress presentation layer
//!
//! This module handles:
//! - Prefixed status lines ([`log`])
//! - Yes/no prompts ([`prompt`])
//! - Progress reporting over the copy steps of a sync run
//!
//! All progress reporting goes through the [`ProgressReporter`] trait so that
//! read-only runs (`update --check`) and tests can stay silent.

pub mod log;
pub mod prompt;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporter trait for sync runs
pub trait ProgressReporter {
    /// Start a run with a known number of steps
    fn start(&mut self, total_steps: u64);

    /// Show the step about to run
    fn step(&mut self, label: &str);

    /// Finish the run
    fn finish(&mut self);

    /// Abandon on error
    fn abandon(&mut self);
}

/// Interactive progress reporter with a progress bar on stderr
///
/// indicatif hides the bar when stderr is not a terminal.
#[derive(Default)]
pub struct InteractiveProgressReporter {
    pb: Option<ProgressBar>,
}

impl InteractiveProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn start(&mut self, total_steps: u64) {
        let style = ProgressStyle::default_bar()
            .template("[{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let pb = ProgressBar::new(total_steps);
        pb.set_style(style);
        self.pb = Some(pb);
    }

    fn step(&mut self, label: &str) {
        if let Some(ref pb) = self.pb {
            pb.set_message(label.to_string());
            pb.inc(1);
        }
    }

    fn finish(&mut self) {
        if let Some(pb) = self.pb.take() {
            pb.finish_and_clear();
        }
    }

    fn abandon(&mut self) {
        if let Some(pb) = self.pb.take() {
            pb.abandon();
        }
    }
}

/// No-op reporter for read-only runs and tests
#[derive(Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn start(&mut self, _total_steps: u64) {}

    fn step(&mut self, _label: &str) {}

    fn finish(&mut self) {}

    fn abandon(&mut self) {}
}
