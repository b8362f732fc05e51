//! Interactive confirmation

use inquire::{Confirm, InquireError};

use crate::error::{Result, TresorError};

/// Source of yes/no answers
pub trait Prompter {
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;
}

/// Asks on the terminal; answers `default` when stdin is not a terminal
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        match Confirm::new(message)
            .with_default(default)
            .with_help_message("Press Enter to keep the default")
            .prompt()
        {
            Ok(answer) => Ok(answer),
            Err(InquireError::NotTTY) => Ok(default),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
            Err(e) => Err(TresorError::PromptFailed {
                reason: e.to_string(),
            }),
        }
    }
}

/// Always gives the same answer
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Prompter for FixedAnswer {
    fn confirm(&self, _message: &str, _default: bool) -> Result<bool> {
        Ok(self.0)
    }
}
