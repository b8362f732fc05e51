//! Error types and handling for Tresor
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Fatal conditions are variants of [`TresorError`]. Failures of individual
//! copy steps are not errors: they are recorded as
//! [`CopyOutcome::Failed`](crate::report::CopyOutcome) in the sync report and
//! only surface here as [`TresorError::SyncIncomplete`] once the summary has
//! been printed.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Tresor operations
#[derive(Error, Diagnostic, Debug)]
pub enum TresorError {
    // Installation errors
    #[error("No tresor installation found at: {path}")]
    #[diagnostic(
        code(tresor::install::not_installed),
        help("Run 'tresor install' from a tresor checkout first")
    )]
    NotInstalled { path: String },

    #[error("Not a tresor checkout: {path}")]
    #[diagnostic(
        code(tresor::install::source_invalid),
        help("The source directory must contain at least one of agents/, skills/ or commands/")
    )]
    SourceInvalid { path: String },

    #[error("Could not determine the home directory")]
    #[diagnostic(
        code(tresor::config::home_unavailable),
        help("Pass --claude-dir or set TRESOR_CLAUDE_DIR")
    )]
    HomeDirUnavailable,

    #[error("{failed} of {total} item(s) could not be synchronised")]
    #[diagnostic(
        code(tresor::sync::incomplete),
        help("See the [FAIL] lines above; restore from the backup snapshot if needed")
    )]
    SyncIncomplete { failed: usize, total: usize },

    // Backup errors
    #[error("No update backup found in: {path}")]
    #[diagnostic(
        code(tresor::backup::none),
        help("Backups are created by 'tresor update' unless --skip-backup is given")
    )]
    NoBackup { path: String },

    // Locking
    #[error("Installation already locked by another process")]
    #[diagnostic(
        code(tresor::lock::locked),
        help("Wait for the other tresor process to finish or remove the lock file manually")
    )]
    Locked,

    #[error("Failed to acquire installation lock: {reason}")]
    #[diagnostic(code(tresor::lock::failed))]
    LockFailed { reason: String },

    // Git errors
    #[error("Git operation failed: {message}")]
    #[diagnostic(code(tresor::git::operation_failed))]
    GitOperationFailed { message: String },

    #[error("Failed to open repository at '{path}': {reason}")]
    #[diagnostic(code(tresor::git::open_failed))]
    GitOpenFailed { path: String, reason: String },

    #[error("Failed to fetch from '{remote}': {reason}")]
    #[diagnostic(
        code(tresor::git::fetch_failed),
        help("Check your network connection and re-run the command")
    )]
    GitFetchFailed { remote: String, reason: String },

    #[error("Failed to resolve git ref '{git_ref}': {reason}")]
    #[diagnostic(code(tresor::git::ref_resolve_failed))]
    GitRefResolveFailed { git_ref: String, reason: String },

    #[error("Cannot fast-forward to '{target}': {reason}")]
    #[diagnostic(
        code(tresor::git::pull_failed),
        help(
            "Resolve the repository state manually (e.g. 'git -C ~/.claude/tresor status') and run the update again"
        )
    )]
    GitPullFailed { target: String, reason: String },

    // Manifest errors
    #[error("Failed to parse manifest: {path}")]
    #[diagnostic(
        code(tresor::manifest::parse_failed),
        help("tresor.config.json must contain a JSON object")
    )]
    ManifestParseFailed { path: String, reason: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(tresor::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(tresor::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("Failed to copy '{from}' to '{to}': {reason}")]
    #[diagnostic(code(tresor::fs::copy_failed))]
    CopyFailed {
        from: String,
        to: String,
        reason: String,
    },

    #[error("IO error: {message}")]
    #[diagnostic(code(tresor::fs::io_error))]
    IoError { message: String },

    // Interaction
    #[error("Failed to read confirmation: {reason}")]
    #[diagnostic(code(tresor::prompt::failed))]
    PromptFailed { reason: String },
}

impl From<std::io::Error> for TresorError {
    fn from(err: std::io::Error) -> Self {
        TresorError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for TresorError {
    fn from(err: serde_json::Error) -> Self {
        TresorError::ManifestParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<git2::Error> for TresorError {
    fn from(err: git2::Error) -> Self {
        TresorError::GitOperationFailed {
            message: err.message().to_string(),
        }
    }
}

impl From<inquire::InquireError> for TresorError {
    fn from(err: inquire::InquireError) -> Self {
        TresorError::PromptFailed {
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, TresorError>;

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_error_contains {
        ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
            #[test]
            fn $test_name() {
                let err = $err;
                let error_string = err.to_string();
                $(
                    assert!(error_string.contains($contains),
                        "Error message should contain '{}', got: {}",
                        $contains,
                        error_string
                    );
                )+
            }
        };
    }

    #[test]
    fn test_error_display() {
        let err = TresorError::NotInstalled {
            path: "/home/me/.claude".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No tresor installation found at: /home/me/.claude"
        );
    }

    #[test]
    fn test_error_code() {
        let err = TresorError::NoBackup {
            path: "/tmp".to_string(),
        };
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("tresor::backup::none".to_string())
        );
    }

    #[test]
    fn test_not_installed_has_help() {
        let err = TresorError::NotInstalled {
            path: "x".to_string(),
        };
        let help = err.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("tresor install"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let tresor_err: TresorError = io_err.into();
        assert!(matches!(tresor_err, TresorError::IoError { .. }));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("invalid json content");
        let json_err = parse_result.unwrap_err();
        let tresor_err: TresorError = json_err.into();
        assert!(matches!(tresor_err, TresorError::ManifestParseFailed { .. }));
    }

    #[test]
    fn test_git_error_conversion() {
        let git_err = git2::Error::from_str("git error");
        let tresor_err: TresorError = git_err.into();
        assert!(matches!(tresor_err, TresorError::GitOperationFailed { .. }));
    }

    test_error_contains!(
        test_locked_error,
        TresorError::Locked,
        "already locked"
    );

    test_error_contains!(
        test_sync_incomplete_error,
        TresorError::SyncIncomplete { failed: 2, total: 7 },
        "2 of 7"
    );

    test_error_contains!(
        test_pull_failed_error,
        TresorError::GitPullFailed {
            target: "origin/main".to_string(),
            reason: "histories have diverged".to_string(),
        },
        "origin/main",
        "diverged"
    );
}
