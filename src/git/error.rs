//! Readable messages for libgit2 errors

use git2::{Error, ErrorClass};

/// Condense a git2 error into something a user can act on
pub fn interpret_git_error(err: &Error) -> String {
    let message = err.message().to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| message.contains(n));

    if has(&["not found", "404", "too many redirects", "authentication replays"]) {
        "Repository not found".to_string()
    } else if has(&["authentication", "credentials"]) {
        "Authentication failed".to_string()
    } else if has(&["permission denied", "access denied"]) {
        "Permission denied".to_string()
    } else if has(&["connection", "network", "timeout", "timed out", "resolve host"]) {
        "Network error".to_string()
    } else {
        match err.class() {
            ErrorClass::Http => format!("HTTP error: {}", err.message()),
            ErrorClass::Ssh => format!("SSH error: {}", err.message()),
            _ => err.message().to_string(),
        }
    }
}
