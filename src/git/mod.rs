//! Git operations on the tresor clone
//!
//! This module handles:
//! - Fetching the upstream remote
//! - Comparing local HEAD with the remote tracking branch
//! - Fast-forwarding the clone
//!
//! Everything goes through libgit2; no `git` binary is needed. Only
//! fast-forwards are performed: a diverged clone is reported and left for
//! the user to sort out.

mod auth;
mod error;

use std::path::Path;

use git2::{FetchOptions, Oid, RemoteCallbacks, Repository, build::CheckoutBuilder};

use crate::error::{Result, TresorError};

pub use error::interpret_git_error;

/// A commit the clone does not have yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommit {
    pub id: String,
    pub summary: String,
}

/// Local HEAD versus the remote tracking branch
#[derive(Debug, Clone)]
pub struct UpstreamStatus {
    pub local: Oid,
    pub remote: Oid,
    /// Remote tracking ref, e.g. `origin/main`
    pub target: String,
    /// Commits reachable from `remote` but not from `local`, newest first
    pub pending: Vec<PendingCommit>,
}

impl UpstreamStatus {
    /// Nothing to pull: the remote commit is HEAD or one of its ancestors
    pub fn is_up_to_date(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Open an existing repository
pub fn open(path: &Path) -> Result<Repository> {
    Repository::open(path).map_err(|e| TresorError::GitOpenFailed {
        path: path.display().to_string(),
        reason: e.message().to_string(),
    })
}

/// Fetch `remote` using its configured refspecs
pub fn fetch(repo: &Repository, remote: &str) -> Result<()> {
    let mut git_remote = repo
        .find_remote(remote)
        .map_err(|e| TresorError::GitFetchFailed {
            remote: remote.to_string(),
            reason: e.message().to_string(),
        })?;

    let mut callbacks = RemoteCallbacks::new();
    auth::setup_auth_callbacks(&mut callbacks);
    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(callbacks);

    git_remote
        .fetch(&[] as &[&str], Some(&mut fetch_options), None)
        .map_err(|e| TresorError::GitFetchFailed {
            remote: remote.to_string(),
            reason: interpret_git_error(&e),
        })
}

/// Compare HEAD with `refs/remotes/<remote>/<branch>`
pub fn upstream_status(repo: &Repository, remote: &str, branch: &str) -> Result<UpstreamStatus> {
    let local = head_oid(repo)?;
    let target = format!("{remote}/{branch}");
    let remote_ref = format!("refs/remotes/{target}");
    let remote_oid = repo
        .refname_to_id(&remote_ref)
        .map_err(|e| TresorError::GitRefResolveFailed {
            git_ref: remote_ref.clone(),
            reason: e.message().to_string(),
        })?;

    let pending = if local == remote_oid {
        Vec::new()
    } else {
        commits_between(repo, local, remote_oid)?
    };

    Ok(UpstreamStatus {
        local,
        remote: remote_oid,
        target,
        pending,
    })
}

/// The commit HEAD points at
pub fn head_oid(repo: &Repository) -> Result<Oid> {
    repo.head()
        .and_then(|head| head.peel_to_commit())
        .map(|commit| commit.id())
        .map_err(|e| TresorError::GitRefResolveFailed {
            git_ref: "HEAD".to_string(),
            reason: e.message().to_string(),
        })
}

fn commits_between(repo: &Repository, from: Oid, to: Oid) -> Result<Vec<PendingCommit>> {
    let mut walk = repo.revwalk()?;
    walk.push(to)?;
    walk.hide(from)?;

    walk.map(|oid| -> Result<PendingCommit> {
        let commit = repo.find_commit(oid?)?;
        Ok(PendingCommit {
            id: short_id(commit.id()),
            summary: commit.summary().unwrap_or_default().to_string(),
        })
    })
    .collect()
}

/// Move the clone to the remote commit of `status`
///
/// The working tree is checked out with the safe strategy before any ref
/// moves, so local modifications in the clone abort the pull untouched.
pub fn fast_forward(repo: &Repository, status: &UpstreamStatus) -> Result<()> {
    if status.is_up_to_date() {
        return Ok(());
    }

    let pull_failed = |reason: String| TresorError::GitPullFailed {
        target: status.target.clone(),
        reason,
    };

    let is_ancestor = repo
        .graph_descendant_of(status.remote, status.local)
        .map_err(|e| pull_failed(e.message().to_string()))?;
    if !is_ancestor {
        return Err(pull_failed(
            "local history has diverged from the remote branch".to_string(),
        ));
    }

    let target = repo
        .find_commit(status.remote)
        .map_err(|e| pull_failed(e.message().to_string()))?;

    let mut checkout = CheckoutBuilder::new();
    checkout.safe();
    repo.checkout_tree(target.as_object(), Some(&mut checkout))
        .map_err(|e| pull_failed(interpret_git_error(&e)))?;

    let head = repo.head().map_err(|e| pull_failed(e.message().to_string()))?;
    if head.is_branch() {
        let mut branch_ref = head;
        branch_ref
            .set_target(status.remote, &format!("tresor: fast-forward to {}", status.target))
            .map_err(|e| pull_failed(e.message().to_string()))?;
    } else {
        repo.set_head_detached(status.remote)
            .map_err(|e| pull_failed(e.message().to_string()))?;
    }

    Ok(())
}

/// Abbreviated commit id
pub fn short_id(oid: Oid) -> String {
    let full = oid.to_string();
    full[..7.min(full.len())].to_string()
}
