//! Common test utilities for tresor integration tests

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use git2::{IndexAddOption, Repository, Signature};
use tempfile::TempDir;
use walkdir::WalkDir;

/// A checkout plus an installation root, both in one temp directory
#[allow(dead_code)]
pub struct TestTresor {
    pub temp: TempDir,
    /// Repository checkout (`--source`)
    pub checkout: PathBuf,
    /// Installation root (`--claude-dir`)
    pub root: PathBuf,
}

#[allow(dead_code)]
impl TestTresor {
    /// A checkout with one agent, one skill and two commands
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let checkout = temp.path().join("claude-code-tresor");
        let root = temp.path().join("home/.claude");

        let tresor = Self {
            temp,
            checkout,
            root,
        };
        tresor.write_source("agents/code-reviewer/agent.md", "# Code reviewer\n");
        tresor.write_source("skills/git/commit/SKILL.md", "# Commit skill\n");
        tresor.write_source("commands/review/pr/pr.md", "# PR review\n");
        tresor.write_source("commands/workflow/scaffold/scaffold.md", "# Scaffold\n");
        tresor.write_source("tresor-resources/prompts/refactor.md", "# Refactor prompt\n");
        tresor.write_source("settings/settings.json", "{\"theme\": \"tresor\"}\n");
        tresor.write_source("settings/tresor.config.json", "{\"version\": \"2.7.0\"}\n");
        tresor
    }

    /// `tresor` with `--claude-dir` and `--source` pointing into the temp dir
    pub fn cmd(&self) -> Command {
        self.cmd_with_source(&self.checkout)
    }

    /// `tresor` against this installation root and another checkout
    #[allow(deprecated)]
    pub fn cmd_with_source(&self, source: &Path) -> Command {
        let mut cmd = Command::cargo_bin("tresor").expect("Failed to find tresor binary");
        cmd.env_remove("TRESOR_CLAUDE_DIR")
            .env_remove("TRESOR_SOURCE")
            .env_remove("TRESOR_BRANCH")
            .arg("--claude-dir")
            .arg(&self.root)
            .arg("--source")
            .arg(source);
        cmd
    }

    pub fn write_source(&self, path: &str, content: &str) {
        write(&self.checkout.join(path), content);
    }

    pub fn write_root(&self, path: &str, content: &str) {
        write(&self.root.join(path), content);
    }

    pub fn read_root(&self, path: &str) -> String {
        std::fs::read_to_string(self.root.join(path)).expect("Failed to read file")
    }

    pub fn read_source(&self, path: &str) -> String {
        std::fs::read_to_string(self.checkout.join(path)).expect("Failed to read file")
    }

    pub fn root_exists(&self, path: &str) -> bool {
        self.root.join(path).exists()
    }

    /// Names of the snapshot directories in the installation root, sorted
    pub fn backups(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.root)
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .filter(|e| e.path().is_dir())
                    .map(|e| e.file_name().to_string_lossy().to_string())
                    .filter(|name| name.starts_with("backup-"))
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Turn the checkout into the upstream repository and clone it into
    /// `<root>/tresor`; returns the branch name
    pub fn init_upstream(&self) -> String {
        let repo = Repository::init(&self.checkout).expect("Failed to init upstream");
        commit_all(&repo, "Initial commit");

        let url = format!("file://{}", self.checkout.display());
        let clone = Repository::clone(&url, self.root.join("tresor")).expect("Failed to clone");
        let head = clone.head().expect("Clone has no HEAD");
        head.shorthand().expect("Branch name is not UTF-8").to_string()
    }

    /// Commit a change to the upstream repository
    pub fn commit_upstream(&self, path: &str, content: &str) {
        self.write_source(path, content);
        let repo = Repository::open(&self.checkout).expect("Failed to open upstream");
        commit_all(&repo, &format!("Update {path}"));
    }
}

impl Default for TestTresor {
    fn default() -> Self {
        Self::new()
    }
}

/// Path to content map of every file below `dir`, ignoring `.git` and the lock
#[allow(dead_code)]
pub fn tree_contents(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git")
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && e.file_name() != ".tresor.lock")
        .map(|e| {
            let relative = e
                .path()
                .strip_prefix(dir)
                .expect("Walked outside of dir")
                .to_string_lossy()
                .to_string();
            let content = std::fs::read(e.path()).expect("Failed to read file");
            (relative, content)
        })
        .collect()
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

fn commit_all(repo: &Repository, message: &str) {
    let mut index = repo.index().expect("Failed to open index");
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .expect("Failed to stage files");
    index.write().expect("Failed to write index");
    let tree_id = index.write_tree().expect("Failed to write tree");
    let tree = repo.find_tree(tree_id).expect("Failed to find tree");
    let sig = Signature::now("Test", "test@test.com").expect("Failed to create signature");
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<_> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("Failed to commit");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creation() {
        let tresor = TestTresor::new();
        assert!(tresor.checkout.join("agents/code-reviewer/agent.md").exists());
        assert!(!tresor.root.exists());
    }

    #[test]
    fn test_tree_contents_skips_git() {
        let tresor = TestTresor::new();
        write(&tresor.checkout.join(".git/HEAD"), "ref: refs/heads/main");
        let contents = tree_contents(&tresor.checkout);
        assert!(contents.contains_key("settings/settings.json"));
        assert!(!contents.keys().any(|k| k.starts_with(".git")));
    }
}
