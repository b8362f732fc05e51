//! Markdown file counts per category, shown in install summaries

use std::path::Path;

use walkdir::WalkDir;

use super::Component;

/// Number of `.md` files per core category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkdownCounts {
    pub agents: usize,
    pub skills: usize,
    pub commands: usize,
}

impl MarkdownCounts {
    /// Count markdown files below each core component of `root`
    pub fn from_path(root: &Path) -> Self {
        MarkdownCounts {
            agents: count_markdown_files(&Component::Agents.path_in(root)),
            skills: count_markdown_files(&Component::Skills.path_in(root)),
            commands: count_markdown_files(&Component::Commands.path_in(root)),
        }
    }

    pub fn total(&self) -> usize {
        self.agents + self.skills + self.commands
    }

    pub fn format(&self) -> String {
        let parts = [
            ("agent", self.agents),
            ("skill", self.skills),
            ("command", self.commands),
        ];

        parts
            .iter()
            .map(|(name, count)| match *count {
                1 => format!("1 {name}"),
                _ => format!("{count} {name}s"),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Count `.md` files recursively; a missing directory counts as zero
pub fn count_markdown_files(dir: &Path) -> usize {
    if !dir.is_dir() {
        return 0;
    }

    WalkDir::new(dir)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
        .count()
}
