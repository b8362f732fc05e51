//! Component directories
//!
//! A component is a directory that is copied between a tresor checkout and
//! the installation root as a single unit.

use std::fmt;
use std::path::{Path, PathBuf};

/// A named component directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Component {
    Agents,
    Skills,
    Commands,
    /// Shared resources (`tresor-resources/`)
    Resources,
    /// The tresor checkout itself (`tresor/`)
    Tresor,
}

impl Component {
    /// Components copied by the installer and mirrored by `tresor backup`
    pub const CORE: [Component; 3] = [Component::Agents, Component::Skills, Component::Commands];

    /// Components refreshed by a full update
    pub const UPDATABLE: [Component; 4] = [
        Component::Agents,
        Component::Skills,
        Component::Commands,
        Component::Resources,
    ];

    /// Directory name relative to a checkout or installation root
    pub fn dir_name(self) -> &'static str {
        match self {
            Component::Agents => "agents",
            Component::Skills => "skills",
            Component::Commands => "commands",
            Component::Resources => "tresor-resources",
            Component::Tresor => "tresor",
        }
    }

    /// Absolute path of this component under `base`
    pub fn path_in(self, base: &Path) -> PathBuf {
        base.join(self.dir_name())
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Which categories an update touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateScope {
    #[default]
    All,
    CommandsOnly,
    AgentsOnly,
    ResourcesOnly,
}

impl UpdateScope {
    pub fn components(self) -> Vec<Component> {
        match self {
            UpdateScope::All => Component::UPDATABLE.to_vec(),
            UpdateScope::CommandsOnly => vec![Component::Commands],
            UpdateScope::AgentsOnly => vec![Component::Agents],
            UpdateScope::ResourcesOnly => vec![Component::Resources],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UpdateScope::All => "all components",
            UpdateScope::CommandsOnly => "commands only",
            UpdateScope::AgentsOnly => "agents only",
            UpdateScope::ResourcesOnly => "resources only",
        }
    }
}
