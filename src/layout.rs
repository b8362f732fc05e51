//! Installation layout
//!
//! Everything tresor reads or writes is derived from two directories:
//!
//! ```text
//! <source>/                    # tresor checkout (git working tree)
//! ├── agents/ skills/ commands/
//! ├── tresor-resources/
//! └── settings/*.json          # settings.json, tresor.config.json, ...
//!
//! <root>/                      # installation root (~/.claude)
//! ├── agents/ skills/ commands/ tresor-resources/
//! ├── tresor/                  # git clone used by `tresor update`
//! ├── settings.json
//! ├── tresor.config.json       # manifest
//! ├── .tresor.lock             # advisory lock
//! ├── backup-<YYYYMMDD-HHMMSS>/
//! └── backup-update-<YYYYMMDD-HHMMSS>/
//! ```

use std::path::{Path, PathBuf};

use crate::domain::Component;
use crate::error::{Result, TresorError};

/// Default installation directory name under `$HOME`
pub const CLAUDE_DIR: &str = ".claude";

/// Claude Code settings file
pub const SETTINGS_FILE: &str = "settings.json";

/// Manifest filename
pub const MANIFEST_FILE: &str = "tresor.config.json";

/// Plugin registry mirrored by `tresor backup`
pub const PLUGINS_FILE: &str = "installed_plugins.json";

/// Settings directory inside a checkout
pub const SETTINGS_DIR: &str = "settings";

/// Lock file for the installation root
pub const LOCK_FILE: &str = ".tresor.lock";

/// Resolved paths for one invocation
#[derive(Debug, Clone)]
pub struct Layout {
    /// Installation root (`~/.claude`)
    pub root: PathBuf,

    /// Tresor checkout
    pub source: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>, source: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            source: source.into(),
        }
    }

    /// Resolve the layout from the global CLI options
    ///
    /// The installation root defaults to `$HOME/.claude`, the checkout to the
    /// current directory. An existing checkout is canonicalised.
    pub fn resolve(claude_dir: Option<PathBuf>, source: Option<PathBuf>) -> Result<Self> {
        let root = match claude_dir {
            Some(dir) => dir,
            None => dirs::home_dir()
                .ok_or(TresorError::HomeDirUnavailable)?
                .join(CLAUDE_DIR),
        };

        let source = match source {
            Some(path) => path,
            None => std::env::current_dir().map_err(|e| TresorError::IoError {
                message: format!("Failed to get current directory: {e}"),
            })?,
        };
        let source = dunce::canonicalize(&source).unwrap_or(source);

        Ok(Self::new(root, source))
    }

    pub fn root_component(&self, component: Component) -> PathBuf {
        component.path_in(&self.root)
    }

    pub fn source_component(&self, component: Component) -> PathBuf {
        component.path_in(&self.source)
    }

    /// The git clone `tresor update` pulls into
    pub fn clone_dir(&self) -> PathBuf {
        Component::Tresor.path_in(&self.root)
    }

    pub fn clone_component(&self, component: Component) -> PathBuf {
        component.path_in(&self.clone_dir())
    }

    pub fn settings_file(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    pub fn manifest_file(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    pub fn source_settings_dir(&self) -> PathBuf {
        self.source.join(SETTINGS_DIR)
    }

    /// Manifest shipped with the checkout, if any
    ///
    /// `settings/tresor.config.json` wins over a top-level copy.
    pub fn source_manifest(&self) -> Option<PathBuf> {
        [
            self.source_settings_dir().join(MANIFEST_FILE),
            self.source.join(MANIFEST_FILE),
        ]
        .into_iter()
        .find(|p| p.is_file())
    }

    /// Installed plugin registry, if any
    pub fn plugins_file(&self) -> Option<PathBuf> {
        [
            self.root.join("plugins").join(PLUGINS_FILE),
            self.root.join(PLUGINS_FILE),
        ]
        .into_iter()
        .find(|p| p.is_file())
    }

    /// Whether the checkout holds anything installable
    pub fn source_is_checkout(&self) -> bool {
        Component::CORE
            .iter()
            .any(|c| self.source_component(*c).is_dir())
    }

    /// Whether anything a reinstall would overwrite already exists
    pub fn has_existing_install(&self) -> bool {
        Component::CORE
            .iter()
            .any(|c| self.root_component(*c).exists())
            || self.settings_file().exists()
    }
}
