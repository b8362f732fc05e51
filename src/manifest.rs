//! Manifest (`tresor.config.json`)
//!
//! Records what is installed and when. Fields tresor does not know about are
//! kept as they are when the file is rewritten.
//!
//! Invariants:
//! - `installed` is set by the first install and never changed afterwards.
//! - `updated` never moves backwards, even if the clock does.

use std::fs;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Component;
use crate::error::{Result, TresorError};
use crate::layout::Layout;

/// Manifest record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agents_dir: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills_dir: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands_dir: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources_dir: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tresor_dir: Option<String>,

    /// Unknown fields, preserved on rewrite
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Manifest {
    /// Load a manifest; a missing file is `Ok(None)`
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|e| TresorError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| TresorError::ManifestParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, content).map_err(|e| TresorError::FileWriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Point the directory fields at the installation root
    pub fn set_directories(&mut self, layout: &Layout) {
        let dir = |c: Component| layout.root_component(c).display().to_string();
        self.agents_dir = Some(dir(Component::Agents));
        self.skills_dir = Some(dir(Component::Skills));
        self.commands_dir = Some(dir(Component::Commands));
        self.resources_dir = Some(dir(Component::Resources));
        self.tresor_dir = Some(dir(Component::Tresor));
    }

    /// Stamp an install
    ///
    /// `installed` and `updated` are carried over from the manifest already
    /// present in the installation root, if any.
    pub fn record_install(&mut self, existing: Option<&Manifest>, now: DateTime<Utc>) {
        let previous_updated = existing.and_then(|m| m.updated.as_deref());
        self.installed = existing
            .and_then(|m| m.installed.clone())
            .or_else(|| Some(format_timestamp(now)));
        self.updated = Some(monotonic_timestamp(previous_updated, now));
    }

    /// Stamp an update
    ///
    /// `installed` is shifted into `lastUpdate`; `installed` itself stays.
    pub fn record_update(&mut self, version: Option<String>, now: DateTime<Utc>) {
        let previous_updated = self.updated.clone();
        self.last_update = self.installed.clone();
        self.updated = Some(monotonic_timestamp(previous_updated.as_deref(), now));
        if version.is_some() {
            self.version = version;
        }
    }
}

/// RFC 3339 timestamp in UTC with second precision
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// `now`, unless `previous` is a later valid timestamp
fn monotonic_timestamp(previous: Option<&str>, now: DateTime<Utc>) -> String {
    let previous = previous
        .and_then(|p| DateTime::parse_from_rfc3339(p).ok())
        .map(|p| p.with_timezone(&Utc));

    match previous {
        Some(p) if p > now => format_timestamp(p),
        _ => format_timestamp(now),
    }
}
