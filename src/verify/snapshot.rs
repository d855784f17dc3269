//! Snapshot loading for verification.
//!
//! The verifier reads either a frontend graph on its own or a merged
//! baseline that also carries backend `controllers` and `dtos`. Missing
//! sections read as empty and are logged; [`Snapshot::ensure_sections`]
//! turns them into a load failure. Unknown sections are ignored.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{Result, StrataError};
use crate::graph::types::{ApiFunction, Component, GraphStats, Hook, TypeDef};

/// Sections a merged baseline is expected to carry.
pub const REQUIRED_SECTIONS: &[&str] = &["controllers", "dtos", "components", "hooks"];

/// A loaded graph snapshot, read-only for the checks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub types: BTreeMap<String, TypeDef>,
    #[serde(default)]
    pub api_functions: BTreeMap<String, ApiFunction>,
    #[serde(default)]
    pub hooks: BTreeMap<String, Hook>,
    #[serde(default)]
    pub components: BTreeMap<String, Component>,
    #[serde(default)]
    pub edges: Vec<Value>,
    #[serde(default)]
    pub controllers: BTreeMap<String, Controller>,
    #[serde(default)]
    pub dtos: BTreeMap<String, Dto>,
    /// Entries of [`REQUIRED_SECTIONS`] absent from the source document.
    #[serde(skip)]
    pub missing_sections: Vec<String>,
}

/// A backend controller, as produced by the backend graph generator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Controller {
    #[serde(default)]
    pub name: String,
    /// Controller-level route prefix.
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
    #[serde(default)]
    pub patterns: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub route: Option<String>,
}

/// A backend data-transfer record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dto {
    #[serde(default)]
    pub name: String,
    /// Property name -> type string. Values are kept raw since producers
    /// occasionally emit non-string shapes.
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
}

impl Snapshot {
    /// Load a snapshot file.
    ///
    /// Fails with [`StrataError::SnapshotNotFound`] or
    /// [`StrataError::SnapshotInvalid`]; nothing else can go wrong here.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(StrataError::SnapshotNotFound {
                path: path.to_path_buf(),
            });
        }
        let invalid = |reason: String| StrataError::SnapshotInvalid {
            path: path.to_path_buf(),
            reason,
        };
        let raw = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let snapshot = Self::from_json(&raw).map_err(|e| invalid(e.to_string()))?;
        if !snapshot.missing_sections.is_empty() {
            warn!(
                path = %path.display(),
                missing = %snapshot.missing_sections.join(", "),
                "snapshot sections missing, checks over them will pass vacuously"
            );
        }
        debug!(path = %path.display(), stats = %snapshot.stats(), "snapshot loaded");
        Ok(snapshot)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        let missing_sections = match &value {
            Value::Object(map) => REQUIRED_SECTIONS
                .iter()
                .filter(|section| !map.contains_key(**section))
                .map(|section| section.to_string())
                .collect(),
            _ => Vec::new(),
        };
        let mut snapshot: Self = serde_json::from_value(value)?;
        snapshot.missing_sections = missing_sections;
        Ok(snapshot)
    }

    /// Fail with [`StrataError::SnapshotInvalid`] if any required section
    /// was absent.
    pub fn ensure_sections(&self, path: &Path) -> Result<()> {
        if self.missing_sections.is_empty() {
            return Ok(());
        }
        Err(StrataError::SnapshotInvalid {
            path: path.to_path_buf(),
            reason: format!("missing sections: {}", self.missing_sections.join(", ")),
        })
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            types: self.types.len(),
            api_functions: self.api_functions.len(),
            hooks: self.hooks.len(),
            components: self.components.len(),
            edges: self.edges.len(),
        }
    }
}
