//! Snapshot persistence — writes the frontend graph as pretty JSON.
//!
//! Output is deterministic: collections are ordered maps and edges are
//! emitted in assembly order, so only `generated_at` differs between runs
//! over an unchanged tree.

use chrono::{SecondsFormat, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::types::FrontendGraph;
use crate::error::{Result, StrataError};

/// File name of the snapshot inside the output directory.
pub const FRONTEND_GRAPH_FILE: &str = "frontend-graph.json";

/// Current UTC time in the snapshot's timestamp format.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl FrontendGraph {
    /// Serialize to `path`, creating parent directories.
    ///
    /// Fails without writing if the graph has no type definitions.
    pub fn save(&self, path: &Path) -> Result<()> {
        if self.types.is_empty() {
            return Err(StrataError::NoTypes {
                path: path.to_path_buf(),
            });
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs::write(path, json)?;

        info!(path = %path.display(), stats = %self.stats(), "graph written");
        Ok(())
    }

    /// Read a snapshot previously written by [`FrontendGraph::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Write `graph` to `<output_dir>/frontend-graph.json`. Returns the path.
pub fn write_graph(graph: &FrontendGraph, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(FRONTEND_GRAPH_FILE);
    graph.save(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::{TypeDef, TypeKind, GRAPH_VERSION};
    use std::collections::BTreeMap;

    fn graph(with_type: bool) -> FrontendGraph {
        let mut types = BTreeMap::new();
        if with_type {
            types.insert(
                "IdKey".to_string(),
                TypeDef {
                    name: "IdKey".to_string(),
                    kind: TypeKind::Type,
                    properties: BTreeMap::new(),
                    path: "services/api/types.ts".to_string(),
                },
            );
        }
        FrontendGraph {
            version: GRAPH_VERSION.to_string(),
            generated_at: timestamp(),
            types,
            api_functions: BTreeMap::new(),
            hooks: BTreeMap::new(),
            components: BTreeMap::new(),
            edges: Vec::new(),
        }
    }

    #[test]
    fn test_write_creates_dirs_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("tools").join("graph");
        let g = graph(true);

        let path = write_graph(&g, &out).unwrap();
        assert_eq!(path, out.join(FRONTEND_GRAPH_FILE));

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let keys = [
            "version",
            "generated_at",
            "types",
            "api_functions",
            "hooks",
            "components",
            "edges",
        ];
        for key in keys {
            assert!(value.get(key).is_some(), "missing top-level key {}", key);
        }
        assert_eq!(FrontendGraph::load(&path).unwrap(), g);
    }

    #[test]
    fn test_refuses_graph_without_types() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_graph(&graph(false), dir.path()).unwrap_err();
        assert!(matches!(err, StrataError::NoTypes { .. }));
        assert!(!dir.path().join(FRONTEND_GRAPH_FILE).exists());
    }

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp();
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), "2025-12-28T00:00:00.000Z".len());
    }
}
