//! Project configuration, read from `.strata/config.toml`.
//!
//! Every field has a default matching the conventional web-app layout, so
//! the file is optional. A malformed file is reported and ignored.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::Result;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrataConfig {
    pub generator: GeneratorConfig,
    pub verifier: VerifierConfig,
}

/// Where the frontend sources live and where the snapshot goes.
///
/// Paths other than `source_root` and `output_dir` are relative to
/// `source_root`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub source_root: PathBuf,
    pub output_dir: PathBuf,
    /// Declarations file, or a directory of declaration files.
    pub types_path: PathBuf,
    pub api_dir: PathBuf,
    /// Infrastructure files inside `api_dir` that hold no API functions.
    pub api_excluded_files: Vec<String>,
    pub hooks_dir: PathBuf,
    pub components_dir: PathBuf,
    pub component_extensions: Vec<String>,
    /// File stem suffixes (e.g. `.test`) that never count as source.
    pub ignored_suffixes: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("src/web/src"),
            output_dir: PathBuf::from("tools/graph"),
            types_path: PathBuf::from("services/api/types.ts"),
            api_dir: PathBuf::from("services/api"),
            api_excluded_files: ["client.ts", "validators.ts", "index.ts", "types.ts"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            hooks_dir: PathBuf::from("hooks"),
            components_dir: PathBuf::from("components"),
            component_extensions: vec!["tsx".to_string(), "jsx".to_string()],
            ignored_suffixes: [".test", ".spec", ".stories"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl GeneratorConfig {
    /// Config rooted at `source_root`, everything else default.
    pub fn with_source_root(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            ..Self::default()
        }
    }

    pub fn types_path(&self) -> PathBuf {
        self.source_root.join(&self.types_path)
    }

    pub fn api_dir(&self) -> PathBuf {
        self.source_root.join(&self.api_dir)
    }

    pub fn hooks_dir(&self) -> PathBuf {
        self.source_root.join(&self.hooks_dir)
    }

    pub fn components_dir(&self) -> PathBuf {
        self.source_root.join(&self.components_dir)
    }

    /// Full path of the snapshot this generator writes.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(crate::graph::persistence::FRONTEND_GRAPH_FILE)
    }

    /// True if the file's stem ends in one of the ignored suffixes.
    pub fn is_ignored(&self, path: &Path) -> bool {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();
        self.ignored_suffixes.iter().any(|suffix| stem.ends_with(suffix.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Snapshot checked when no path is given on the command line.
    pub baseline_path: PathBuf,
    /// Backend records that intentionally have no frontend type.
    pub type_alignment_allowlist: Vec<String>,
    /// Treat a snapshot without controllers, dtos, components or hooks
    /// as unloadable.
    pub require_sections: bool,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            baseline_path: PathBuf::from("tools/graph/graph-baseline.json"),
            type_alignment_allowlist: Vec::new(),
            require_sections: false,
        }
    }
}

impl StrataConfig {
    /// Load config from `path`, falling back to defaults if the file is
    /// absent or unreadable.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed config");
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Conventional config location under a project root.
    pub fn default_path(project_root: &Path) -> PathBuf {
        project_root.join(".strata").join("config.toml")
    }

    /// Anchor relative paths at `project_root`.
    pub fn resolve(mut self, project_root: &Path) -> Self {
        let anchor = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = project_root.join(&*p);
            }
        };
        anchor(&mut self.generator.source_root);
        anchor(&mut self.generator.output_dir);
        anchor(&mut self.verifier.baseline_path);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: StrataConfig = toml::from_str(
            r#"
[generator]
source_root = "web/src"
hooks_dir = "state"

[verifier]
type_alignment_allowlist = ["InternalDto"]
require_sections = true
"#,
        )
        .unwrap();

        assert_eq!(config.generator.source_root, PathBuf::from("web/src"));
        assert_eq!(config.generator.hooks_dir, PathBuf::from("state"));
        assert_eq!(config.generator.components_dir, PathBuf::from("components"));
        assert_eq!(config.verifier.type_alignment_allowlist, vec!["InternalDto"]);
        assert!(config.verifier.require_sections);
        assert_eq!(
            config.verifier.baseline_path,
            PathBuf::from("tools/graph/graph-baseline.json")
        );
    }

    #[test]
    fn test_load_missing_and_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(StrataConfig::load(&path), StrataConfig::default());

        fs::write(&path, "generator = [not toml").unwrap();
        assert!(StrataConfig::try_load(&path).is_err());
        assert_eq!(StrataConfig::load(&path), StrataConfig::default());
    }

    #[test]
    fn test_resolve_anchors_relative_paths() {
        let config = StrataConfig::default().resolve(Path::new("/repo"));
        assert_eq!(config.generator.source_root, PathBuf::from("/repo/src/web/src"));
        assert_eq!(
            config.generator.output_path(),
            PathBuf::from("/repo/tools/graph/frontend-graph.json")
        );
        assert_eq!(
            config.generator.types_path(),
            PathBuf::from("/repo/src/web/src/services/api/types.ts")
        );
    }

    #[test]
    fn test_ignored_suffixes() {
        let config = GeneratorConfig::default();
        assert!(config.is_ignored(Path::new("components/Card.test.tsx")));
        assert!(config.is_ignored(Path::new("components/Card.stories.tsx")));
        assert!(!config.is_ignored(Path::new("components/Card.tsx")));
    }
}
