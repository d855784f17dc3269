//! Graph builder — scans the frontend source tree and builds the graph.
//!
//! Extraction runs in a fixed order because each stage feeds the next:
//! types, then API functions, then hooks (which need API function names),
//! then components (which need hook names). Files are read one at a time;
//! a file that cannot be read is logged and skipped.

use ignore::WalkBuilder;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::assembler::assemble;
use super::persistence::timestamp;
use super::types::{Extraction, FrontendGraph};
use crate::config::GeneratorConfig;
use crate::error::{Result, StrataError};
use crate::parser::{
    declared_hooks, extract_api_functions, extract_component, extract_hooks, extract_types,
};
use crate::parser::hooks::HOOK_PREFIX;

/// Build the frontend graph for the tree described by `config`.
pub fn build_graph(config: &GeneratorConfig) -> Result<FrontendGraph> {
    let extraction = extract_tree(config)?;
    Ok(assemble(extraction, timestamp()))
}

/// Run every extractor over the tree.
///
/// The only fatal condition is a missing declarations source.
pub fn extract_tree(config: &GeneratorConfig) -> Result<Extraction> {
    let root = &config.source_root;
    info!(root = %root.display(), "scanning frontend sources");

    let types_path = config.types_path();
    if !types_path.exists() {
        return Err(StrataError::MissingInput {
            what: "type declarations",
            path: types_path,
        });
    }

    let mut extraction = Extraction::default();

    // Types
    let type_files = if types_path.is_dir() {
        scan_sources(&types_path, &["ts"], true)
    } else {
        vec![types_path.clone()]
    };
    for file in &type_files {
        let Some(source) = read_source(file) else { continue };
        let types = extract_types(&source, &label(root, file));
        merge_unique(&mut extraction.types, types, "type");
    }

    // API functions
    let excluded: BTreeSet<&str> =
        config.api_excluded_files.iter().map(String::as_str).collect();
    for file in scan_sources(&config.api_dir(), &["ts"], false) {
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if excluded.contains(file_name.as_str()) || file == types_path || config.is_ignored(&file) {
            debug!(file = %file.display(), "skipping infrastructure file");
            continue;
        }
        let Some(source) = read_source(&file) else { continue };
        merge_unique(
            &mut extraction.api_functions,
            extract_api_functions(&source, &label(root, &file)),
            "API function",
        );
    }
    let api_names: BTreeSet<String> = extraction.api_functions.keys().cloned().collect();

    // Hooks: collect every declared name first, then extract
    let hook_sources: Vec<(PathBuf, String)> =
        scan_sources(&config.hooks_dir(), &["ts", "tsx"], false)
            .into_iter()
            .filter(|file| is_hook_file(file) && !config.is_ignored(file))
            .filter_map(|file| read_source(&file).map(|source| (file, source)))
            .collect();
    let hook_names: BTreeSet<String> = hook_sources
        .iter()
        .flat_map(|(_, source)| declared_hooks(source))
        .collect();
    for (file, source) in &hook_sources {
        merge_unique(
            &mut extraction.hooks,
            extract_hooks(source, &label(root, file), &api_names, &hook_names),
            "hook",
        );
    }
    let hook_names: BTreeSet<String> = extraction.hooks.keys().cloned().collect();

    // Components
    let extensions: Vec<&str> =
        config.component_extensions.iter().map(String::as_str).collect();
    for file in scan_sources(&config.components_dir(), &extensions, true) {
        if config.is_ignored(&file) {
            continue;
        }
        let Some(source) = read_source(&file) else { continue };
        let rel = label(root, &file);
        if let Some(component) = extract_component(&source, &file, &rel, &hook_names) {
            let name = component.name.clone();
            let found = BTreeMap::from([(name, component)]);
            merge_unique(&mut extraction.components, found, "component");
        }
    }

    info!(
        types = extraction.types.len(),
        api_functions = extraction.api_functions.len(),
        hooks = extraction.hooks.len(),
        components = extraction.components.len(),
        "extraction complete"
    );
    Ok(extraction)
}

/// Source files under `dir` with one of `extensions`, sorted by path.
///
/// Respects .gitignore and skips hidden entries. A missing directory
/// yields no files.
pub fn scan_sources(dir: &Path, extensions: &[&str], recursive: bool) -> Vec<PathBuf> {
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "source directory not found, skipping");
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = WalkBuilder::new(dir)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .max_depth(if recursive { None } else { Some(1) })
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.contains(&ext))
        })
        .collect();
    files.sort();
    files
}

fn is_hook_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(HOOK_PREFIX))
}

fn read_source(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(source) => Some(source),
        Err(e) => {
            warn!(file = %path.display(), error = %e, "unreadable file skipped");
            None
        }
    }
}

/// Path of `file` relative to `root`, with forward slashes.
fn label(root: &Path, file: &Path) -> String {
    let rel = file.strip_prefix(root).unwrap_or(file);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Insert `found` into `into`; the first definition of a name wins.
fn merge_unique<T>(into: &mut BTreeMap<String, T>, found: BTreeMap<String, T>, what: &str) {
    for (name, item) in found {
        if into.contains_key(&name) {
            warn!(name = %name, kind = what, "duplicate name, keeping first definition");
            continue;
        }
        into.insert(name, item);
    }
}
