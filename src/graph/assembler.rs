//! Graph assembly — turns extracted node collections into a snapshot.
//!
//! Edges are inferred purely from names. A reference whose target is not a
//! known node produces no edge; [`unresolved_references`] lists those so
//! the verifier can surface them.

use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use super::types::*;

/// Infer all edges, in deterministic order: per hook (sorted) its binding
/// then its hook dependencies, then per component (sorted) its hooks.
pub fn infer_edges(
    api_functions: &BTreeMap<String, ApiFunction>,
    hooks: &BTreeMap<String, Hook>,
    components: &BTreeMap<String, Component>,
) -> Vec<Edge> {
    let mut edges = Vec::new();

    for (name, hook) in hooks {
        if let Some(binding) = &hook.api_binding {
            if api_functions.contains_key(binding) {
                edges.push(Edge::new(name, binding, EdgeKind::ApiBinding));
            }
        }
        for dep in &hook.dependencies {
            if dep != name && hooks.contains_key(dep) {
                edges.push(Edge::new(name, dep, EdgeKind::DependsOn));
            }
        }
    }

    for (name, component) in components {
        for hook in &component.hooks_used {
            if hooks.contains_key(hook) {
                edges.push(Edge::new(name, hook, EdgeKind::UsesHook));
            }
        }
    }

    edges
}

/// Build the immutable snapshot from one run's extraction.
pub fn assemble(extraction: Extraction, generated_at: String) -> FrontendGraph {
    let edges = infer_edges(
        &extraction.api_functions,
        &extraction.hooks,
        &extraction.components,
    );
    let dropped = unresolved_references(
        &extraction.api_functions,
        &extraction.hooks,
        &extraction.components,
    );
    debug!(edges = edges.len(), unresolved = dropped.len(), "assembled graph");

    FrontendGraph {
        version: GRAPH_VERSION.to_string(),
        generated_at,
        types: extraction.types,
        api_functions: extraction.api_functions,
        hooks: extraction.hooks,
        components: extraction.components,
        edges,
    }
}

/// A name a node refers to that resolves to no node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedRef {
    pub from: String,
    pub target: String,
    pub kind: EdgeKind,
}

impl fmt::Display for UnresolvedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EdgeKind::ApiBinding => write!(f, "bound to unknown API function '{}'", self.target),
            EdgeKind::DependsOn => write!(f, "depends on unknown hook '{}'", self.target),
            EdgeKind::UsesHook => write!(f, "uses unknown hook '{}'", self.target),
        }
    }
}

/// Hook bindings and component hook uses that name no known node.
///
/// Hook dependencies are not listed: they are drawn from known names by
/// construction, and API-function dependencies legitimately produce no
/// hook-to-hook edge.
pub fn unresolved_references(
    api_functions: &BTreeMap<String, ApiFunction>,
    hooks: &BTreeMap<String, Hook>,
    components: &BTreeMap<String, Component>,
) -> Vec<UnresolvedRef> {
    let mut unresolved = Vec::new();

    for (name, hook) in hooks {
        if let Some(binding) = &hook.api_binding {
            if !api_functions.contains_key(binding) {
                unresolved.push(UnresolvedRef {
                    from: name.clone(),
                    target: binding.clone(),
                    kind: EdgeKind::ApiBinding,
                });
            }
        }
    }

    for (name, component) in components {
        for hook in &component.hooks_used {
            if !hooks.contains_key(hook) {
                unresolved.push(UnresolvedRef {
                    from: name.clone(),
                    target: hook.clone(),
                    kind: EdgeKind::UsesHook,
                });
            }
        }
    }

    unresolved
}
