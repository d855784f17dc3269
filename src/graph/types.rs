//! Core types for the Strata frontend graph.
//!
//! Defines the four node kinds (types, API functions, hooks, components),
//! the edge kinds that connect them, and the snapshot that holds them all.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Version string written into every snapshot.
pub const GRAPH_VERSION: &str = "1.0.0";

/// The kind of an exported type declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// A structural record (`interface`), decomposed into properties.
    Interface,
    /// A `type` alias. Not decomposed.
    Type,
    /// An `enum`. Not decomposed.
    Enum,
    /// Anything an external producer wrote that we don't model.
    #[default]
    #[serde(other)]
    Other,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Interface => write!(f, "interface"),
            TypeKind::Type => write!(f, "type"),
            TypeKind::Enum => write!(f, "enum"),
            TypeKind::Other => write!(f, "other"),
        }
    }
}

/// HTTP verb inferred from an API function body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Map a client helper name (`get`, `del`, ...) to its verb.
    pub fn from_helper(name: &str) -> Option<Self> {
        match name {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "patch" => Some(HttpMethod::Patch),
            "del" | "delete" => Some(HttpMethod::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
            HttpMethod::Put => write!(f, "PUT"),
            HttpMethod::Patch => write!(f, "PATCH"),
            HttpMethod::Delete => write!(f, "DELETE"),
        }
    }
}

/// The kind of an edge (relationship) in the frontend graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Hook is bound to an API function (Hook -> ApiFunction).
    ApiBinding,
    /// Hook calls another hook (Hook -> Hook).
    DependsOn,
    /// Component invokes a hook (Component -> Hook).
    UsesHook,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::ApiBinding => write!(f, "api_binding"),
            EdgeKind::DependsOn => write!(f, "depends_on"),
            EdgeKind::UsesHook => write!(f, "uses_hook"),
        }
    }
}

/// An exported type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
    /// Property name -> raw type expression. Empty for aliases and enums.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    /// Source path relative to the scanned root.
    #[serde(default)]
    pub path: String,
}

/// An exported async function that performs one HTTP call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFunction {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    /// Route template, `unknown` when a verb was found without a path.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub method: Option<HttpMethod>,
    /// Inner type of the returned `Promise<...>`.
    #[serde(rename = "responseType", default)]
    pub response_type: String,
}

/// A `use*` state accessor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hook {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub api_binding: Option<String>,
    #[serde(default)]
    pub query_key: Option<Vec<String>>,
    #[serde(default)]
    pub uses_query: bool,
    #[serde(default)]
    pub uses_mutation: bool,
    /// Known API functions and hooks referenced in the body.
    #[serde(default)]
    pub dependencies: BTreeSet<String>,
}

/// A UI component file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub hooks_used: BTreeSet<String>,
    /// Calls `fetch`/`axios`/the shared client without going through a hook.
    #[serde(default)]
    pub api_calls_directly: bool,
}

/// A directed, typed relationship between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --[{}]--> {}", self.from, self.kind, self.to)
    }
}

/// Everything the extractors found in one run, before edges are inferred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub types: BTreeMap<String, TypeDef>,
    pub api_functions: BTreeMap<String, ApiFunction>,
    pub hooks: BTreeMap<String, Hook>,
    pub components: BTreeMap<String, Component>,
}

/// The immutable frontend graph snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontendGraph {
    pub version: String,
    pub generated_at: String,
    pub types: BTreeMap<String, TypeDef>,
    pub api_functions: BTreeMap<String, ApiFunction>,
    pub hooks: BTreeMap<String, Hook>,
    pub components: BTreeMap<String, Component>,
    pub edges: Vec<Edge>,
}

impl FrontendGraph {
    /// Node and edge counts.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            types: self.types.len(),
            api_functions: self.api_functions.len(),
            hooks: self.hooks.len(),
            components: self.components.len(),
            edges: self.edges.len(),
        }
    }

    /// True if `name` is a node in any collection.
    pub fn has_node(&self, name: &str) -> bool {
        self.types.contains_key(name)
            || self.api_functions.contains_key(name)
            || self.hooks.contains_key(name)
            || self.components.contains_key(name)
    }
}

/// Size summary of a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub types: usize,
    pub api_functions: usize,
    pub hooks: usize,
    pub components: usize,
    pub edges: usize,
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} types, {} API functions, {} hooks, {} components, {} edges",
            self.types, self.api_functions, self.hooks, self.components, self.edges
        )
    }
}
