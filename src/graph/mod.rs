//! Frontend graph module — the structural backbone of Strata.
//!
//! Provides the graph data model, source scanning and extraction
//! pipeline, edge inference, and snapshot writing.

pub mod assembler;
pub mod builder;
pub mod persistence;
pub mod types;

pub use assembler::{assemble, infer_edges, unresolved_references, UnresolvedRef};
pub use builder::{build_graph, extract_tree, scan_sources};
pub use persistence::{write_graph, FRONTEND_GRAPH_FILE};
pub use types::{
    ApiFunction, Component, Edge, EdgeKind, Extraction, FrontendGraph, GraphStats, Hook,
    HttpMethod, TypeDef, TypeKind, GRAPH_VERSION,
};
