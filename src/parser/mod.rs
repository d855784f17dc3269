//! Lexical extractors for the frontend source tree.
//!
//! One small scanning routine per construct kind. Nothing here builds a
//! syntax tree: declarations are located by pattern and their bodies are
//! carved out with the balanced-delimiter scan in [`scan`].

pub mod api;
pub mod components;
pub mod hooks;
pub mod scan;
pub mod types;

pub use api::{extract_api_functions, infer_endpoint, EndpointInference};
pub use components::extract_component;
pub use hooks::{declared_hooks, extract_hooks};
pub use types::extract_types;
