//! # Strata
//!
//! Structural graph of a frontend source tree, plus architectural
//! contract checks over it.
//!
//! The generator scans type declarations, API functions, `use*` hooks and
//! components, links them with typed edges and writes one deterministic
//! JSON snapshot. The verifier loads a snapshot (usually merged with a
//! backend graph) and runs a fixed list of rule checks whose outcome is
//! the process exit status.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use strata::{build_graph, write_graph, verify_file, GeneratorConfig, VerifierConfig};
//! use std::path::Path;
//!
//! let config = GeneratorConfig::with_source_root("src/web/src");
//! let graph = build_graph(&config)?;
//! let path = write_graph(&graph, Path::new("tools/graph"))?;
//!
//! let report = verify_file(&path, &VerifierConfig::default())?;
//! std::process::exit(report.exit_code());
//! # Ok::<(), strata::StrataError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod parser;
pub mod verify;

pub use config::{GeneratorConfig, StrataConfig, VerifierConfig};
pub use error::{Result, StrataError};

// Graph re-exports
pub use graph::{
    assemble, build_graph, extract_tree, write_graph, Edge, EdgeKind, FrontendGraph, GraphStats,
};

// Verification
pub use verify::{
    load_snapshot, verify_file, Severity, Snapshot, VerificationReport, Verifier, Violation,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    const TYPES_TS: &str = r#"
export type IdKey = string;

export interface PersonDto {
  idKey: IdKey;
  firstName: string;
  lastName?: string;
}

export enum Gender { Unknown, Male, Female }
"#;

    const PEOPLE_TS: &str = r#"
import { get, post } from './client';
import type { PersonDto } from './types';

export async function getPerson(idKey: string): Promise<PersonDto> {
  return get<PersonDto>(`/people/${idKey}`);
}

export async function createPerson(body: Partial<PersonDto>): Promise<PersonDto> {
  return post<PersonDto>('/people', body);
}
"#;

    const CLIENT_TS: &str = r#"
export async function get<T>(path: string): Promise<T> {
  return request<T>('GET', path);
}
"#;

    const USE_PEOPLE_TS: &str = r#"
import { useQuery, useMutation } from '@tanstack/react-query';
import { getPerson, createPerson } from '@/services/api/people';

export function usePerson(idKey: string) {
  return useQuery({
    queryKey: ['people', idKey],
    queryFn: () => getPerson(idKey),
  });
}

export function useCreatePerson() {
  const person = usePerson('');
  return useMutation({
    mutationFn: createPerson,
  });
}
"#;

    const PERSON_CARD_TSX: &str = r#"
import { usePerson } from '@/hooks/usePeople';

export function PersonCard({ idKey }: { idKey: string }) {
  const { data } = usePerson(idKey);
  return <div>{data?.firstName}</div>;
}
"#;

    const PERSON_EXPORT_TSX: &str = r#"
export function PersonExport() {
  const onClick = async () => {
    await fetch('/api/v1/people/export');
  };
  return <button onClick={onClick}>Export</button>;
}
"#;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture(root: &Path) {
        write(root, "services/api/types.ts", TYPES_TS);
        write(root, "services/api/people.ts", PEOPLE_TS);
        write(root, "services/api/client.ts", CLIENT_TS);
        write(root, "hooks/usePeople.ts", USE_PEOPLE_TS);
        write(root, "components/people/PersonCard.tsx", PERSON_CARD_TSX);
        write(root, "components/people/PersonCard.test.tsx", "export function Broken() { fetch('/x'); }");
        write(root, "components/PersonExport.tsx", PERSON_EXPORT_TSX);
    }

    #[test]
    fn test_generate_full_tree() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        let graph = build_graph(&GeneratorConfig::with_source_root(dir.path())).unwrap();

        assert_eq!(graph.types.len(), 3);
        assert_eq!(graph.types["PersonDto"].properties.len(), 3);
        assert_eq!(graph.types["PersonDto"].path, "services/api/types.ts");

        // client.ts is infrastructure
        let api: Vec<&str> = graph.api_functions.keys().map(String::as_str).collect();
        assert_eq!(api, vec!["createPerson", "getPerson"]);
        assert_eq!(
            graph.api_functions["getPerson"].endpoint.as_deref(),
            Some("/people/{idKey}")
        );

        assert_eq!(graph.hooks.len(), 2);
        assert_eq!(graph.hooks["usePerson"].api_binding.as_deref(), Some("getPerson"));
        assert!(graph.hooks["useCreatePerson"].dependencies.contains("usePerson"));

        let components: Vec<&str> = graph.components.keys().map(String::as_str).collect();
        assert_eq!(components, vec!["PersonCard", "PersonExport"]);
        assert_eq!(graph.components["PersonCard"].path, "components/people/PersonCard.tsx");

        let edges: Vec<String> = graph.edges.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            edges,
            vec![
                "useCreatePerson --[api_binding]--> createPerson",
                "useCreatePerson --[depends_on]--> usePerson",
                "usePerson --[api_binding]--> getPerson",
                "PersonCard --[uses_hook]--> usePerson",
            ]
        );
    }

    #[test]
    fn test_every_edge_resolves() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        let graph = build_graph(&GeneratorConfig::with_source_root(dir.path())).unwrap();
        for edge in &graph.edges {
            assert!(graph.has_node(&edge.from), "dangling source in {}", edge);
            assert!(graph.has_node(&edge.to), "dangling target in {}", edge);
        }
    }

    #[test]
    fn test_generation_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        let config = GeneratorConfig::with_source_root(dir.path());
        let out = dir.path().join("out");

        let first = build_graph(&config).unwrap();
        let path = write_graph(&first, &out).unwrap();
        let first_text = fs::read_to_string(&path).unwrap();

        let mut second = build_graph(&config).unwrap();
        second.generated_at = first.generated_at.clone();
        write_graph(&second, &out).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), first_text);
    }

    #[test]
    fn test_generate_then_verify() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        let graph = build_graph(&GeneratorConfig::with_source_root(dir.path())).unwrap();
        let path = write_graph(&graph, &dir.path().join("out")).unwrap();

        let report = verify_file(&path, &VerifierConfig::default()).unwrap();
        assert!(!report.passed);
        assert_eq!(report.exit_code(), 1);
        let fails: Vec<&Violation> = report
            .violations
            .iter()
            .filter(|v| v.severity == Severity::Fail)
            .collect();
        assert_eq!(fails.len(), 1);
        assert_eq!(fails[0].check_id, "hook_wrapping");
        assert_eq!(fails[0].subject, "PersonExport");
    }

    #[test]
    fn test_missing_declarations_aborts() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "hooks/usePeople.ts", USE_PEOPLE_TS);
        let err = build_graph(&GeneratorConfig::with_source_root(dir.path())).unwrap_err();
        assert!(matches!(err, StrataError::MissingInput { .. }));
    }
}
