//! Hook extraction: exported `use*` accessors in the hooks directory.
//!
//! Hook names are collected across all hook files first (see
//! [`declared_hooks`]) so that hook-to-hook dependencies can be detected
//! regardless of file order.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

use super::scan::{
    after_type_section, balanced_body, contains_identifier, matching_close, string_literals,
    strip_comments, truncate_chars,
};
use crate::graph::types::Hook;

/// Characters of hook body inspected for query/mutation/key/binding.
pub const BODY_WINDOW: usize = 1500;

/// Prefix every hook name and hook file name starts with.
pub const HOOK_PREFIX: &str = "use";

static HOOK_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*export\s+(?:default\s+)?function\s+(use[A-Z0-9_$][\w$]*)\s*(?:<[^(]*>)?\s*\(")
        .expect("hook function pattern")
});

static HOOK_CONST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*export\s+const\s+(use[A-Z0-9_$][\w$]*)\s*(?::[^=]+)?=\s*(?:async\s*)?\(")
        .expect("hook const pattern")
});

static QUERY_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\buse(?:Query|Queries|InfiniteQuery|SuspenseQuery)\s*(?:<[^()]*>)?\s*\(")
        .expect("query call pattern")
});

static MUTATION_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\buseMutation\s*(?:<[^()]*>)?\s*\(").expect("mutation call pattern")
});

static KEY_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:queryKey|mutationKey)\s*:\s*\[").expect("key field pattern")
});

static LAMBDA_BINDING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:queryFn|mutationFn)\s*:\s*(?:async\s*)?(?:\([^()]*\)|[A-Za-z_$][\w$]*)\s*=>\s*(?:\{\s*(?:return\s+)?)?(?:await\s+)?([A-Za-z_$][\w$]*)\s*\(",
    )
    .expect("lambda binding pattern")
});

static BARE_BINDING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:queryFn|mutationFn)\s*:\s*([A-Za-z_$][\w$]*)\s*[,}\n]")
        .expect("bare binding pattern")
});

/// A located hook declaration.
struct Declaration<'a> {
    name: String,
    /// Entire balanced body (or expression body).
    body: &'a str,
}

/// Names of the hooks exported by `source`, in declaration order.
pub fn declared_hooks(source: &str) -> Vec<String> {
    let text = strip_comments(source);
    declarations(&text).into_iter().map(|d| d.name).collect()
}

/// Extract the hooks exported by one hook module.
///
/// `api_names` and `hook_names` are every API function and hook known to
/// the run; occurrences of either inside a body become dependencies.
pub fn extract_hooks(
    source: &str,
    path: &str,
    api_names: &BTreeSet<String>,
    hook_names: &BTreeSet<String>,
) -> BTreeMap<String, Hook> {
    let text = strip_comments(source);
    let mut hooks = BTreeMap::new();

    for decl in declarations(&text) {
        if hooks.contains_key(&decl.name) {
            continue;
        }
        let window = truncate_chars(decl.body, BODY_WINDOW);
        let dependencies = api_names
            .iter()
            .chain(hook_names.iter())
            .filter(|name| **name != decl.name && contains_identifier(decl.body, name))
            .cloned()
            .collect();

        let hook = Hook {
            path: path.to_string(),
            api_binding: api_binding(window),
            query_key: cache_key(window).or_else(|| derived_key(&decl.name)),
            uses_query: QUERY_CALL.is_match(window),
            uses_mutation: MUTATION_CALL.is_match(window),
            dependencies,
            name: decl.name.clone(),
        };
        hooks.insert(decl.name, hook);
    }

    hooks
}

fn declarations(text: &str) -> Vec<Declaration<'_>> {
    let mut found: Vec<(usize, Declaration<'_>)> = HOOK_FUNCTION
        .captures_iter(text)
        .chain(HOOK_CONST.captures_iter(text))
        .filter_map(|caps| {
            let m = caps.get(0)?;
            let body = hook_body(text, m.end() - 1)?;
            Some((
                m.start(),
                Declaration {
                    name: caps[1].to_string(),
                    body,
                },
            ))
        })
        .collect();
    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, d)| d).collect()
}

/// Body of the hook whose parameter list opens at `params_open`.
///
/// Block bodies are balanced-scanned; an arrow with an expression body
/// yields the expression text up to the end of the window.
fn hook_body(text: &str, params_open: usize) -> Option<&str> {
    let params_close = matching_close(text, params_open, b'(', b')')?;
    let mut after = params_close + 1;
    // A return annotation may itself be an object type
    if let Some(annotation) = text[after..].trim_start().strip_prefix(':') {
        after = after_type_section(text, text.len() - annotation.len(), true)?;
    }
    let brace = text[after..].find('{').map(|i| after + i);
    let arrow = text[after..].find("=>").map(|i| after + i);

    match (arrow, brace) {
        (Some(a), Some(b)) if a < b && !text[a + 2..b].trim().is_empty() => {
            Some(expression_body(text, a + 2))
        }
        (Some(a), None) => Some(expression_body(text, a + 2)),
        (_, Some(b)) => balanced_body(text, b, b'{', b'}').or_else(|| text.get(b + 1..)),
        (None, None) => None,
    }
}

/// Arrow expression body starting at `start`: ends at a top-level `;`, at
/// an unmatched closer, or before the next top-level `export`.
fn expression_body(text: &str, start: usize) -> &str {
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        match b {
            b'(' | b'{' | b'[' => depth += 1,
            b')' | b'}' | b']' => {
                depth -= 1;
                if depth < 0 {
                    return text[start..i].trim();
                }
            }
            b';' if depth == 0 => return text[start..i].trim(),
            b'\n' if depth == 0 && text[i..].trim_start().starts_with("export ") => {
                return text[start..i].trim();
            }
            _ => {}
        }
    }
    text[start..].trim()
}

/// First key-field array literal that holds string literals.
fn cache_key(window: &str) -> Option<Vec<String>> {
    KEY_FIELD.find_iter(window).find_map(|m| {
        let array = balanced_body(window, m.end() - 1, b'[', b']')?;
        let keys: Vec<String> = string_literals(array).into_iter().map(str::to_string).collect();
        (!keys.is_empty()).then_some(keys)
    })
}

/// `usePersonDetails` -> `["persondetails"]`.
fn derived_key(hook_name: &str) -> Option<Vec<String>> {
    let stem = hook_name.strip_prefix(HOOK_PREFIX)?;
    (!stem.is_empty()).then(|| vec![stem.to_lowercase()])
}

fn api_binding(window: &str) -> Option<String> {
    LAMBDA_BINDING
        .captures(window)
        .or_else(|| BARE_BINDING.captures(window))
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const USE_PEOPLE_TS: &str = r#"
import { useQuery, useMutation, useQueryClient } from '@tanstack/react-query';
import { getPerson, searchPeople, createPerson } from '@/services/api/people';

export function usePeople(params: { query?: string } = {}) {
  return useQuery({
    queryKey: ['people', 'list', params],
    queryFn: () => searchPeople(params),
  });
}

export const usePerson = (idKey?: string) =>
  useQuery<PersonDto>({
    queryKey: personKeys.detail(idKey),
    queryFn: () => getPerson(idKey!),
    enabled: !!idKey,
  });

export function useCreatePerson() {
  const queryClient = useQueryClient();
  const people = usePeople();
  return useMutation({
    mutationFn: createPerson,
    onSuccess: () => queryClient.invalidateQueries({ queryKey: ['people'] }),
  });
}

// export function useLegacy() { return useQuery({ queryFn: () => legacy() }); }

function usePrivate() {}
"#;

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn extract() -> BTreeMap<String, Hook> {
        let api = names(&["getPerson", "searchPeople", "createPerson", "getPersonPhoto"]);
        let hooks: BTreeSet<String> = declared_hooks(USE_PEOPLE_TS).into_iter().collect();
        extract_hooks(USE_PEOPLE_TS, "hooks/usePeople.ts", &api, &hooks)
    }

    #[test]
    fn test_declared_hooks() {
        assert_eq!(
            declared_hooks(USE_PEOPLE_TS),
            vec!["usePeople", "usePerson", "useCreatePerson"]
        );
    }

    #[test]
    fn test_query_hook() {
        let hooks = extract();
        let people = &hooks["usePeople"];
        assert!(people.uses_query);
        assert!(!people.uses_mutation);
        assert_eq!(people.api_binding.as_deref(), Some("searchPeople"));
        assert_eq!(people.query_key, Some(vec!["people".to_string(), "list".to_string()]));
        assert_eq!(people.dependencies, names(&["searchPeople"]));
        assert_eq!(people.path, "hooks/usePeople.ts");
    }

    #[test]
    fn test_expression_bodied_hook_and_key_fallback() {
        let hooks = extract();
        let person = &hooks["usePerson"];
        assert!(person.uses_query);
        assert_eq!(person.api_binding.as_deref(), Some("getPerson"));
        // personKeys.detail(...) is not a string array literal
        assert_eq!(person.query_key, Some(vec!["person".to_string()]));
        assert_eq!(person.dependencies, names(&["getPerson"]));
    }

    #[test]
    fn test_mutation_hook_with_hook_dependency() {
        let hooks = extract();
        let create = &hooks["useCreatePerson"];
        assert!(create.uses_mutation);
        assert!(!create.uses_query);
        assert_eq!(create.api_binding.as_deref(), Some("createPerson"));
        assert_eq!(create.query_key, Some(vec!["people".to_string()]));
        assert_eq!(create.dependencies, names(&["createPerson", "usePeople"]));
    }

    #[test]
    fn test_commented_and_private_hooks_ignored() {
        let hooks = extract();
        assert_eq!(hooks.len(), 3);
        assert!(!hooks.contains_key("useLegacy"));
        assert!(!hooks.contains_key("usePrivate"));
    }

    #[test]
    fn test_expression_body_stops_at_statement_end() {
        let src = "export const useA = () => useQuery({ queryFn: () => a() })\n\nexport function useB() { return b(); }";
        let hooks = extract_hooks(
            src,
            "hooks/useA.ts",
            &names(&["a", "b"]),
            &names(&["useA", "useB"]),
        );
        assert_eq!(hooks["useA"].dependencies, names(&["a"]));
        assert_eq!(hooks["useB"].dependencies, names(&["b"]));
    }

    #[test]
    fn test_object_return_annotation_is_not_the_body() {
        let src = r#"
export function usePersonForm(idKey: string): { save: (p: PersonDto) => Promise<void> } {
  const mutation = useMutation({
    mutationFn: (p: PersonDto) => updatePerson(idKey, p),
  });
  return { save: mutation.mutateAsync };
}

export const usePersonName = (idKey: string): UseQueryResult<string> =>
  useQuery({ queryKey: ['people', 'name'], queryFn: () => getPerson(idKey) });
"#;
        let api = names(&["updatePerson", "getPerson"]);
        let hooks = extract_hooks(src, "hooks/usePersonForm.ts", &api, &names(&[]));

        let form = &hooks["usePersonForm"];
        assert!(form.uses_mutation);
        assert_eq!(form.api_binding.as_deref(), Some("updatePerson"));
        assert_eq!(form.dependencies, names(&["updatePerson"]));

        let name = &hooks["usePersonName"];
        assert!(name.uses_query);
        assert_eq!(name.api_binding.as_deref(), Some("getPerson"));
        assert_eq!(name.dependencies, names(&["getPerson"]));
    }

    #[test]
    fn test_derived_key() {
        assert_eq!(derived_key("usePersonDetails"), Some(vec!["persondetails".to_string()]));
        assert_eq!(derived_key("use"), None);
    }
}
