//! UI component extraction.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;

use super::scan::{blank_string_literals, calls_identifier, contains_identifier, strip_comments};
use crate::graph::types::Component;

static EXPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*export\s+(?:default\s+)?(function|const|class)\s+([A-Za-z_$][\w$]*)")
        .expect("component export pattern")
});

// `= (`, `= async (`, `= function`, `= props =>`, `= memo(`, `= React.forwardRef<...>(`
static COMPONENT_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?::[^=\n]+)?=\s*(?:async\s*)?(?:\(|function\b|[A-Za-z_$][\w$]*\s*=>|(?:React\.)?(?:memo|forwardRef)\s*[<(])",
    )
    .expect("component value pattern")
});

// fetch(...), axios(...), axios.get(...), apiClient.post<T>(...), client.get(...)
static DIRECT_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\bfetch\s*\(",
        r"|\baxios(?:\.[A-Za-z]+)?\s*(?:<[^()]*>)?\s*\(",
        r"|\bapiClient\.[A-Za-z]+\s*(?:<[^()]*>)?\s*\(",
        r"|(?:^|[^\w$.])(?:client|api|http)\.(?:get|post|put|patch|del|delete|request)",
        r"\s*(?:<[^()]*>)?\s*\(",
    ))
    .expect("direct call pattern")
});

static NAMED_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bimport\s*\{([^}]*)\}\s*from\s*['"]([^'"]+)['"]"#).expect("named import pattern")
});

/// Verb helpers exported by the shared HTTP client module.
const CLIENT_VERBS: &[&str] = &["get", "post", "put", "patch", "del", "delete", "request"];

/// Module names that identify the shared HTTP client.
const CLIENT_MODULES: &[&str] = &["client", "apiClient", "api", "http"];

/// Extract the component defined in one file, if any.
///
/// The name comes from an exported PascalCase function, class or
/// component-valued const. Other PascalCase exports are the next choice,
/// then the file stem when that is PascalCase. Files with none of these
/// yield nothing.
pub fn extract_component(
    source: &str,
    file_path: &Path,
    path: &str,
    hook_names: &BTreeSet<String>,
) -> Option<Component> {
    let text = strip_comments(source);
    let name = component_name(&text, file_path)?;

    let code = blank_string_literals(&text);
    let hooks_used = hook_names
        .iter()
        .filter(|hook| contains_identifier(&code, hook))
        .cloned()
        .collect();

    let api_calls_directly = calls_network_directly(&text)
        || client_helpers(&text)
            .iter()
            .any(|helper| calls_identifier(&code, helper));

    Some(Component {
        name,
        path: path.to_string(),
        hooks_used,
        api_calls_directly,
    })
}

fn component_name(text: &str, file_path: &Path) -> Option<String> {
    let mut fallback = None;
    for caps in EXPORT.captures_iter(text) {
        let name = &caps[2];
        if !is_pascal_case(name) {
            continue;
        }
        let rest = &text[caps.get(0).map_or(text.len(), |m| m.end())..];
        if &caps[1] != "const" || COMPONENT_VALUE.is_match(rest) {
            return Some(name.to_string());
        }
        fallback.get_or_insert_with(|| name.to_string());
    }
    if fallback.is_some() {
        return fallback;
    }
    let stem = file_path.file_stem()?.to_str()?;
    is_pascal_case(stem).then(|| stem.to_string())
}

/// Uppercase first letter and at least one lowercase letter: `PeopleTable`,
/// `UIButton`, but not `PAGE_SIZE` or `COLUMNS`.
fn is_pascal_case(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        && name.chars().any(|c| c.is_ascii_lowercase())
        && !name.contains('_')
}

/// Local names of verb helpers imported from the shared client module,
/// e.g. `get` from `'./client'` or `post as send` from `'@/api'`.
fn client_helpers(text: &str) -> Vec<String> {
    let mut helpers = Vec::new();
    for caps in NAMED_IMPORT.captures_iter(text) {
        let module = caps[2].rsplit('/').next().unwrap_or("");
        let module = module.split('.').next().unwrap_or(module);
        if !CLIENT_MODULES.contains(&module) {
            continue;
        }
        for spec in caps[1].split(',') {
            let spec = spec.trim();
            let spec = spec.strip_prefix("type ").unwrap_or(spec);
            let (imported, local) = match spec.split_once(" as ") {
                Some((imported, local)) => (imported.trim(), local.trim()),
                None => (spec, spec),
            };
            if CLIENT_VERBS.contains(&imported) && !local.is_empty() {
                helpers.push(local.to_string());
            }
        }
    }
    helpers
}

/// True if the text invokes a raw HTTP primitive or the shared client.
pub fn calls_network_directly(text: &str) -> bool {
    DIRECT_CALL.is_match(text)
}
