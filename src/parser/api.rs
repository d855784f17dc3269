//! API-module extraction: exported async functions returning `Promise<T>`.
//!
//! HTTP verb and endpoint are inferred from a bounded window of the body by
//! an ordered fallback chain, strongest evidence first:
//!
//! 1. `get<T>('/literal')`
//! 2. ``get<T>(`/template/${key}`)``
//! 3. ``const url = `/template`; ... get<T>(url)``
//! 4. first verb call + first path-looking literal anywhere in the window

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::debug;

use super::scan::{
    bounded_body, is_ident_char, matching_close, normalize_template, strip_comments,
    template_literal, truncate_chars,
};
use crate::graph::types::{ApiFunction, HttpMethod};

/// Characters of function body inspected for verb/endpoint inference.
pub const BODY_WINDOW: usize = 500;

/// Endpoint recorded when a verb call was found but no path could be.
pub const UNKNOWN_ENDPOINT: &str = "unknown";

static ASYNC_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*export\s+async\s+function\s+([A-Za-z_$][\w$]*)\s*(?:<[^(]*>)?\s*\(")
        .expect("async function pattern")
});

static ASYNC_ARROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*export\s+const\s+([A-Za-z_$][\w$]*)\s*(?::[^=]+)?=\s*async\s*\(")
        .expect("async arrow pattern")
});

static PROMISE_RETURN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*:\s*Promise\s*<").expect("promise return pattern"));

static VERB_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:^|[^\w$.])(?:(?:apiClient|client|api|http)\.)?(get|post|put|patch|del|delete)\s*(?:<[^()]*>)?\s*\(\s*",
    )
    .expect("verb call pattern")
});

static TEMPLATE_VAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*`").expect("template var pattern")
});

static PATH_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"`](/[^'"`\s]*)['"`]"#).expect("path literal pattern"));

/// Verb and endpoint inferred from one function body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointInference {
    pub method: Option<HttpMethod>,
    pub endpoint: Option<String>,
}

/// A call to a verb-named client helper.
struct VerbCall {
    method: HttpMethod,
    /// Offset of the first argument in the window.
    arg_start: usize,
}

/// Extract every exported async API function from one module.
pub fn extract_api_functions(source: &str, path: &str) -> BTreeMap<String, ApiFunction> {
    let text = strip_comments(source);
    let mut functions = BTreeMap::new();

    let declarations = ASYNC_FUNCTION
        .captures_iter(&text)
        .chain(ASYNC_ARROW.captures_iter(&text));

    for caps in declarations {
        let name = caps[1].to_string();
        let Some(m) = caps.get(0) else { continue };
        if functions.contains_key(&name) {
            continue;
        }
        let Some((response_type, body)) = signature_and_body(&text, m.end() - 1) else {
            debug!(function = %name, path, "skipping: not a Promise-returning function");
            continue;
        };
        let inference = infer_endpoint(body);
        functions.insert(
            name.clone(),
            ApiFunction {
                name,
                path: path.to_string(),
                endpoint: inference.endpoint,
                method: inference.method,
                response_type,
            },
        );
    }

    functions
}

/// From the parameter list's `(`, read the `Promise<T>` return type and the
/// bounded body window.
fn signature_and_body(text: &str, params_open: usize) -> Option<(String, &str)> {
    let params_close = matching_close(text, params_open, b'(', b')')?;
    let after_params = &text[params_close + 1..];
    let ret = PROMISE_RETURN.find(after_params)?;
    let angle = params_close + 1 + ret.end() - 1;
    let angle_close = matching_close(text, angle, b'<', b'>')?;
    let response_type = text[angle + 1..angle_close].trim().to_string();

    let mut cursor = angle_close + 1;
    let rest = text[cursor..].trim_start();
    cursor = text.len() - rest.len();
    let rest = match rest.strip_prefix("=>") {
        Some(expr) => {
            let expr = expr.trim_start();
            cursor = text.len() - expr.len();
            expr
        }
        None => rest,
    };

    let body = if rest.starts_with('{') {
        bounded_body(text, cursor, b'{', b'}', BODY_WINDOW)
    } else {
        truncate_chars(rest, BODY_WINDOW)
    };
    Some((response_type, body))
}

/// Run the fallback chain over a body window.
pub fn infer_endpoint(window: &str) -> EndpointInference {
    let calls: Vec<VerbCall> = VERB_CALL
        .captures_iter(window)
        .filter_map(|caps| {
            Some(VerbCall {
                method: HttpMethod::from_helper(&caps[1])?,
                arg_start: caps.get(0)?.end(),
            })
        })
        .collect();

    let Some(first) = calls.first() else {
        return EndpointInference::default();
    };

    // 1. literal string argument
    for call in &calls {
        if let Some(literal) = quoted_argument(window, call.arg_start) {
            return resolved(call.method, literal.to_string());
        }
    }

    // 2. template string argument
    for call in &calls {
        if window[call.arg_start..].starts_with('`') {
            if let Some(raw) = template_literal(window, call.arg_start) {
                return resolved(call.method, normalize_template(raw));
            }
        }
    }

    // 3. template assigned to a variable, passed by name
    for caps in TEMPLATE_VAR.captures_iter(window) {
        let (Some(var), Some(m)) = (caps.get(1), caps.get(0)) else {
            continue;
        };
        let Some(raw) = template_literal(window, m.end() - 1) else {
            continue;
        };
        let passed = calls
            .iter()
            .find(|call| starts_with_identifier(&window[call.arg_start..], var.as_str()));
        if let Some(call) = passed {
            return resolved(call.method, normalize_template(raw));
        }
    }

    // 4. best effort
    let endpoint = PATH_LITERAL
        .captures(window)
        .map(|caps| normalize_template(&caps[1]))
        .unwrap_or_else(|| UNKNOWN_ENDPOINT.to_string());
    resolved(first.method, endpoint)
}

fn resolved(method: HttpMethod, endpoint: String) -> EndpointInference {
    EndpointInference {
        method: Some(method),
        endpoint: Some(endpoint),
    }
}

/// A `'...'` or `"..."` literal starting exactly at `start`.
fn quoted_argument(text: &str, start: usize) -> Option<&str> {
    let rest = &text[start..];
    let quote = rest.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let end = rest[1..].find(quote)?;
    Some(&rest[1..1 + end])
}

fn starts_with_identifier(text: &str, name: &str) -> bool {
    text.strip_prefix(name)
        .is_some_and(|rest| !rest.chars().next().is_some_and(is_ident_char))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEOPLE_TS: &str = r#"
import { get, post, put, del } from './client';
import type { PersonDto, PagedResult } from './types';

export async function getPerson(idKey: string): Promise<PersonDto> {
  return get<PersonDto>(`/people/${idKey}`);
}

export async function searchPeople(
  params: { query?: string; page?: number } = {},
): Promise<PagedResult<PersonDto>> {
  const qs = new URLSearchParams();
  if (params.query) qs.set('q', params.query);
  const url = `/people${qs.toString() ? `?${qs}` : ''}`;
  return get<PagedResult<PersonDto>>(url);
}

export async function createPerson(body: CreatePersonRequest): Promise<PersonDto> {
  return post<PersonDto>('/people', body);
}

export const deletePerson = async (idKey: string): Promise<void> => {
  await del(`/people/${idKey}`);
};

export async function exportPeople(): Promise<Blob> {
  const response = await fetch('/people/export');
  return response.blob();
}

// export async function legacyGet(): Promise<PersonDto> { return get('/legacy'); }

export function notAsync(): Promise<void> {
  return put('/x');
}

export async function notPromise(): Result<void> {
  return put('/y');
}
"#;

    #[test]
    fn test_extracts_async_promise_functions() {
        let functions = extract_api_functions(PEOPLE_TS, "services/api/people.ts");
        let names: Vec<&str> = functions.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["createPerson", "deletePerson", "exportPeople", "getPerson", "searchPeople"]
        );
        assert_eq!(functions["searchPeople"].response_type, "PagedResult<PersonDto>");
        assert_eq!(functions["deletePerson"].response_type, "void");
        assert_eq!(functions["getPerson"].path, "services/api/people.ts");
    }

    #[test]
    fn test_fallback_chain() {
        let functions = extract_api_functions(PEOPLE_TS, "people.ts");

        let create = &functions["createPerson"];
        assert_eq!(create.method, Some(HttpMethod::Post));
        assert_eq!(create.endpoint.as_deref(), Some("/people"));

        let get = &functions["getPerson"];
        assert_eq!(get.method, Some(HttpMethod::Get));
        assert_eq!(get.endpoint.as_deref(), Some("/people/{idKey}"));

        let search = &functions["searchPeople"];
        assert_eq!(search.method, Some(HttpMethod::Get));
        assert_eq!(search.endpoint.as_deref(), Some("/people"));

        let delete = &functions["deletePerson"];
        assert_eq!(delete.method, Some(HttpMethod::Delete));
        assert_eq!(delete.endpoint.as_deref(), Some("/people/{idKey}"));
    }

    #[test]
    fn test_no_verb_call_leaves_both_absent() {
        let functions = extract_api_functions(PEOPLE_TS, "people.ts");
        let export = &functions["exportPeople"];
        assert_eq!(export.method, None);
        assert_eq!(export.endpoint, None);
    }

    #[test]
    fn test_best_effort_pairing() {
        let window = r#"
  const base = '/groups/' + groupKey;
  return apiClient.patch<GroupDto>(base + '/members', body);
"#;
        let inference = infer_endpoint(window);
        assert_eq!(inference.method, Some(HttpMethod::Patch));
        assert_eq!(inference.endpoint.as_deref(), Some("/groups/"));

        let inference = infer_endpoint("return get<Foo>(buildUrl(id));");
        assert_eq!(inference.method, Some(HttpMethod::Get));
        assert_eq!(inference.endpoint.as_deref(), Some(UNKNOWN_ENDPOINT));
    }

    #[test]
    fn test_member_calls_are_not_verbs() {
        let inference = infer_endpoint("const q = searchParams.get('page'); cache.delete('k');");
        assert_eq!(inference, EndpointInference::default());
    }
}
