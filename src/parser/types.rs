//! Exported type declarations: interfaces, type aliases and enums.
//!
//! Interfaces are decomposed into `property -> type expression` maps.
//! Aliases and enums are recorded by name and kind only.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use super::scan::{after_type_section, balanced_body, strip_comments};
use crate::graph::types::{TypeDef, TypeKind};

static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*export\s+(?:declare\s+)?(?:(interface)|(type)|(?:const\s+)?(enum))\s+([A-Za-z_$][\w$]*)",
    )
    .expect("declaration pattern")
});

static PROPERTY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?s)(?:readonly\s+)?([A-Za-z_$][\w$]*|'[^']*'|"[^"]*")\s*(\?)?\s*:\s*(.+)$"#,
    )
    .expect("property pattern")
});

/// Extract every exported type declaration in `source`.
///
/// `path` is the label stored on each definition. Later declarations with
/// an already-seen name are ignored.
pub fn extract_types(source: &str, path: &str) -> BTreeMap<String, TypeDef> {
    let text = strip_comments(source);
    let mut types = BTreeMap::new();

    for caps in DECLARATION.captures_iter(&text) {
        let name = caps[4].to_string();
        if types.contains_key(&name) {
            continue;
        }
        let (kind, properties) = if caps.get(1).is_some() {
            let decl_end = caps.get(0).map_or(0, |m| m.end());
            // Generic parameters and `extends` clauses may hold braces of their own
            let properties = after_type_section(&text, decl_end, false)
                .filter(|&open| text.as_bytes()[open] == b'{')
                .and_then(|open| balanced_body(&text, open, b'{', b'}'))
                .map(extract_properties)
                .unwrap_or_default();
            (TypeKind::Interface, properties)
        } else if caps.get(2).is_some() {
            (TypeKind::Type, BTreeMap::new())
        } else {
            (TypeKind::Enum, BTreeMap::new())
        };

        types.insert(
            name.clone(),
            TypeDef {
                name,
                kind,
                properties,
                path: path.to_string(),
            },
        );
    }

    types
}

/// Split an interface body into `name -> type expression`.
///
/// Members that are not plain properties (methods, index signatures) are
/// skipped. A nullable marker (`name?:`) is dropped from the key.
pub fn extract_properties(body: &str) -> BTreeMap<String, String> {
    let body = strip_comments(body);
    let mut properties = BTreeMap::new();

    for member in split_members(&body) {
        let Some(caps) = PROPERTY.captures(&member) else {
            continue;
        };
        let name = caps[1].trim_matches(|c| c == '\'' || c == '"').to_string();
        let ty = caps[3].trim().to_string();
        if ty.is_empty() {
            continue;
        }
        properties.entry(name).or_insert(ty);
    }

    properties
}

/// Split at top-level `;`, `,` and newlines, then glue continuation lines
/// (`| B`, `& C`, trailing `=>`) back onto the member they belong to.
fn split_members(body: &str) -> Vec<String> {
    let mut raw = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();
    let mut prev = '\0';
    let mut quote: Option<char> = None;

    for c in body.chars() {
        if let Some(q) = quote {
            current.push(c);
            if c == q && prev != '\\' {
                quote = None;
            }
            prev = c;
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '{' | '(' | '[' | '<' => depth += 1,
            '}' | ')' | ']' => depth -= 1,
            '>' if prev != '=' => depth -= 1,
            ';' | ',' | '\n' if depth <= 0 => {
                raw.push(std::mem::take(&mut current));
                prev = c;
                continue;
            }
            _ => {}
        }
        current.push(c);
        prev = c;
    }
    raw.push(current);

    let mut members: Vec<String> = Vec::new();
    for piece in raw {
        let trimmed = piece.trim();
        if trimmed.is_empty() {
            continue;
        }
        let continues = trimmed.starts_with('|')
            || trimmed.starts_with('&')
            || trimmed.starts_with("=>")
            || members.last().is_some_and(|last| {
                let last = last.trim_end();
                ["|", "&", ":", "=>"].iter().any(|tail| last.ends_with(tail))
            });
        match members.last_mut() {
            Some(last) if continues => {
                last.push(' ');
                last.push_str(trimmed);
            }
            _ => members.push(trimmed.to_string()),
        }
    }
    members
}
