//! The contract checks.
//!
//! Each check is a pure function of the snapshot. The verifier runs them
//! in the order [`default_checks`] returns and concatenates what they find.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;

use super::report::{Severity, Violation};
use super::snapshot::Snapshot;
use crate::config::VerifierConfig;
use crate::graph::assembler::unresolved_references;
use crate::graph::types::TypeKind;

/// One independent architectural rule.
pub trait ContractCheck {
    /// Stable identifier, carried on every violation.
    fn id(&self) -> &'static str;

    /// Heading used in the human report.
    fn title(&self) -> &'static str;

    fn run(&self, snapshot: &Snapshot) -> Vec<Violation>;
}

/// The checks in run order.
pub fn default_checks(config: &VerifierConfig) -> Vec<Box<dyn ContractCheck>> {
    vec![
        Box::new(ResponseEnvelopeCheck),
        Box::new(NumericIdCheck),
        Box::new(IdKeyRouteCheck),
        Box::new(HookWrappingCheck),
        Box::new(TypeAlignmentCheck::new(config.type_alignment_allowlist.iter().cloned())),
        Box::new(UnresolvedReferenceCheck),
    ]
}

// ─── Check 1 ────────────────────────────────────────────────────

/// Every controller must state whether its responses are wrapped.
pub struct ResponseEnvelopeCheck;

const ENVELOPE_PATTERN: &str = "response_envelope";

impl ContractCheck for ResponseEnvelopeCheck {
    fn id(&self) -> &'static str {
        "response_envelope"
    }

    fn title(&self) -> &'static str {
        "Response Envelope Documentation"
    }

    fn run(&self, snapshot: &Snapshot) -> Vec<Violation> {
        let mut found = Vec::new();
        for (name, controller) in &snapshot.controllers {
            let declared = controller
                .patterns
                .as_ref()
                .and_then(|p| p.get(ENVELOPE_PATTERN));
            let message = match declared {
                Some(Value::Bool(_)) => continue,
                Some(other) => format!("{} must be a boolean, found {}", ENVELOPE_PATTERN, other),
                None => format!("Missing {} documentation in patterns", ENVELOPE_PATTERN),
            };
            found.push(Violation::new(Severity::Fail, self.id(), name, message));
        }
        found
    }
}

// ─── Check 2 ────────────────────────────────────────────────────

/// Records must not expose the numeric identifier.
pub struct NumericIdCheck;

const ID_PROPERTY: &str = "Id";

const NUMERIC_TYPES: &[&str] = &[
    "int", "long", "short", "byte", "sbyte", "uint", "ulong", "ushort", "int16", "int32", "int64",
    "uint16", "uint32", "uint64", "integer", "number",
];

/// True for `int`, `int?`, `long`, `Nullable<Int32>`, `System.Int64` and the like.
pub fn is_numeric_type(raw: &str) -> bool {
    let mut ty = raw.trim();
    if let Some(inner) = ty.strip_prefix("Nullable<").and_then(|t| t.strip_suffix('>')) {
        ty = inner.trim();
    }
    let ty = ty.trim_end_matches('?');
    let ty = ty.strip_prefix("System.").unwrap_or(ty);
    NUMERIC_TYPES.contains(&ty.to_ascii_lowercase().as_str())
}

impl ContractCheck for NumericIdCheck {
    fn id(&self) -> &'static str {
        "numeric_id"
    }

    fn title(&self) -> &'static str {
        "No Integer IDs in DTOs"
    }

    fn run(&self, snapshot: &Snapshot) -> Vec<Violation> {
        snapshot
            .dtos
            .iter()
            .filter_map(|(name, dto)| {
                let ty = dto.properties.get(ID_PROPERTY)?.as_str()?;
                is_numeric_type(ty).then(|| {
                    Violation::new(
                        Severity::Fail,
                        self.id(),
                        name,
                        format!(
                            "Exposes integer ID: {}: {} (should use IdKey string)",
                            ID_PROPERTY, ty
                        ),
                    )
                })
            })
            .collect()
    }
}

// ─── Check 3 ────────────────────────────────────────────────────

/// Routes must use the `{idKey}` placeholder, never `{id}`.
pub struct IdKeyRouteCheck;

/// `{id}`, optional `{id?}`, or constrained such as `{id:int}`.
static RAW_ID_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{id(?:\?|:[^}]*)?\}").expect("valid placeholder regex"));

pub fn uses_raw_id(route: &str) -> bool {
    RAW_ID_PLACEHOLDER.is_match(route)
}

impl ContractCheck for IdKeyRouteCheck {
    fn id(&self) -> &'static str {
        "idkey_route"
    }

    fn title(&self) -> &'static str {
        "IdKey Routes"
    }

    fn run(&self, snapshot: &Snapshot) -> Vec<Violation> {
        let mut found = Vec::new();
        for (name, controller) in &snapshot.controllers {
            if let Some(route) = controller.route.as_deref().filter(|r| uses_raw_id(r)) {
                found.push(Violation::new(
                    Severity::Fail,
                    self.id(),
                    name,
                    format!("Controller route uses {{id}} instead of {{idKey}}: {}", route),
                ));
            }
            for endpoint in &controller.endpoints {
                let Some(route) = endpoint.route.as_deref() else { continue };
                if !uses_raw_id(route) {
                    continue;
                }
                let endpoint_name = endpoint.name.as_deref().unwrap_or("?");
                found.push(Violation::new(
                    Severity::Fail,
                    self.id(),
                    format!("{}.{}", name, endpoint_name),
                    format!("Route uses {{id}} instead of {{idKey}}: {}", route),
                ));
            }
        }
        found
    }
}

// ─── Check 4 ────────────────────────────────────────────────────

/// Components reach the network only through hooks.
pub struct HookWrappingCheck;

impl ContractCheck for HookWrappingCheck {
    fn id(&self) -> &'static str {
        "hook_wrapping"
    }

    fn title(&self) -> &'static str {
        "Hook Wrapping"
    }

    fn run(&self, snapshot: &Snapshot) -> Vec<Violation> {
        snapshot
            .components
            .iter()
            .filter(|(_, component)| component.api_calls_directly)
            .map(|(name, _)| {
                Violation::new(
                    Severity::Fail,
                    self.id(),
                    name,
                    "Component makes direct API calls instead of using hooks",
                )
            })
            .collect()
    }
}

// ─── Check 5 ────────────────────────────────────────────────────

/// Backend records and frontend interfaces should line up.
///
/// Informational: every finding is `Info`.
pub struct TypeAlignmentCheck {
    allowlist: BTreeSet<String>,
}

/// Identity and audit properties the frontend may legitimately omit.
const BASE_PROPERTIES: &[&str] = &["Id", "IdKey", "Guid", "CreatedDateTime", "ModifiedDateTime"];

/// Property types that travel as form data, not JSON.
const STREAM_TYPES: &[&str] = &["Stream", "FileStream", "IFormFile"];

const DTO_SUFFIX: &str = "Dto";

impl TypeAlignmentCheck {
    pub fn new(allowlist: impl IntoIterator<Item = String>) -> Self {
        Self {
            allowlist: allowlist.into_iter().collect(),
        }
    }

    fn skipped(&self, dto: &str) -> bool {
        self.allowlist.contains(dto) || dto.ends_with("RequestDto") || dto.ends_with("ResponseDto")
    }
}

/// Find the counterpart of `name` among `candidates`: exact, then without
/// the `Dto` suffix, then case-insensitively.
pub fn matching_name<'a, I>(name: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a String> + Clone,
{
    let base = name.strip_suffix(DTO_SUFFIX).unwrap_or(name);
    let find = |pred: &dyn Fn(&str) -> bool| {
        candidates
            .clone()
            .into_iter()
            .map(String::as_str)
            .find(|c| pred(c))
    };
    find(&|c: &str| c == name)
        .or_else(|| find(&|c: &str| c == base))
        .or_else(|| find(&|c: &str| c.eq_ignore_ascii_case(base)))
}

fn camel_case(pascal: &str) -> String {
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl ContractCheck for TypeAlignmentCheck {
    fn id(&self) -> &'static str {
        "type_alignment"
    }

    fn title(&self) -> &'static str {
        "Type Alignment (Frontend ↔ Backend)"
    }

    fn run(&self, snapshot: &Snapshot) -> Vec<Violation> {
        let mut found = Vec::new();
        if snapshot.dtos.is_empty() {
            return found;
        }
        let info = |subject: String, message: String| {
            Violation::new(Severity::Info, self.id(), subject, message)
        };
        if snapshot.types.is_empty() {
            found.push(info(
                "types".to_string(),
                format!(
                    "Frontend types not present in snapshot; backend has {} DTOs",
                    snapshot.dtos.len()
                ),
            ));
            return found;
        }

        let interfaces: Vec<&String> = snapshot
            .types
            .iter()
            .filter(|(_, ty)| ty.kind == TypeKind::Interface)
            .map(|(name, _)| name)
            .collect();

        for (dto_name, dto) in &snapshot.dtos {
            if self.skipped(dto_name) {
                continue;
            }
            let Some(type_name) = matching_name(dto_name, interfaces.iter().copied()) else {
                let message = "No corresponding frontend type found".to_string();
                found.push(info(dto_name.clone(), message));
                continue;
            };
            let type_props = &snapshot.types[type_name].properties;
            for (prop, ty) in &dto.properties {
                let ty = ty.as_str().unwrap_or_default();
                if BASE_PROPERTIES.contains(&prop.as_str()) || STREAM_TYPES.contains(&ty) {
                    continue;
                }
                let expected = camel_case(prop);
                if type_props.keys().any(|p| p.eq_ignore_ascii_case(&expected)) {
                    continue;
                }
                found.push(info(
                    format!("{} ↔ {}", dto_name, type_name),
                    format!(
                        "Missing property: DTO has {} ({}) but frontend type lacks {}",
                        prop, ty, expected
                    ),
                ));
            }
        }

        let dto_names: Vec<&String> = snapshot.dtos.keys().collect();
        for name in interfaces {
            if name.starts_with('_') || name.contains("Enum") {
                continue;
            }
            if matching_name(name, dto_names.iter().copied()).is_some() {
                continue;
            }
            // Frontend-only records are common; a DTO named `<Type>Dto` also counts.
            let suffixed = format!("{}{}", name, DTO_SUFFIX);
            if snapshot.dtos.contains_key(&suffixed) {
                continue;
            }
            found.push(info(
                name.clone(),
                "Frontend type has no corresponding backend DTO (may be frontend-only)".to_string(),
            ));
        }
        found
    }
}

// ─── Check 6 ────────────────────────────────────────────────────

/// Bindings and hook uses that point at nothing.
pub struct UnresolvedReferenceCheck;

impl ContractCheck for UnresolvedReferenceCheck {
    fn id(&self) -> &'static str {
        "unresolved_reference"
    }

    fn title(&self) -> &'static str {
        "Unresolved References"
    }

    fn run(&self, snapshot: &Snapshot) -> Vec<Violation> {
        unresolved_references(&snapshot.api_functions, &snapshot.hooks, &snapshot.components)
            .into_iter()
            .map(|r| Violation::new(Severity::Warn, self.id(), r.from.clone(), r.to_string()))
            .collect()
    }
}
