//! Identifier deconstruction and re-casing for generated names.

use once_cell::sync::Lazy;
use regex::Regex;

static BOUNDARY_ACRONYM: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").unwrap());
static BOUNDARY_LOWER_UPPER: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());

/// Split an identifier into its word parts: case boundaries, acronym runs,
/// and any non-alphanumeric separators all count as breaks.
pub fn deconstruct(identifier: &str) -> Vec<String> {
    let spaced = BOUNDARY_ACRONYM.replace_all(identifier, "$1 $2");
    let spaced = BOUNDARY_LOWER_UPPER.replace_all(&spaced, "$1 $2");
    SEPARATORS
        .split(&spaced)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// `PascalCase` class name for a schema name.
pub fn type_name(schema_name: &str) -> String {
    deconstruct(schema_name)
        .iter()
        .map(|part| capitalize(part))
        .collect()
}

/// Backing-field name for an ancestor anchor: underscore + lowerCamelCase of
/// the ancestor's type name. Deterministic so generated accessors are stable.
pub fn anchor_field_name(type_name: &str) -> String {
    let mut out = String::from("_");
    for (i, part) in deconstruct(type_name).iter().enumerate() {
        if i == 0 {
            out.push_str(&part.to_lowercase());
        } else {
            out.push_str(&capitalize(part));
        }
    }
    out
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
    }
}
