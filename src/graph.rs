//! Schema-graph input model.
//!
//! Documents are JSON of the shape `{ "schemas": { <name>: <node>, ... } }`.
//! Multiple documents merge into one graph; schema names must stay unique
//! across the merge. Property and schema order is preserved end to end so
//! downstream materialization is deterministic.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Deserialize;

use crate::diagnostics::Error;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaGraph {
    #[serde(default)]
    pub schemas: IndexMap<String, SchemaNode>,
}

/// One named object schema: declared properties plus composition edges.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaNode {
    pub properties: IndexMap<String, PropertyDef>,
    /// Ancestors whose whole property surface this schema absorbs, in
    /// declaration order. Diamonds are legal; cycles resolve through the
    /// class registry.
    pub composed_of: Vec<String>,
    /// Marks this schema as a polymorphic root; the field's runtime value
    /// selects the concrete variant.
    pub discriminator_field: Option<String>,
    /// Marks this schema as a concrete variant under its polymorphic
    /// ancestor(s), identified by this value.
    pub discriminator_value: Option<String>,
    pub allow_open_properties: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyDef {
    /// Value-type reference, resolved by the pluggable type resolver. A
    /// schema name makes this an object-typed property.
    #[serde(rename = "type")]
    pub type_ref: String,
    pub required: bool,
    /// Name on the wire; defaults to the property name.
    pub wire_name: Option<String>,
    pub description: Option<String>,
    /// Local-access-only: the property exists as a composition anchor and is
    /// not exposed on descendants that see it only as a pass-through.
    pub private: bool,
    /// Hoist the members of this object-typed property into the declaring
    /// class. Inlining routes through the private-property lookup, so a
    /// property marked `inline` without `private` cannot be resolved.
    pub inline: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl SchemaGraph {
    pub fn node(&self, name: &str) -> Option<&SchemaNode> {
        self.schemas.get(name)
    }

    /// Deserialize one graph document from an in-memory JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, Error> {
        let graph: SchemaGraph = serde_path_to_error::deserialize(value).map_err(|err| Error::Parse {
            file: "<value>".to_string(),
            path: err.path().to_string(),
            message: err.into_inner().to_string(),
        })?;
        graph.validate()?;
        Ok(graph)
    }

    /// Fold another document into this graph. Redefining a schema name is a
    /// configuration error, not a merge.
    pub fn merge(&mut self, other: SchemaGraph) -> Result<(), Error> {
        for (name, node) in other.schemas {
            if self.schemas.contains_key(&name) {
                return Err(Error::DuplicateSchema { name });
            }
            self.schemas.insert(name, node);
        }
        Ok(())
    }

    /// Every `composedOf` edge must point at a schema in the merged graph.
    pub fn validate(&self) -> Result<(), Error> {
        for (name, node) in &self.schemas {
            for ancestor in &node.composed_of {
                if !self.schemas.contains_key(ancestor) {
                    return Err(Error::UnknownSchema {
                        name: ancestor.clone(),
                        referenced_by: name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl PropertyDef {
    pub fn wire_name_or<'a>(&'a self, name: &'a str) -> &'a str {
        self.wire_name.as_deref().unwrap_or(name)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// LOADING
// ————————————————————————————————————————————————————————————————————————————

/// Expand paths/globs, parse every document (in parallel), merge, validate.
pub fn load_graphs(patterns: &[String], pointer: Option<&str>) -> Result<SchemaGraph, Error> {
    let source_paths = resolve_file_path_patterns(patterns)?;

    let documents: Vec<Result<SchemaGraph, Error>> = source_paths
        .par_iter()
        .map(|path| load_one(path, pointer))
        .collect();

    let mut graph = SchemaGraph::default();
    for document in documents {
        graph.merge(document?)?;
    }
    graph.validate()?;
    Ok(graph)
}

fn load_one(path: &Path, pointer: Option<&str>) -> Result<SchemaGraph, Error> {
    let label = path.to_string_lossy().to_string();
    let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: label.clone(),
        source,
    })?;
    parse_graph_doc(&source, pointer, &label)
}

/// Deserialize with JSON-path context in error messages.
fn parse_graph_doc(source: &str, pointer: Option<&str>, label: &str) -> Result<SchemaGraph, Error> {
    match pointer {
        None => {
            let de = &mut serde_json::Deserializer::from_str(source);
            serde_path_to_error::deserialize(de).map_err(|err| Error::Parse {
                file: label.to_string(),
                path: err.path().to_string(),
                message: err.into_inner().to_string(),
            })
        }
        Some(ptr) => {
            let value: serde_json::Value =
                serde_json::from_str(source).map_err(|err| Error::Parse {
                    file: label.to_string(),
                    path: String::new(),
                    message: err.to_string(),
                })?;
            let node = value.pointer(ptr).ok_or_else(|| Error::Pointer {
                file: label.to_string(),
                pointer: ptr.to_string(),
            })?;
            serde_path_to_error::deserialize(node.clone()).map_err(|err| Error::Parse {
                file: label.to_string(),
                path: err.path().to_string(),
                message: err.into_inner().to_string(),
            })
        }
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>, Error>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).map_err(|e| Error::Pattern {
                message: format!("invalid glob pattern `{pattern}`: {e}"),
            })? {
                match entry {
                    Ok(p) => {
                        matched_any = true;
                        out.push(p);
                    }
                    Err(e) => {
                        return Err(Error::Pattern {
                            message: format!("while expanding `{pattern}`: {e}"),
                        });
                    }
                }
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                return Err(Error::Pattern {
                    message: format!("glob pattern matched no files: {pattern}"),
                });
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
