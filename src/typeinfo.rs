//! Boundary to the value-type world.
//!
//! The materializer never interprets type references itself: a pluggable
//! [`TypeResolver`] turns each reference into a [`TypeDescriptor`] exposing
//! read-only-ness, an optional link back to a modeled object schema, and the
//! per-type check text its validation routine contributes.

use std::collections::BTreeSet;

use crate::graph::SchemaGraph;
use crate::model::MaterializedClass;
use crate::naming;

/// What the materializer needs to know about one value type.
#[derive(Debug, Clone, Default)]
pub struct TypeDescriptor {
    pub display: String,
    pub read_only: bool,
    /// Set when the type reference names a modeled object schema; inlining
    /// and anchor checks route through this.
    pub object_schema: Option<String>,
    /// Check-text templates; `{field}` is replaced with the accessor.
    pub presence_check: Option<String>,
    pub value_check: Option<String>,
}

impl TypeDescriptor {
    pub fn presence_check_for(&self, field: &str) -> Option<String> {
        self.presence_check.as_ref().map(|t| t.replace("{field}", field))
    }

    pub fn value_check_for(&self, field: &str) -> Option<String> {
        self.value_check.as_ref().map(|t| t.replace("{field}", field))
    }
}

pub trait TypeResolver {
    fn resolve_type(&self, type_ref: &str) -> TypeDescriptor;
}

/// Resolver over the loaded graph: schema names become object types, every
/// other reference is an opaque scalar. Read-only types are configured by
/// name.
pub struct GraphTypes<'g> {
    graph: &'g SchemaGraph,
    read_only: BTreeSet<String>,
}

impl<'g> GraphTypes<'g> {
    pub fn new(graph: &'g SchemaGraph) -> Self {
        Self {
            graph,
            read_only: BTreeSet::new(),
        }
    }

    pub fn with_read_only<I>(mut self, type_refs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.read_only = type_refs.into_iter().map(Into::into).collect();
        self
    }
}

impl TypeResolver for GraphTypes<'_> {
    fn resolve_type(&self, type_ref: &str) -> TypeDescriptor {
        if self.graph.node(type_ref).is_some() {
            return TypeDescriptor {
                display: naming::type_name(type_ref),
                read_only: self.read_only.contains(type_ref),
                object_schema: Some(type_ref.to_string()),
                presence_check: Some("assert_not_null({field})".to_string()),
                value_check: Some("{field}.validate(listener)".to_string()),
            };
        }
        TypeDescriptor {
            display: type_ref.to_string(),
            read_only: self.read_only.contains(type_ref),
            object_schema: None,
            presence_check: Some("assert_not_null({field})".to_string()),
            value_check: None,
        }
    }
}

/// Black-box capability hook for `allowOpenProperties` schemas.
pub trait OpenPropertiesInjector {
    fn augment(&self, class: &mut MaterializedClass);
}

/// Default injector: tag the class as carrying the dictionary capability and
/// leave the shape of that capability to the emission layer.
#[derive(Debug, Default)]
pub struct DictionaryCapability;

impl OpenPropertiesInjector for DictionaryCapability {
    fn augment(&self, class: &mut MaterializedClass) {
        class.open_properties = true;
    }
}
