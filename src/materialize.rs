//! Class materialization over the composition graph.
//!
//! One pass per schema node, fixed order:
//! register → compose ancestors → flatten properties → open-properties hook
//! → wire discriminator → finalize validation.
//!
//! The registry installs an empty class BEFORE any pipeline step runs on it.
//! That ordering is the load-bearing invariant for cyclic and diamond
//! composition graphs: a re-entrant resolve during recursion finds the
//! partially built entry instead of recursing forever. A class's lists are
//! only complete once its original `resolve` call has returned; re-entrant
//! readers must treat an empty list as "not yet computed".

pub mod compose;
pub mod discriminator;
pub mod flatten;
pub mod validation;

use std::collections::HashMap;

use tracing::debug;

use crate::diagnostics::{Diagnostics, Error};
use crate::graph::SchemaGraph;
use crate::model::{ClassId, MaterializedClass};
use crate::naming;
use crate::typeinfo::{DictionaryCapability, OpenPropertiesInjector, TypeResolver};

static DICTIONARY: DictionaryCapability = DictionaryCapability;

#[derive(Debug, Clone)]
pub struct Options {
    /// When false, no class exposes a validation entry point at all.
    pub validation: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { validation: true }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// MATERIALIZER
// ————————————————————————————————————————————————————————————————————————————

/// Resolution pipeline plus the class registry (arena + name index).
/// Single logical thread of control; re-entrancy comes only from recursive
/// composition, never from parallelism.
pub struct Materializer<'a> {
    graph: &'a SchemaGraph,
    types: &'a dyn TypeResolver,
    open_properties: &'a dyn OpenPropertiesInjector,
    options: Options,
    classes: Vec<MaterializedClass>,
    by_name: HashMap<String, ClassId>,
    diagnostics: Diagnostics,
}

impl<'a> Materializer<'a> {
    pub fn new(graph: &'a SchemaGraph, types: &'a dyn TypeResolver) -> Self {
        Self {
            graph,
            types,
            open_properties: &DICTIONARY,
            options: Options::default(),
            classes: Vec::new(),
            by_name: HashMap::new(),
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn with_open_properties(mut self, injector: &'a dyn OpenPropertiesInjector) -> Self {
        self.open_properties = injector;
        self
    }

    /// Materialize one schema node (and, transitively, everything it
    /// composes). Idempotent: repeated calls return the same `ClassId`, and
    /// a re-entrant call during construction returns the in-progress entry.
    pub fn resolve(&mut self, name: &str) -> Result<ClassId, Error> {
        if let Some(&id) = self.by_name.get(name) {
            return Ok(id);
        }
        let node = self.graph.node(name).ok_or_else(|| Error::UnknownSchema {
            name: name.to_string(),
            referenced_by: "<root>".to_string(),
        })?;

        // Install the empty class before any pipeline step runs on it.
        let id = self.classes.len();
        self.classes.push(MaterializedClass {
            name: name.to_string(),
            type_name: naming::type_name(name),
            ..MaterializedClass::default()
        });
        self.by_name.insert(name.to_string(), id);
        debug!(schema = name, id, "registered class");

        self.compose_ancestors(id, node)?;
        self.flatten_properties(id, node)?;
        if node.allow_open_properties {
            self.open_properties.augment(&mut self.classes[id]);
        }
        self.wire_discriminator(id, node);
        self.finalize_validation(id);
        Ok(id)
    }

    /// Materialize every schema in the graph, declaration order.
    pub fn resolve_all(&mut self) -> Result<(), Error> {
        let names: Vec<String> = self.graph.schemas.keys().cloned().collect();
        for name in names {
            self.resolve(&name)?;
        }
        Ok(())
    }

    pub fn class(&self, id: ClassId) -> &MaterializedClass {
        &self.classes[id]
    }

    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn finish(self) -> Model {
        Model {
            classes: self.classes,
            by_name: self.by_name,
            diagnostics: self.diagnostics,
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// OUTPUT
// ————————————————————————————————————————————————————————————————————————————

/// The finished model: every materialized class, in registration order, plus
/// the diagnostics accumulated along the way.
pub struct Model {
    classes: Vec<MaterializedClass>,
    by_name: HashMap<String, ClassId>,
    diagnostics: Diagnostics,
}

impl Model {
    pub fn classes(&self) -> &[MaterializedClass] {
        &self.classes
    }

    pub fn class(&self, id: ClassId) -> &MaterializedClass {
        &self.classes[id]
    }

    pub fn by_name(&self, name: &str) -> Option<&MaterializedClass> {
        self.by_name.get(name).map(|&id| &self.classes[id])
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————


#[cfg(test)]
mod tests {
    use super::testutil::{graph, materialize};
    use super::*;
    use crate::typeinfo::GraphTypes;
    use serde_json::json;

    #[test]
    fn repeated_resolve_is_identity_stable() {
        let g = graph(json!({
            "schemas": {
                "Pet": { "properties": { "name": { "type": "string" } } },
                "Dog": { "composedOf": ["Pet"] }
            }
        }));
        let types = GraphTypes::new(&g);
        let mut m = Materializer::new(&g, &types);

        let first = m.resolve("Dog").unwrap();
        let second = m.resolve("Dog").unwrap();
        let third = m.resolve("Dog").unwrap();
        assert_eq!(first, second);
        assert_eq!(second, third);

        // The ancestor was materialized exactly once, during Dog's pass.
        let pet = m.resolve("Pet").unwrap();
        assert_eq!(m.class(pet).name, "Pet");
        let model = m.finish();
        assert_eq!(model.classes().len(), 2);
    }

    #[test]
    fn unknown_root_is_a_fatal_error() {
        let g = graph(json!({ "schemas": {} }));
        let types = GraphTypes::new(&g);
        let mut m = Materializer::new(&g, &types);
        assert!(matches!(
            m.resolve("Ghost"),
            Err(Error::UnknownSchema { .. })
        ));
    }

    #[test]
    fn mutually_recursive_composition_terminates() {
        // A composes B, B composes A. The registry hands B the in-progress A
        // entry, so resolution terminates; B simply sees A's (still empty)
        // surface, which is the documented re-entrant window.
        let g = graph(json!({
            "schemas": {
                "A": { "properties": { "a": { "type": "string" } }, "composedOf": ["B"] },
                "B": { "properties": { "b": { "type": "string" } }, "composedOf": ["A"] }
            }
        }));
        let model = materialize(&g);

        let a = model.by_name("A").unwrap();
        let b = model.by_name("B").unwrap();
        assert_eq!(a.anchors.len(), 1);
        assert_eq!(b.anchors.len(), 1);

        // A finished last, so it sees B's full surface...
        assert!(a.property("b").is_some());
        // ...while B, resolved re-entrantly, saw only A's partial state.
        assert!(b.property("a").is_none());
        assert!(b.property("b").is_some());
    }

    #[test]
    fn open_properties_hook_runs_for_flagged_schemas() {
        let g = graph(json!({
            "schemas": {
                "Bag": { "allowOpenProperties": true },
                "Fixed": {}
            }
        }));
        let model = materialize(&g);
        assert!(model.by_name("Bag").unwrap().open_properties);
        assert!(!model.by_name("Fixed").unwrap().open_properties);
    }
}
