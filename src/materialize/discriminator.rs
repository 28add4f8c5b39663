//! Discriminator wiring: polymorphic roots and the upward registration of
//! concrete variants.
//!
//! A root never adds entries for itself; its table fills as descendants
//! resolve. A variant's value climbs the whole lattice: every polymorphic
//! ancestor at any depth receives it, including roots behind intermediates
//! that declare no discriminator of their own. Registration is idempotent so
//! diamonds can deliver the same pair along two paths.

use std::collections::HashSet;

use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::graph::SchemaNode;
use crate::materialize::Materializer;
use crate::model::ClassId;

impl<'a> Materializer<'a> {
    pub(crate) fn wire_discriminator(&mut self, id: ClassId, node: &SchemaNode) {
        if let Some(field) = &node.discriminator_field {
            // Polymorphic root: children are expected to announce who they
            // are; the dispatch table fills from below.
            self.classes[id].is_polymorphic = true;
            self.classes[id].discriminator_field = Some(field.clone());
        }
        self.classes[id].discriminator_value = node.discriminator_value.clone();

        let ancestors: Vec<ClassId> = self.classes[id].anchors.iter().map(|a| a.ancestor).collect();
        for ancestor in ancestors {
            let leads_to_root = self.classes[ancestor].is_polymorphic
                || !self.classes[ancestor].parent_polymorphic.is_empty();
            if leads_to_root && !self.classes[id].parent_polymorphic.contains(&ancestor) {
                self.classes[id].parent_polymorphic.push(ancestor);
            }

            if let Some(value) = node.discriminator_value.clone() {
                let mut visited = HashSet::new();
                self.register_variant(ancestor, &value, id, &mut visited);
            }
        }
    }

    /// Record `value → variant` on `target` if it is a root, then climb
    /// through `target`'s own polymorphic parents. The visited set bounds the
    /// walk on cyclic graphs.
    fn register_variant(
        &mut self,
        target: ClassId,
        value: &str,
        variant: ClassId,
        visited: &mut HashSet<ClassId>,
    ) {
        if !visited.insert(target) {
            return;
        }

        if self.classes[target].is_polymorphic {
            match self.classes[target].discriminator_table.get(value) {
                // Same pair arriving along a second path: no-op.
                Some(&existing) if existing == variant => {}
                Some(&existing) => {
                    let kept = self.classes[existing].name.clone();
                    let dropped = self.classes[variant].name.clone();
                    self.diagnostics.report(Diagnostic::DuplicateDiscriminatorValue {
                        root: self.classes[target].name.clone(),
                        value: value.to_string(),
                        kept,
                        dropped,
                    });
                }
                None => {
                    debug!(
                        root = %self.classes[target].name,
                        value,
                        variant = %self.classes[variant].name,
                        "registered discriminator variant"
                    );
                    self.classes[target]
                        .discriminator_table
                        .insert(value.to_string(), variant);
                }
            }
        }

        for parent in self.classes[target].parent_polymorphic.clone() {
            self.register_variant(parent, value, variant, visited);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::diagnostics::Diagnostic;
    use crate::materialize::testutil::{graph, materialize};
    use serde_json::json;

    fn table_of<'m>(
        model: &'m crate::materialize::Model,
        root: &str,
    ) -> Vec<(&'m str, &'m str)> {
        model
            .by_name(root)
            .unwrap()
            .discriminator_table
            .iter()
            .map(|(value, &id)| (value.as_str(), model.class(id).name.as_str()))
            .collect()
    }

    #[test]
    fn direct_variants_fill_the_root_table_in_either_order() {
        let doc = json!({
            "schemas": {
                "Pet": {
                    "properties": { "kind": { "type": "string", "required": true } },
                    "discriminatorField": "kind"
                },
                "Dog": { "composedOf": ["Pet"], "discriminatorValue": "a" },
                "Cat": { "composedOf": ["Pet"], "discriminatorValue": "b" }
            }
        });
        let model = materialize(&graph(doc));
        assert_eq!(table_of(&model, "Pet"), vec![("a", "Dog"), ("b", "Cat")]);

        // Same graph, variants declared first: resolution order must not
        // change the resulting table contents.
        let doc = json!({
            "schemas": {
                "Cat": { "composedOf": ["Pet"], "discriminatorValue": "b" },
                "Dog": { "composedOf": ["Pet"], "discriminatorValue": "a" },
                "Pet": {
                    "properties": { "kind": { "type": "string", "required": true } },
                    "discriminatorField": "kind"
                }
            }
        });
        let model = materialize(&graph(doc));
        let mut table = table_of(&model, "Pet");
        table.sort();
        assert_eq!(table, vec![("a", "Dog"), ("b", "Cat")]);
    }

    #[test]
    fn value_propagates_through_non_declaring_intermediates() {
        let g = graph(json!({
            "schemas": {
                "Shape": { "discriminatorField": "shapeType" },
                "Rounded": { "composedOf": ["Shape"] },
                "Circle": { "composedOf": ["Rounded"], "discriminatorValue": "x" }
            }
        }));
        let model = materialize(&g);

        // Rounded declares nothing, yet the value reaches the root above it.
        assert_eq!(table_of(&model, "Shape"), vec![("x", "Circle")]);
        assert!(model.by_name("Rounded").unwrap().discriminator_table.is_empty());

        let circle = model.by_name("Circle").unwrap();
        let parents: Vec<&str> = circle
            .parent_polymorphic
            .iter()
            .map(|&id| model.class(id).name.as_str())
            .collect();
        assert_eq!(parents, vec!["Rounded"]);
    }

    #[test]
    fn diamond_registration_is_idempotent_and_anchors_stay_separate() {
        let g = graph(json!({
            "schemas": {
                "A": { "discriminatorField": "t", "properties": { "base": { "type": "string" } } },
                "B": { "composedOf": ["A"] },
                "C": { "composedOf": ["A"] },
                "D": { "composedOf": ["B", "C"], "discriminatorValue": "d" }
            }
        }));
        let model = materialize(&g);

        // The same (value, class) pair arrives via B and via C; the table
        // holds exactly one entry.
        assert_eq!(table_of(&model, "A"), vec![("d", "D")]);
        assert!(!model.diagnostics().has_errors());

        // The diamond does not collapse anchors: B and C each embed their
        // own A instance, and D embeds both of them.
        assert_eq!(model.by_name("B").unwrap().anchors.len(), 1);
        assert_eq!(model.by_name("C").unwrap().anchors.len(), 1);
        let d = model.by_name("D").unwrap();
        assert_eq!(d.anchors.len(), 2);

        // A's property surfaces twice on D, once along each path.
        let paths: Vec<Vec<String>> = d
            .properties
            .iter()
            .filter(|p| p.name == "base")
            .map(|p| match &p.access {
                crate::model::Access::Inlined { path } => path.clone(),
                other => panic!("expected inlined, got {other:?}"),
            })
            .collect();
        assert_eq!(
            paths,
            vec![
                vec!["_b".to_string(), "_a".to_string(), "base".to_string()],
                vec!["_c".to_string(), "_a".to_string(), "base".to_string()],
            ]
        );
    }

    #[test]
    fn duplicate_value_reports_once_and_keeps_the_first() {
        let g = graph(json!({
            "schemas": {
                "Pet": { "discriminatorField": "kind" },
                "Dog": { "composedOf": ["Pet"], "discriminatorValue": "dog" },
                "Hound": { "composedOf": ["Pet"], "discriminatorValue": "dog" }
            }
        }));
        let model = materialize(&g);

        assert_eq!(table_of(&model, "Pet"), vec![("dog", "Dog")]);
        let duplicates: Vec<_> = model
            .diagnostics()
            .entries()
            .iter()
            .filter(|d| matches!(d, Diagnostic::DuplicateDiscriminatorValue { .. }))
            .collect();
        assert_eq!(duplicates.len(), 1);
        match duplicates[0] {
            Diagnostic::DuplicateDiscriminatorValue { kept, dropped, .. } => {
                assert_eq!(kept, "Dog");
                assert_eq!(dropped, "Hound");
            }
            other => panic!("unexpected diagnostic {other:?}"),
        }
        assert!(model.diagnostics().has_errors());
    }

    #[test]
    fn sibling_polymorphic_roots_both_receive_registration() {
        let g = graph(json!({
            "schemas": {
                "Vehicle": { "discriminatorField": "vehicleType" },
                "Machine": { "discriminatorField": "machineType" },
                "Truck": { "composedOf": ["Vehicle", "Machine"], "discriminatorValue": "truck" }
            }
        }));
        let model = materialize(&g);

        assert_eq!(table_of(&model, "Vehicle"), vec![("truck", "Truck")]);
        assert_eq!(table_of(&model, "Machine"), vec![("truck", "Truck")]);

        let truck = model.by_name("Truck").unwrap();
        let parents: Vec<&str> = truck
            .parent_polymorphic
            .iter()
            .map(|&id| model.class(id).name.as_str())
            .collect();
        assert_eq!(parents, vec!["Vehicle", "Machine"]);
    }

    #[test]
    fn variant_of_a_variant_reaches_every_root_above() {
        let g = graph(json!({
            "schemas": {
                "Pet": { "discriminatorField": "kind" },
                "Dog": {
                    "composedOf": ["Pet"],
                    "discriminatorField": "breed",
                    "discriminatorValue": "dog"
                },
                "Corgi": { "composedOf": ["Dog"], "discriminatorValue": "corgi" }
            }
        }));
        let model = materialize(&g);

        // Dog is both a variant under Pet and a root of its own.
        assert_eq!(
            table_of(&model, "Pet"),
            vec![("dog", "Dog"), ("corgi", "Corgi")]
        );
        assert_eq!(table_of(&model, "Dog"), vec![("corgi", "Corgi")]);
    }
}
