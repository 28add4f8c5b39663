//! Property flattening: compute every property visible on a class and the
//! access path that reaches it.
//!
//! Three passes, fixed order:
//! 1. Owned: declared directly on the node; private ones feed the lookup
//!    table that routes multi-hop paths.
//! 2. Inherited: an ancestor's own member, one hop through that ancestor's
//!    anchor.
//! 3. Inlined: anything deeper, meaning ancestor-of-ancestor surfaces re-anchored
//!    through this class's anchors, and members hoisted out of pass-through
//!    container properties. A chain whose container cannot be resolved is
//!    skipped and reported; a broken path is never emitted.
//!
//! Shadowing is not resolved here: every pass appends, first registration
//! wins at the storage layer, and later same-name arrivals are reported.

use std::collections::{HashMap, HashSet};

use crate::diagnostics::{Diagnostic, Error};
use crate::graph::SchemaNode;
use crate::materialize::Materializer;
use crate::model::{Access, ClassId, Obligation, ObligationKind, VirtualProperty};

impl<'a> Materializer<'a> {
    pub(crate) fn flatten_properties(
        &mut self,
        id: ClassId,
        node: &SchemaNode,
    ) -> Result<(), Error> {
        let mut seen = HashSet::<String>::new();
        // name → accessor segment, for routing inlined chains (pass 3b).
        let mut private_lookup = HashMap::<String, String>::new();

        // ---- pass 1: owned ----
        for (name, prop) in &node.properties {
            let descriptor = self.types.resolve_type(&prop.type_ref);
            if prop.private {
                // Reduced visibility, not absence: the entry below stays.
                private_lookup.insert(name.clone(), name.clone());
            }
            self.push_property(
                id,
                &mut seen,
                VirtualProperty {
                    name: name.clone(),
                    wire_name: prop.wire_name_or(name).to_string(),
                    type_display: descriptor.display.clone(),
                    description: prop.description.clone(),
                    required: prop.required,
                    read_only: descriptor.read_only,
                    private: prop.private,
                    access: Access::Owned,
                },
            );

            if prop.required {
                if let Some(check) = descriptor.presence_check_for(name) {
                    self.classes[id].obligations.push(Obligation {
                        kind: ObligationKind::Presence,
                        field: name.clone(),
                        check,
                    });
                }
            }
            if let Some(check) = descriptor.value_check_for(name) {
                self.classes[id].obligations.push(Obligation {
                    kind: ObligationKind::Value,
                    field: name.clone(),
                    check,
                });
            }
        }

        // ---- pass 2: inherited ----
        for k in 0..self.classes[id].anchors.len() {
            let (ancestor, anchor_field) = {
                let anchor = &self.classes[id].anchors[k];
                (anchor.ancestor, anchor.field_name.clone())
            };
            let hoisted: Vec<VirtualProperty> = self.classes[ancestor]
                .properties
                .iter()
                .filter(|vp| matches!(vp.access, Access::Owned) && !vp.private)
                .map(|vp| VirtualProperty {
                    private: false,
                    access: Access::Inherited {
                        anchor: anchor_field.clone(),
                        member: vp.name.clone(),
                    },
                    ..vp.clone()
                })
                .collect();
            for vp in hoisted {
                self.push_property(id, &mut seen, vp);
            }
        }

        // ---- pass 3a: inlined through anchor chains ----
        for k in 0..self.classes[id].anchors.len() {
            let (ancestor, anchor_field) = {
                let anchor = &self.classes[id].anchors[k];
                (anchor.ancestor, anchor.field_name.clone())
            };
            let hoisted: Vec<VirtualProperty> = self.classes[ancestor]
                .properties
                .iter()
                .filter_map(|vp| {
                    let path = match &vp.access {
                        // The ancestor's own surface was pass 2's job.
                        Access::Owned => return None,
                        Access::Inherited { anchor, member } => {
                            vec![anchor_field.clone(), anchor.clone(), member.clone()]
                        }
                        Access::Inlined { path } => {
                            let mut chained = Vec::with_capacity(path.len() + 1);
                            chained.push(anchor_field.clone());
                            chained.extend(path.iter().cloned());
                            chained
                        }
                    };
                    Some(VirtualProperty {
                        private: false,
                        access: Access::Inlined { path },
                        ..vp.clone()
                    })
                })
                .collect();
            for vp in hoisted {
                self.push_property(id, &mut seen, vp);
            }
        }

        // ---- pass 3b: inlined through pass-through containers ----
        for (name, prop) in node.properties.iter().filter(|(_, p)| p.inline) {
            let descriptor = self.types.resolve_type(&prop.type_ref);
            let Some(target) = descriptor.object_schema else {
                self.report_unresolved_inline(
                    id,
                    name,
                    format!("type `{}` is not a modeled object schema", prop.type_ref),
                );
                continue;
            };
            let Some(via) = private_lookup.get(name).cloned() else {
                self.report_unresolved_inline(
                    id,
                    name,
                    "container does not resolve to a private owned property".to_string(),
                );
                continue;
            };
            let inner = self.resolve(&target)?;
            let hoisted: Vec<VirtualProperty> = self.classes[inner]
                .properties
                .iter()
                .filter(|vp| !vp.private)
                .map(|vp| {
                    let path = match &vp.access {
                        Access::Owned => vec![via.clone(), vp.name.clone()],
                        Access::Inherited { anchor, member } => {
                            vec![via.clone(), anchor.clone(), member.clone()]
                        }
                        Access::Inlined { path } => {
                            let mut chained = Vec::with_capacity(path.len() + 1);
                            chained.push(via.clone());
                            chained.extend(path.iter().cloned());
                            chained
                        }
                    };
                    VirtualProperty {
                        private: false,
                        access: Access::Inlined { path },
                        ..vp.clone()
                    }
                })
                .collect();
            for vp in hoisted {
                self.push_property(id, &mut seen, vp);
            }
        }

        Ok(())
    }

    fn push_property(&mut self, id: ClassId, seen: &mut HashSet<String>, vp: VirtualProperty) {
        if !seen.insert(vp.name.clone()) {
            self.diagnostics.report(Diagnostic::NameCollision {
                schema: self.classes[id].name.clone(),
                name: vp.name.clone(),
            });
        }
        // No dedup: first registration wins at the storage layer.
        self.classes[id].properties.push(vp);
    }

    fn report_unresolved_inline(&mut self, id: ClassId, container: &str, reason: String) {
        self.diagnostics.report(Diagnostic::UnresolvedInlinePath {
            schema: self.classes[id].name.clone(),
            container: container.to_string(),
            reason,
        });
    }
}
