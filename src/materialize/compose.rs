//! Composition resolution: one pass over a node's declared ancestors.
//!
//! Per ancestor, in declaration order, all four actions complete before the
//! next ancestor is touched: resolve the ancestor's class, register its
//! contract as a structural supertype, create the backing anchor, append the
//! anchor's validation obligations. Discriminator wiring later walks the
//! anchors in exactly this order.

use tracing::debug;

use crate::diagnostics::Error;
use crate::graph::SchemaNode;
use crate::materialize::Materializer;
use crate::model::{BackingAnchor, ClassId, Obligation, ObligationKind};
use crate::naming;

impl<'a> Materializer<'a> {
    pub(crate) fn compose_ancestors(
        &mut self,
        id: ClassId,
        node: &SchemaNode,
    ) -> Result<(), Error> {
        for ancestor_name in &node.composed_of {
            let ancestor = self.resolve(ancestor_name)?;

            // Structural subtyping: the descendant's contract absorbs the
            // ancestor's, so polymorphic storage and dispatch can hold a
            // descendant wherever the ancestor is expected.
            self.classes[id].implements.push(ancestor);

            let type_name = self.classes[ancestor].type_name.clone();
            let field_name = naming::anchor_field_name(&type_name);
            debug!(
                owner = %self.classes[id].name,
                ancestor = %ancestor_name,
                field = %field_name,
                "anchored ancestor"
            );
            self.classes[id].anchors.push(BackingAnchor {
                owner: id,
                ancestor,
                type_name,
                field_name: field_name.clone(),
            });

            // The anchor is always initialized, and its class validates
            // recursively; both checks come from the ancestor's descriptor.
            let descriptor = self.types.resolve_type(ancestor_name);
            if let Some(check) = descriptor.presence_check_for(&field_name) {
                self.classes[id].obligations.push(Obligation {
                    kind: ObligationKind::Presence,
                    field: field_name.clone(),
                    check,
                });
            }
            if let Some(check) = descriptor.value_check_for(&field_name) {
                self.classes[id].obligations.push(Obligation {
                    kind: ObligationKind::Value,
                    field: field_name.clone(),
                    check,
                });
            }
        }
        Ok(())
    }
}
