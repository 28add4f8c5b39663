//! Validation finalization: decide whether the class exposes a validation
//! entry point, from the obligations accumulated by composition (ancestor
//! order) and flattening (owned-property order). Pure bookkeeping, no I/O.

use crate::materialize::Materializer;
use crate::model::{ClassId, ValidationPlan};

impl<'a> Materializer<'a> {
    pub(crate) fn finalize_validation(&mut self, id: ClassId) {
        if !self.options.validation {
            return;
        }
        let class = &mut self.classes[id];
        if class.obligations.is_empty() {
            return;
        }
        class.validation = Some(ValidationPlan {
            obligations: class.obligations.clone(),
        });
    }
}
