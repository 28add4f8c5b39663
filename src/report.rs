//! JSON inspection view of a materialized model.
//!
//! One entry per class in registration order; property order, anchor order
//! and table order are preserved so the output is diff-stable across runs of
//! the same graph.

use serde_json::{Value, json};

use crate::materialize::Model;
use crate::model::{Access, MaterializedClass, ObligationKind};

pub fn report(model: &Model) -> Value {
    json!({
        "generatedAt": chrono::Utc::now().to_rfc3339(),
        "classes": model
            .classes()
            .iter()
            .map(|class| class_entry(model, class))
            .collect::<Vec<_>>(),
    })
}

fn class_entry(model: &Model, class: &MaterializedClass) -> Value {
    let mut entry = json!({
        "name": class.name,
        "typeName": class.type_name,
        "implements": class
            .implements
            .iter()
            .map(|&id| Value::from(model.class(id).type_name.clone()))
            .collect::<Vec<_>>(),
        "anchors": class
            .anchors
            .iter()
            .map(|a| json!({ "fieldName": a.field_name, "typeName": a.type_name }))
            .collect::<Vec<_>>(),
        "properties": class
            .properties
            .iter()
            .map(property_entry)
            .collect::<Vec<_>>(),
    });

    if class.open_properties {
        entry["openProperties"] = Value::from(true);
    }
    if class.is_polymorphic {
        entry["polymorphic"] = json!({
            "field": class.discriminator_field,
            "table": class
                .discriminator_table
                .iter()
                .map(|(value, &id)| (value.clone(), Value::from(model.class(id).type_name.clone())))
                .collect::<serde_json::Map<String, Value>>(),
        });
    }
    if let Some(value) = &class.discriminator_value {
        entry["discriminatorValue"] = Value::from(value.clone());
    }
    if let Some(plan) = &class.validation {
        entry["validation"] = json!({
            "obligations": plan
                .obligations
                .iter()
                .map(|o| json!({
                    "kind": match o.kind {
                        ObligationKind::Presence => "presence",
                        ObligationKind::Value => "value",
                    },
                    "field": o.field,
                    "check": o.check,
                }))
                .collect::<Vec<_>>(),
        });
    }
    entry
}

fn property_entry(vp: &crate::model::VirtualProperty) -> Value {
    let mut entry = json!({
        "name": vp.name,
        "wireName": vp.wire_name,
        "type": vp.type_display,
        "kind": vp.access.kind(),
        "accessor": vp.access.segments(&vp.name).join("."),
        "required": vp.required,
        "settable": !vp.read_only,
    });
    match &vp.access {
        Access::Owned => {}
        Access::Inherited { anchor, member } => {
            entry["accessPath"] = json!([anchor]);
            entry["member"] = Value::from(member.clone());
        }
        Access::Inlined { path } => {
            entry["accessPath"] = json!(path);
        }
    }
    if vp.private {
        entry["private"] = Value::from(true);
    }
    if let Some(description) = &vp.description {
        entry["description"] = Value::from(description.clone());
    }
    entry
}
