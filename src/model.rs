// Materialized output model. Pure data; emission stays elsewhere.

use indexmap::IndexMap;

/// Index into the materializer's class arena. Stable for the whole run.
pub type ClassId = usize;

/// How a visible property is physically reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Backed by the class's own storage.
    Owned,
    /// One hop: an ancestor's own member, read through that ancestor's anchor.
    Inherited { anchor: String, member: String },
    /// Multi-hop forwarding chain: anchor/container names terminating in the
    /// final member name, outer-to-inner.
    Inlined { path: Vec<String> },
}

impl Access {
    pub fn kind(&self) -> &'static str {
        match self {
            Access::Owned => "owned",
            Access::Inherited { .. } => "inherited",
            Access::Inlined { .. } => "inlined",
        }
    }

    /// Full accessor segments, final member included.
    pub fn segments<'a>(&'a self, own_name: &'a str) -> Vec<&'a str> {
        match self {
            Access::Owned => vec![own_name],
            Access::Inherited { anchor, member } => vec![anchor.as_str(), member.as_str()],
            Access::Inlined { path } => path.iter().map(String::as_str).collect(),
        }
    }
}

/// A property visible on a materialized class, regardless of where its
/// storage lives.
#[derive(Debug, Clone)]
pub struct VirtualProperty {
    pub name: String,
    /// Name on the wire, for the serialization layer downstream.
    pub wire_name: String,
    pub type_display: String,
    pub description: Option<String>,
    pub required: bool,
    /// Read-only value types get a getter but no setter.
    pub read_only: bool,
    /// Local-access-only composition anchor; listed, but not part of the
    /// public surface descendants re-expose.
    pub private: bool,
    pub access: Access,
}

/// A private, always-initialized instance of a composed ancestor embedded in
/// the descendant to emulate inheritance by composition.
#[derive(Debug, Clone)]
pub struct BackingAnchor {
    pub owner: ClassId,
    pub ancestor: ClassId,
    pub type_name: String,
    pub field_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObligationKind {
    Presence,
    Value,
}

/// One check the class's validation routine must perform, as text supplied
/// by the value type's descriptor.
#[derive(Debug, Clone)]
pub struct Obligation {
    pub kind: ObligationKind,
    pub field: String,
    pub check: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationPlan {
    pub obligations: Vec<Obligation>,
}

/// The output object for one schema node. Created empty, registered, then
/// mutated in place as composition, flattening and discriminator wiring run.
#[derive(Debug, Clone, Default)]
pub struct MaterializedClass {
    /// Schema identity this class was materialized from.
    pub name: String,
    pub type_name: String,
    pub properties: Vec<VirtualProperty>,
    /// One anchor per direct ancestor, declaration order.
    pub anchors: Vec<BackingAnchor>,
    /// Structural supertype contracts, one per direct ancestor.
    pub implements: Vec<ClassId>,
    pub is_polymorphic: bool,
    pub discriminator_field: Option<String>,
    pub discriminator_value: Option<String>,
    /// Dispatch table of a polymorphic root: value → concrete variant.
    /// Keys are unique; insertion order is registration order.
    pub discriminator_table: IndexMap<String, ClassId>,
    /// Ancestors that are polymorphic roots or transitively lead to one.
    pub parent_polymorphic: Vec<ClassId>,
    pub open_properties: bool,
    pub obligations: Vec<Obligation>,
    pub validation: Option<ValidationPlan>,
}

impl MaterializedClass {
    pub fn property(&self, name: &str) -> Option<&VirtualProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn anchor_for(&self, ancestor: ClassId) -> Option<&BackingAnchor> {
        self.anchors.iter().find(|a| a.ancestor == ancestor)
    }
}
