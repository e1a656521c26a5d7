//! # Normalized Schemas
//!
//! The two projections emitted by normalization. Both are insertion-ordered
//! mappings from graph key to entity:
//!
//! - [`InputSchema`]: what callers may send; consumed by the validator.
//! - [`OutputSchema`]: what the API returns; consumed by emitters.
//!
//! Scalars, enums and unions are shared `Arc`s of the graph's own nodes.
//! Objects carry a fully resolved, ordered field list; an object with no
//! qualifying fields in a projection is absent from it, never empty.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::graph::{EnumNode, FieldType, ResolverMethod, ScalarNode, UnionNode};
use crate::hooks::{AssertHook, TransformHook};

pub type InputSchema = IndexMap<String, InputNode>;
pub type OutputSchema = IndexMap<String, OutputNode>;

// ─── Input Side ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum InputNode {
    Scalar(Arc<ScalarNode>),
    Enum(Arc<EnumNode>),
    Union(Arc<UnionNode>),
    PlainObject(Arc<InputObject>),
}

impl InputNode {
    pub fn as_object(&self) -> Option<&Arc<InputObject>> {
        match self {
            Self::PlainObject(obj) => Some(obj),
            Self::Scalar(_) | Self::Enum(_) | Self::Union(_) => None,
        }
    }
}

/// Input projection of a `PlainObject`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputObject {
    pub name: String,
    pub escaped_name: String,
    pub id: u32,
    pub deprecated: bool,
    pub doc: Option<String>,
    /// Resolved fields in emission order.
    pub fields: Vec<InputField>,
}

impl InputObject {
    /// Look up a field by wire name.
    pub fn field(&self, name: &str) -> Option<&InputField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputField {
    /// Wire name read from payloads.
    pub name: String,
    /// Internal name written to validated payloads.
    pub target_name: String,
    pub alias: Option<String>,
    pub id: u32,
    pub deprecated: bool,
    pub required: bool,
    pub doc: Option<String>,
    pub default_value: Option<Value>,
    #[serde(rename = "type")]
    pub ty: FieldType,
    #[serde(skip)]
    pub assert: Option<AssertHook>,
    #[serde(skip)]
    pub transform: Option<TransformHook>,
}

// ─── Output Side ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum OutputNode {
    Scalar(Arc<ScalarNode>),
    Enum(Arc<EnumNode>),
    Union(Arc<UnionNode>),
    PlainObject(Arc<OutputObject>),
}

impl OutputNode {
    pub fn as_object(&self) -> Option<&Arc<OutputObject>> {
        match self {
            Self::PlainObject(obj) => Some(obj),
            Self::Scalar(_) | Self::Enum(_) | Self::Union(_) => None,
        }
    }
}

/// Output projection of a `PlainObject`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputObject {
    pub name: String,
    pub escaped_name: String,
    pub id: u32,
    pub deprecated: bool,
    pub doc: Option<String>,
    pub fields: Vec<OutputField>,
}

impl OutputObject {
    pub fn field(&self, name: &str) -> Option<&OutputField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputField {
    pub name: String,
    pub target_name: String,
    pub alias: Option<String>,
    pub id: u32,
    pub deprecated: bool,
    pub required: bool,
    pub doc: Option<String>,
    pub method: Option<ResolverMethod>,
    /// Resolver parameter type, already specialized.
    pub param: Option<FieldType>,
    #[serde(rename = "type")]
    pub ty: FieldType,
    #[serde(skip)]
    pub assert: Option<AssertHook>,
    #[serde(skip)]
    pub transform: Option<TransformHook>,
}
