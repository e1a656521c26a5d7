//! # Type Graph
//!
//! The normalizer's input: a mapping from globally unique entity name to a
//! declaration node, as produced by a front-end that scans annotated
//! declarations.
//!
//! ## Shape
//!
//! ```text
//! TypeGraph ── name ──▶ Node::Scalar | Node::Enum | Node::Union
//!                      Node::PlainObject
//!                        ├── inherit:        [Ancestor, ...]   (nearest first)
//!                        ├── generics:       [T, ...]          (template marker)
//!                        ├── fields:         name ─▶ Field     (declared here)
//!                        └── visible_fields: name ─▶ VisibleField (incl. inherited)
//!
//! Field ─┬─ input:  InputVariant  { name, id, ty, default_value, hooks, .. }
//!        └─ output: OutputVariant { name, id, ty, method, param, hooks, .. }
//!
//! FieldType = List { element, hooks } | Reference { name, params }
//! ```
//!
//! ## Invariants
//!
//! - Entity names are unique ([`TypeGraph::insert`] rejects duplicates).
//! - A `PlainObject` with `generics` set is a template; only its
//!   specializations reach the normalized schemas.
//! - A field's requiredness is `!VisibleField::optional`, independent of
//!   its type.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GraphError;
use crate::hooks::{AssertHook, TransformHook};

/// Placeholder used in messages when the front-end recorded no location.
pub const UNKNOWN_LOCATION: &str = "<unknown>";

// ─── Node Kinds ──────────────────────────────────────────────────────

/// Discriminant of [`Node`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Scalar,
    Enum,
    Union,
    PlainObject,
    List,
    Reference,
    Field,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Scalar => "Scalar",
            Self::Enum => "Enum",
            Self::Union => "Union",
            Self::PlainObject => "PlainObject",
            Self::List => "List",
            Self::Reference => "Reference",
            Self::Field => "Field",
        };
        f.write_str(s)
    }
}

/// A declaration node. Closed set; match exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Node {
    Scalar(Arc<ScalarNode>),
    Enum(Arc<EnumNode>),
    Union(Arc<UnionNode>),
    PlainObject(Arc<PlainObject>),
    List(ListType),
    Reference(Reference),
    Field(Box<Field>),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Scalar(_) => NodeKind::Scalar,
            Self::Enum(_) => NodeKind::Enum,
            Self::Union(_) => NodeKind::Union,
            Self::PlainObject(_) => NodeKind::PlainObject,
            Self::List(_) => NodeKind::List,
            Self::Reference(_) => NodeKind::Reference,
            Self::Field(_) => NodeKind::Field,
        }
    }

    /// The `PlainObject` payload, if this is one.
    pub fn as_plain_object(&self) -> Option<&Arc<PlainObject>> {
        match self {
            Self::PlainObject(obj) => Some(obj),
            _ => None,
        }
    }
}

// ─── Passthrough Entities ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarNode {
    pub name: String,
    #[serde(default)]
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumNode {
    pub name: String,
    #[serde(default)]
    pub doc: Option<String>,
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub value: Value,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionNode {
    pub name: String,
    #[serde(default)]
    pub doc: Option<String>,
    /// Member types, in declaration order.
    pub types: Vec<Reference>,
}

// ─── Plain Objects ───────────────────────────────────────────────────

/// A class or interface declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlainObject {
    /// Declared name. For specializations, the human-readable `Base<Args>`.
    pub name: String,
    /// Graph key. `None` for hand-authored entities, whose key is `name`.
    #[serde(default)]
    pub escaped_name: Option<String>,
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub doc: Option<String>,
    /// Declaring source file.
    #[serde(default)]
    pub file_name: Option<String>,
    /// Ancestor names, nearest first.
    #[serde(default)]
    pub inherit: Option<Vec<String>>,
    /// Type parameter names. `Some` marks a template.
    #[serde(default)]
    pub generics: Option<Vec<String>>,
    /// Fields declared directly on this entity.
    #[serde(default)]
    pub fields: IndexMap<String, Field>,
    /// Flattened set of exposed fields, including inherited ones.
    #[serde(default)]
    pub visible_fields: IndexMap<String, VisibleField>,
}

impl PlainObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            escaped_name: None,
            id: 0,
            deprecated: false,
            doc: None,
            file_name: None,
            inherit: None,
            generics: None,
            fields: IndexMap::new(),
            visible_fields: IndexMap::new(),
        }
    }

    /// The key this entity is registered under.
    pub fn escaped_name(&self) -> &str {
        self.escaped_name.as_deref().unwrap_or(&self.name)
    }

    /// Whether this entity is a generic template.
    pub fn is_template(&self) -> bool {
        self.generics.is_some()
    }

    /// Ancestor names, nearest first; empty when nothing is inherited.
    pub fn ancestors(&self) -> &[String] {
        self.inherit.as_deref().unwrap_or(&[])
    }

    pub fn location(&self) -> &str {
        self.file_name.as_deref().unwrap_or(UNKNOWN_LOCATION)
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_inherit<I, S>(mut self, ancestors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inherit = Some(ancestors.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_generics<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generics = Some(params.into_iter().map(Into::into).collect());
        self
    }

    /// Declare `field` on this entity and expose it.
    pub fn with_field(mut self, field: Field, optional: bool) -> Self {
        self.visible_fields.insert(
            field.name.clone(),
            VisibleField {
                origin: None,
                index: field.index,
                optional,
            },
        );
        self.fields.insert(field.name.clone(), field);
        self
    }

    /// Expose a field declared on `ancestor`.
    pub fn with_inherited_field(
        mut self,
        ancestor: impl Into<String>,
        field: impl Into<String>,
        index: usize,
        optional: bool,
    ) -> Self {
        self.visible_fields.insert(
            field.into(),
            VisibleField {
                origin: Some(ancestor.into()),
                index,
                optional,
            },
        );
        self
    }
}

/// One entry of an entity's flattened field set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleField {
    /// Ancestor the field was inherited from; `None` when declared locally.
    #[serde(default)]
    pub origin: Option<String>,
    /// Declaration order index.
    pub index: usize,
    /// Optionality marker captured at declaration time.
    #[serde(default)]
    pub optional: bool,
}

impl VisibleField {
    pub fn required(&self) -> bool {
        !self.optional
    }
}

// ─── Fields ──────────────────────────────────────────────────────────

/// A declared field with independent input and output projections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Internal (target) name.
    pub name: String,
    /// Declaration order within `owner`.
    pub index: usize,
    /// Entity that declared the field.
    pub owner: String,
    #[serde(default)]
    pub input: Option<InputVariant>,
    #[serde(default)]
    pub output: Option<OutputVariant>,
}

impl Field {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
            owner: owner.into(),
            input: None,
            output: None,
        }
    }

    /// A field exposed on both sides under its own name with the same type.
    pub fn both(
        owner: impl Into<String>,
        name: impl Into<String>,
        index: usize,
        ty: FieldType,
    ) -> Self {
        let name = name.into();
        Self::new(owner, name.clone(), index)
            .with_input(InputVariant::new(name.clone(), ty.clone()))
            .with_output(OutputVariant::new(name, ty))
    }

    pub fn with_input(mut self, input: InputVariant) -> Self {
        self.input = Some(input);
        self
    }

    pub fn with_output(mut self, output: OutputVariant) -> Self {
        self.output = Some(output);
        self
    }
}

/// Input-facing projection of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputVariant {
    /// External wire name.
    pub name: String,
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(skip)]
    pub assert: Option<AssertHook>,
    #[serde(skip)]
    pub transform: Option<TransformHook>,
    #[serde(rename = "type")]
    pub ty: FieldType,
    #[serde(default)]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub file_name: Option<String>,
}

impl InputVariant {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            id: 0,
            alias: None,
            deprecated: false,
            doc: None,
            assert: None,
            transform: None,
            ty,
            default_value: None,
            file_name: None,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_assert(mut self, hook: AssertHook) -> Self {
        self.assert = Some(hook);
        self
    }

    pub fn with_transform(mut self, hook: TransformHook) -> Self {
        self.transform = Some(hook);
        self
    }

    pub fn location(&self) -> &str {
        self.file_name.as_deref().unwrap_or(UNKNOWN_LOCATION)
    }
}

/// Binding of an output field to a resolver method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverMethod {
    /// Entity or resolver class that implements the method.
    pub owner: String,
    pub method: String,
}

/// Output-facing projection of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputVariant {
    /// External wire name.
    pub name: String,
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(skip)]
    pub assert: Option<AssertHook>,
    #[serde(skip)]
    pub transform: Option<TransformHook>,
    #[serde(rename = "type")]
    pub ty: FieldType,
    #[serde(default)]
    pub method: Option<ResolverMethod>,
    /// Type of the resolver's argument parameter.
    #[serde(default)]
    pub param: Option<FieldType>,
    #[serde(default)]
    pub file_name: Option<String>,
}

impl OutputVariant {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            id: 0,
            alias: None,
            deprecated: false,
            doc: None,
            assert: None,
            transform: None,
            ty,
            method: None,
            param: None,
            file_name: None,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_method(mut self, method: ResolverMethod, param: Option<FieldType>) -> Self {
        self.method = Some(method);
        self.param = param;
        self
    }

    pub fn location(&self) -> &str {
        self.file_name.as_deref().unwrap_or(UNKNOWN_LOCATION)
    }
}

// ─── Field Types ─────────────────────────────────────────────────────

/// Declared type of a field: any number of list wrappers around a reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum FieldType {
    List(ListType),
    Reference(Reference),
}

impl FieldType {
    /// Reference to a non-generic entity.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Reference(Reference::new(name))
    }

    /// Reference to a generic template with type arguments.
    pub fn generic(name: impl Into<String>, params: Vec<FieldType>) -> Self {
        Self::Reference(Reference {
            name: name.into(),
            params: Some(params),
            file_name: None,
        })
    }

    pub fn list(element: FieldType) -> Self {
        Self::List(ListType::new(element))
    }

    /// The reference under all list wrappers.
    pub fn terminal(&self) -> &Reference {
        let mut ty = self;
        loop {
            match ty {
                Self::List(list) => ty = list.element.as_ref(),
                Self::Reference(reference) => return reference,
            }
        }
    }

    /// Number of list wrappers around the terminal reference.
    pub fn list_depth(&self) -> usize {
        match self {
            Self::List(list) => 1 + list.element.list_depth(),
            Self::Reference(_) => 0,
        }
    }
}

/// A list wrapper. Its hooks run once per element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListType {
    pub element: Box<FieldType>,
    #[serde(skip)]
    pub assert: Option<AssertHook>,
    #[serde(skip)]
    pub transform: Option<TransformHook>,
}

impl ListType {
    pub fn new(element: FieldType) -> Self {
        Self {
            element: Box::new(element),
            assert: None,
            transform: None,
        }
    }

    pub fn with_assert(mut self, hook: AssertHook) -> Self {
        self.assert = Some(hook);
        self
    }

    pub fn with_transform(mut self, hook: TransformHook) -> Self {
        self.transform = Some(hook);
        self
    }
}

/// A named type, with type arguments when it points at a generic template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub name: String,
    #[serde(default)]
    pub params: Option<Vec<FieldType>>,
    #[serde(default)]
    pub file_name: Option<String>,
}

impl Reference {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: None,
            file_name: None,
        }
    }

    pub fn location(&self) -> &str {
        self.file_name.as_deref().unwrap_or(UNKNOWN_LOCATION)
    }
}

// ─── Graph ───────────────────────────────────────────────────────────

/// Insertion-ordered mapping from entity name to declaration node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeGraph {
    #[serde(default, deserialize_with = "unique_entities")]
    entities: IndexMap<String, Node>,
}

/// Load entities through the same duplicate check as [`TypeGraph::insert`].
fn unique_entities<'de, D>(deserializer: D) -> Result<IndexMap<String, Node>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntitiesVisitor;

    impl<'de> Visitor<'de> for EntitiesVisitor {
        type Value = IndexMap<String, Node>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map from entity name to node")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut graph = TypeGraph::new();
            while let Some((name, node)) = access.next_entry::<String, Node>()? {
                graph
                    .insert(name, node)
                    .map_err(<A::Error as de::Error>::custom)?;
            }
            Ok(graph.entities)
        }
    }

    deserializer.deserialize_map(EntitiesVisitor)
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node` under `name`.
    ///
    /// # Errors
    ///
    /// [`GraphError::DuplicateEntity`] if the name is taken.
    pub fn insert(&mut self, name: impl Into<String>, node: Node) -> Result<(), GraphError> {
        let name = name.into();
        if self.entities.contains_key(&name) {
            return Err(GraphError::DuplicateEntity { name });
        }
        self.entities.insert(name, node);
        Ok(())
    }

    /// Register a `PlainObject` under its escaped name and return the shared instance.
    pub fn insert_object(&mut self, object: PlainObject) -> Result<Arc<PlainObject>, GraphError> {
        let name = object.escaped_name().to_string();
        let object = Arc::new(object);
        self.insert(name, Node::PlainObject(Arc::clone(&object)))?;
        Ok(object)
    }

    /// Register an undocumented scalar.
    pub fn insert_scalar(&mut self, name: impl Into<String>) -> Result<(), GraphError> {
        let name = name.into();
        let node = Node::Scalar(Arc::new(ScalarNode {
            name: name.clone(),
            doc: None,
        }));
        self.insert(name, node)
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.entities.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
