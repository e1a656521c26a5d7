//! # Normalizer
//!
//! Drains a work-list of graph entries to a fixed point and emits the
//! input and output schema projections.
//!
//! ## Processing
//!
//! ```text
//! work_list = graph entries (in graph order)
//! cursor ──▶ Scalar | Enum | Union   → shared into both schemas
//!            PlainObject (template)  → skipped
//!            PlainObject             → resolve visible fields
//!                                      order (when inheriting)
//!                                      project input / output fields
//!                                      resolve generic field types ──▶ may push
//!                                                                     specializations
//!            List | Reference | Field → GraphError::UnexpectedKind
//! ```
//!
//! Every entry, including specializations discovered mid-drain, is visited
//! exactly once. The input graph is never mutated: specializations live in
//! a memo overlay consulted alongside it for every lookup.
//!
//! A specialization created while normalizing another specialization sits
//! one level deeper. Depth is capped at [`MAX_SPECIALIZATION_DEPTH`] so a
//! template that instantiates itself with ever-growing arguments fails
//! instead of growing the work-list forever.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use modelgraph_core::{
    Field, FieldType, GraphError, InputField, InputNode, InputObject, InputSchema, InputVariant,
    ListType, Node, OutputField, OutputNode, OutputObject, OutputSchema, OutputVariant,
    PlainObject, Reference, TypeGraph, VisibleField,
};

use crate::diagnostics::Diagnostic;
use crate::generic::{escaped_reference_name, generic_reference_name, specialize};

/// Annotation appended to the documentation of inherited fields.
pub const INHERIT_DOC_TAG: &str = "@inherit-from";

/// Deepest chain of specializations created from one another.
pub const MAX_SPECIALIZATION_DEPTH: usize = 32;

/// Result of a successful [`normalize`] call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSchemas {
    pub input: InputSchema,
    pub output: OutputSchema,
    /// Synthesized generic specializations, in creation order.
    pub specializations: Vec<Arc<PlainObject>>,
    /// Field-resolution warnings, in emission order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Normalize `graph` into its input and output schemas.
///
/// # Errors
///
/// Any [`GraphError`] aborts the whole call; no partial schema is returned.
pub fn normalize(graph: &TypeGraph) -> Result<NormalizedSchemas, GraphError> {
    Normalizer::new(graph).run()
}

/// A field matched to its owning declaration.
struct ResolvedField {
    field: Field,
    required: bool,
    /// `Ancestor.field` when inherited.
    inherited_from: Option<String>,
    /// Ancestor name when inherited.
    ancestor: Option<String>,
}

/// Where a field type came from, for error messages.
struct FieldContext<'a> {
    /// Declaring entity: the ancestor for inherited fields.
    owner: &'a str,
    field: &'a str,
    location: &'a str,
}

struct Normalizer<'g> {
    graph: &'g TypeGraph,
    work_list: Vec<(String, Node)>,
    specializations: IndexMap<String, Arc<PlainObject>>,
    /// Specialization depth by escaped name; graph entities are depth 0.
    depths: HashMap<String, usize>,
    /// Depth of the entity currently being normalized.
    current_depth: usize,
    input: InputSchema,
    output: OutputSchema,
    diagnostics: Vec<Diagnostic>,
}

impl<'g> Normalizer<'g> {
    fn new(graph: &'g TypeGraph) -> Self {
        Self {
            graph,
            work_list: graph
                .iter()
                .map(|(name, node)| (name.clone(), node.clone()))
                .collect(),
            specializations: IndexMap::new(),
            depths: HashMap::new(),
            current_depth: 0,
            input: InputSchema::new(),
            output: OutputSchema::new(),
            diagnostics: Vec::new(),
        }
    }

    fn run(mut self) -> Result<NormalizedSchemas, GraphError> {
        let mut cursor = 0;
        while cursor < self.work_list.len() {
            let (name, node) = self.work_list[cursor].clone();
            cursor += 1;
            match node {
                Node::Scalar(scalar) => {
                    self.input
                        .insert(name.clone(), InputNode::Scalar(Arc::clone(&scalar)));
                    self.output.insert(name, OutputNode::Scalar(scalar));
                }
                Node::Enum(en) => {
                    self.input.insert(name.clone(), InputNode::Enum(Arc::clone(&en)));
                    self.output.insert(name, OutputNode::Enum(en));
                }
                Node::Union(union) => {
                    self.input
                        .insert(name.clone(), InputNode::Union(Arc::clone(&union)));
                    self.output.insert(name, OutputNode::Union(union));
                }
                Node::PlainObject(object) => {
                    self.current_depth = self.depths.get(&name).copied().unwrap_or(0);
                    self.normalize_object(&name, &object)?;
                }
                Node::List(_) | Node::Reference(_) | Node::Field(_) => {
                    return Err(GraphError::UnexpectedKind {
                        kind: node.kind(),
                        name,
                    });
                }
            }
        }

        info!(
            entities = cursor,
            input = self.input.len(),
            output = self.output.len(),
            specializations = self.specializations.len(),
            warnings = self.diagnostics.len(),
            "type graph normalized"
        );

        Ok(NormalizedSchemas {
            input: self.input,
            output: self.output,
            specializations: self.specializations.into_values().collect(),
            diagnostics: self.diagnostics,
        })
    }

    /// Look up an entity in the graph, then in the specialization overlay.
    fn entity(&self, name: &str) -> Option<Node> {
        if let Some(node) = self.graph.get(name) {
            return Some(node.clone());
        }
        self.specializations
            .get(name)
            .map(|object| Node::PlainObject(Arc::clone(object)))
    }

    fn normalize_object(&mut self, key: &str, object: &PlainObject) -> Result<(), GraphError> {
        if object.is_template() {
            debug!(entity = %object.name, "skipping generic template");
            return Ok(());
        }

        let mut resolved = Vec::with_capacity(object.visible_fields.len());
        for (field_name, visible) in &object.visible_fields {
            if let Some(field) = self.resolve_visible_field(object, field_name, visible)? {
                resolved.push(field);
            }
        }

        let ancestors = object.ancestors();
        if !ancestors.is_empty() {
            // Root-most ancestor first, self-declared last, then declaration order.
            resolved.sort_by_key(|r| {
                let rank = ancestors
                    .iter()
                    .position(|a| *a == r.field.owner)
                    .map_or(-1, |i| i as isize);
                (Reverse(rank), r.field.index)
            });
        }

        let mut input_fields = Vec::new();
        let mut output_fields = Vec::new();
        for r in &resolved {
            if let Some(input) = &r.field.input {
                input_fields.push(self.input_field(object, r, input)?);
            }
            if let Some(output) = &r.field.output {
                output_fields.push(self.output_field(object, r, output)?);
            }
        }

        debug!(
            entity = %key,
            input_fields = input_fields.len(),
            output_fields = output_fields.len(),
            "normalized object"
        );

        if !input_fields.is_empty() {
            let normalized = InputObject {
                name: object.name.clone(),
                escaped_name: key.to_string(),
                id: object.id,
                deprecated: object.deprecated,
                doc: object.doc.clone(),
                fields: input_fields,
            };
            self.input
                .insert(key.to_string(), InputNode::PlainObject(Arc::new(normalized)));
        }
        if !output_fields.is_empty() {
            let normalized = OutputObject {
                name: object.name.clone(),
                escaped_name: key.to_string(),
                id: object.id,
                deprecated: object.deprecated,
                doc: object.doc.clone(),
                fields: output_fields,
            };
            self.output
                .insert(key.to_string(), OutputNode::PlainObject(Arc::new(normalized)));
        }
        Ok(())
    }

    /// Find the declaration behind a visible field: on the entity itself,
    /// then on the recorded origin, then on each ancestor in inherit order.
    fn resolve_visible_field(
        &mut self,
        object: &PlainObject,
        field_name: &str,
        visible: &VisibleField,
    ) -> Result<Option<ResolvedField>, GraphError> {
        if let Some(field) = object.fields.get(field_name) {
            return Ok(Some(ResolvedField {
                field: field.clone(),
                required: visible.required(),
                inherited_from: None,
                ancestor: None,
            }));
        }

        let mut searched = Vec::new();
        for ancestor in visible.origin.iter().chain(object.ancestors()) {
            if searched.contains(ancestor) {
                continue;
            }
            searched.push(ancestor.clone());
            let owner = match self.entity(ancestor) {
                Some(Node::PlainObject(owner)) => owner,
                Some(other) => {
                    return Err(GraphError::NotAPlainObject {
                        name: ancestor.clone(),
                        kind: other.kind(),
                        referenced_by: format!("{}.{field_name}", object.name),
                        location: object.location().to_string(),
                    });
                }
                None => {
                    return Err(GraphError::MissingEntity {
                        name: ancestor.clone(),
                        referenced_by: format!("{}.{field_name}", object.name),
                        location: object.location().to_string(),
                    });
                }
            };
            if let Some(field) = owner.fields.get(field_name) {
                return Ok(Some(ResolvedField {
                    field: field.clone(),
                    required: visible.required(),
                    inherited_from: Some(format!("{}.{field_name}", owner.name)),
                    ancestor: Some(owner.name.clone()),
                }));
            }
        }

        warn!(
            entity = %object.name,
            field = %field_name,
            location = %object.location(),
            "ignored visible field without an owning declaration"
        );
        self.diagnostics.push(Diagnostic::UnresolvedField {
            entity: object.name.clone(),
            field: field_name.to_string(),
            searched,
            location: object.location().to_string(),
        });
        Ok(None)
    }

    fn input_field(
        &mut self,
        object: &PlainObject,
        resolved: &ResolvedField,
        input: &InputVariant,
    ) -> Result<InputField, GraphError> {
        let context = FieldContext {
            owner: resolved.ancestor.as_deref().unwrap_or(&object.name),
            field: &input.name,
            location: input.location(),
        };
        Ok(InputField {
            name: input.name.clone(),
            target_name: resolved.field.name.clone(),
            alias: input.alias.clone(),
            id: input.id,
            deprecated: input.deprecated,
            required: resolved.required,
            doc: inherited_doc(input.doc.as_deref(), resolved.inherited_from.as_deref()),
            default_value: input.default_value.clone(),
            ty: self.resolve_type(&input.ty, &context)?,
            assert: input.assert.clone(),
            transform: input.transform.clone(),
        })
    }

    fn output_field(
        &mut self,
        object: &PlainObject,
        resolved: &ResolvedField,
        output: &OutputVariant,
    ) -> Result<OutputField, GraphError> {
        let context = FieldContext {
            owner: resolved.ancestor.as_deref().unwrap_or(&object.name),
            field: &output.name,
            location: output.location(),
        };
        let param = match &output.param {
            Some(param) => Some(self.resolve_type(param, &context)?),
            None => None,
        };
        Ok(OutputField {
            name: output.name.clone(),
            target_name: resolved.field.name.clone(),
            alias: output.alias.clone(),
            id: output.id,
            deprecated: output.deprecated,
            required: resolved.required,
            doc: inherited_doc(output.doc.as_deref(), resolved.inherited_from.as_deref()),
            method: output.method.clone(),
            param,
            ty: self.resolve_type(&output.ty, &context)?,
            assert: output.assert.clone(),
            transform: output.transform.clone(),
        })
    }

    /// Replace a generic terminal reference by its specialization, keeping
    /// the surrounding list wrappers. Non-generic types are returned as-is.
    fn resolve_type(
        &mut self,
        ty: &FieldType,
        context: &FieldContext<'_>,
    ) -> Result<FieldType, GraphError> {
        let reference = ty.terminal();
        if reference.params.is_none() {
            return Ok(ty.clone());
        }
        let concrete = self.resolve_generic(reference, context)?;
        Ok(rewrap(ty, concrete))
    }

    fn resolve_generic(
        &mut self,
        reference: &Reference,
        context: &FieldContext<'_>,
    ) -> Result<Reference, GraphError> {
        let referenced_by = format!("{}.{}", context.owner, context.field);
        let template = match self.entity(&reference.name) {
            Some(Node::PlainObject(template)) => template,
            Some(other) => {
                return Err(GraphError::NotAPlainObject {
                    name: reference.name.clone(),
                    kind: other.kind(),
                    referenced_by,
                    location: context.location.to_string(),
                });
            }
            None => {
                return Err(GraphError::MissingEntity {
                    name: reference.name.clone(),
                    referenced_by,
                    location: context.location.to_string(),
                });
            }
        };

        let escaped = escaped_reference_name(reference);
        let generic_name = generic_reference_name(reference);
        if self.graph.contains(&escaped) {
            return Err(GraphError::GenericNameCollision {
                escaped_name: escaped,
                generic_name,
                location: reference.location().to_string(),
            });
        }

        if let Some(existing) = self.specializations.get(&escaped) {
            // `Pair<X, Y_Z>` and `Pair<X_Y, Z>` escape alike.
            if existing.name != generic_name {
                return Err(GraphError::GenericNameCollision {
                    escaped_name: escaped,
                    generic_name,
                    location: reference.location().to_string(),
                });
            }
        } else {
            let depth = self.current_depth + 1;
            if depth > MAX_SPECIALIZATION_DEPTH {
                return Err(GraphError::GenericExpansion {
                    template: template.name.clone(),
                    generic_name,
                    referenced_by,
                    limit: MAX_SPECIALIZATION_DEPTH,
                    location: context.location.to_string(),
                });
            }
            let specialized = Arc::new(specialize(&template, reference, &escaped)?);
            debug!(
                generic = %specialized.name,
                escaped = %escaped,
                referenced_by = %referenced_by,
                "specialized generic entity"
            );
            self.specializations
                .insert(escaped.clone(), Arc::clone(&specialized));
            self.depths.insert(escaped.clone(), depth);
            self.work_list
                .push((escaped.clone(), Node::PlainObject(specialized)));
        }

        Ok(Reference {
            name: escaped,
            params: None,
            file_name: reference.file_name.clone(),
        })
    }
}

/// Rebuild `ty` with its terminal reference replaced by `concrete`.
fn rewrap(ty: &FieldType, concrete: Reference) -> FieldType {
    match ty {
        FieldType::List(list) => FieldType::List(ListType {
            element: Box::new(rewrap(&list.element, concrete)),
            assert: list.assert.clone(),
            transform: list.transform.clone(),
        }),
        FieldType::Reference(_) => FieldType::Reference(concrete),
    }
}

fn inherited_doc(doc: Option<&str>, inherited_from: Option<&str>) -> Option<String> {
    match (doc, inherited_from) {
        (doc, None) => doc.map(str::to_string),
        (Some(doc), Some(from)) => Some(format!("{doc}\n{INHERIT_DOC_TAG} {from}")),
        (None, Some(from)) => Some(format!("{INHERIT_DOC_TAG} {from}")),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inherited_doc_annotation() {
        assert_eq!(inherited_doc(Some("Name."), None).as_deref(), Some("Name."));
        assert_eq!(inherited_doc(None, None), None);
        assert_eq!(
            inherited_doc(Some("Name."), Some("Base.name")).as_deref(),
            Some("Name.\n@inherit-from Base.name")
        );
        assert_eq!(
            inherited_doc(None, Some("Base.name")).as_deref(),
            Some("@inherit-from Base.name")
        );
    }

    #[test]
    fn test_rewrap_keeps_list_depth() {
        let ty = FieldType::list(FieldType::list(FieldType::generic(
            "Page",
            vec![FieldType::named("User")],
        )));
        let out = rewrap(&ty, Reference::new("Page_User"));
        assert_eq!(
            out,
            FieldType::list(FieldType::list(FieldType::named("Page_User")))
        );
    }

    #[test]
    fn test_template_is_never_emitted() {
        let mut graph = TypeGraph::new();
        graph.insert_scalar("String").unwrap();
        graph
            .insert_object(
                PlainObject::new("Page")
                    .with_generics(["T"])
                    .with_field(Field::both("Page", "item", 0, FieldType::named("T")), false),
            )
            .unwrap();
        let out = normalize(&graph).unwrap();
        assert!(!out.input.contains_key("Page"));
        assert!(!out.output.contains_key("Page"));
        assert!(out.specializations.is_empty());
    }

    #[test]
    fn test_unexpected_kind_is_fatal() {
        let mut graph = TypeGraph::new();
        graph
            .insert("Dangling", Node::Reference(Reference::new("User")))
            .unwrap();
        let err = normalize(&graph).unwrap_err();
        assert_eq!(
            err,
            GraphError::UnexpectedKind {
                name: "Dangling".to_string(),
                kind: modelgraph_core::NodeKind::Reference,
            }
        );
    }
}
