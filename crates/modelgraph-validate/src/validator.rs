//! # Input Validator
//!
//! Walks an untrusted payload against an [`InputObject`] and produces the
//! validated payload keyed by target names.
//!
//! ## Per-field pipeline
//!
//! ```text
//! payload[wire name] ── absent / null ──▶ omitted
//!        │
//!        ▼
//!   assert hook ──▶ transform hook ──▶ type walk ──▶ result[target name]
//!                                        │
//!                    List:   coerce to array, per element:
//!                            list assert ▶ list transform ▶ element walk
//!                    Object: recurse into the nested input object
//!                    other:  value kept as-is
//! ```
//!
//! Fields run in schema order. The first rejection aborts the call and no
//! partial payload is returned. The returned future is the unit of
//! cancellation: dropping it drops every pending hook.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};
use serde_json::{Map, Value};
use tracing::debug;

use modelgraph_core::{
    AssertHook, FieldType, InputNode, InputObject, InputSchema, RequestContext, TransformHook,
    TransformInput,
};

use crate::error::{FieldPath, ValidationError};

/// Tuning for an [`InputValidator`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Upper bound for one whole validation call. `None` waits forever.
    pub timeout: Option<Duration>,
}

/// Validates payloads against a shared input schema.
///
/// Cheap to clone; clones share the schema.
#[derive(Debug, Clone)]
pub struct InputValidator {
    schema: Arc<InputSchema>,
    options: ValidatorOptions,
}

impl InputValidator {
    pub fn new(schema: Arc<InputSchema>) -> Self {
        Self {
            schema,
            options: ValidatorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ValidatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn schema(&self) -> &InputSchema {
        &self.schema
    }

    pub fn options(&self) -> ValidatorOptions {
        self.options
    }

    /// Look up an input object by graph key.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownEntity`] when the key is absent or names
    /// a scalar, enum or union.
    pub fn object(&self, name: &str) -> Result<&Arc<InputObject>, ValidationError> {
        self.schema
            .get(name)
            .and_then(InputNode::as_object)
            .ok_or_else(|| ValidationError::UnknownEntity {
                name: name.to_string(),
            })
    }

    /// Validate `payload` against `entity`.
    pub async fn validate(
        &self,
        entity: &InputObject,
        payload: &Value,
        context: &RequestContext,
    ) -> Result<Value, ValidationError> {
        let path = FieldPath::root(entity.escaped_name.as_str());
        let run = self.validate_object(entity, payload, context, path);
        let result = match self.options.timeout {
            Some(limit) => match tokio::time::timeout(limit, run).await {
                Ok(result) => result,
                Err(_) => Err(ValidationError::TimedOut {
                    entity: entity.escaped_name.clone(),
                    limit,
                }),
            },
            None => run.await,
        };
        if let Err(err) = &result {
            debug!(entity = %entity.escaped_name, error = %err, "payload rejected");
        }
        result
    }

    /// Validate `payload` against the input object registered as `name`.
    pub async fn validate_entity(
        &self,
        name: &str,
        payload: &Value,
        context: &RequestContext,
    ) -> Result<Value, ValidationError> {
        let entity = Arc::clone(self.object(name)?);
        self.validate(&entity, payload, context).await
    }

    fn validate_object<'a>(
        &'a self,
        entity: &'a InputObject,
        payload: &'a Value,
        context: &'a RequestContext,
        path: FieldPath,
    ) -> BoxFuture<'a, Result<Value, ValidationError>> {
        async move {
            let Value::Object(map) = payload else {
                return Err(ValidationError::InvalidShape {
                    path,
                    found: json_kind(payload),
                });
            };

            let mut out = Map::new();
            for field in &entity.fields {
                let raw = match map.get(&field.name) {
                    None | Some(Value::Null) => continue,
                    Some(raw) => raw.clone(),
                };
                let field_path = path.field(field.name.as_str());
                let value = run_hooks(
                    field.assert.as_ref(),
                    field.transform.as_ref(),
                    payload,
                    raw,
                    context,
                    &field_path,
                )
                .await?;
                let value = self
                    .validate_type(&field.ty, value, context, field_path)
                    .await?;
                out.insert(field.target_name.clone(), value);
            }
            Ok(Value::Object(out))
        }
        .boxed()
    }

    fn validate_type<'a>(
        &'a self,
        ty: &'a FieldType,
        value: Value,
        context: &'a RequestContext,
        path: FieldPath,
    ) -> BoxFuture<'a, Result<Value, ValidationError>> {
        async move {
            match ty {
                FieldType::List(list) => {
                    let items = match value {
                        Value::Array(items) => items,
                        single => vec![single],
                    };
                    let parent = Value::Array(items.clone());
                    let mut out = Vec::with_capacity(items.len());
                    for (i, item) in items.into_iter().enumerate() {
                        if item.is_null() {
                            out.push(Value::Null);
                            continue;
                        }
                        let item_path = path.index(i);
                        let item = run_hooks(
                            list.assert.as_ref(),
                            list.transform.as_ref(),
                            &parent,
                            item,
                            context,
                            &item_path,
                        )
                        .await?;
                        out.push(
                            self.validate_type(&list.element, item, context, item_path)
                                .await?,
                        );
                    }
                    Ok(Value::Array(out))
                }
                FieldType::Reference(reference) => match self.schema.get(&reference.name) {
                    Some(InputNode::PlainObject(nested)) => {
                        self.validate_object(nested, &value, context, path).await
                    }
                    Some(InputNode::Scalar(_) | InputNode::Enum(_) | InputNode::Union(_))
                    | None => Ok(value),
                },
            }
        }
        .boxed()
    }
}

/// Assert, then transform. Returns the value to carry forward.
async fn run_hooks(
    assert: Option<&AssertHook>,
    transform: Option<&TransformHook>,
    parent: &Value,
    value: Value,
    context: &RequestContext,
    path: &FieldPath,
) -> Result<Value, ValidationError> {
    if let Some(hook) = assert {
        hook.check(&value)
            .map_err(|reason| ValidationError::AssertionFailed {
                path: path.clone(),
                reason,
            })?;
    }
    match transform {
        Some(hook) => hook
            .apply(TransformInput {
                parent: parent.clone(),
                value,
                context: context.clone(),
            })
            .await
            .map_err(|reason| ValidationError::TransformRejected {
                path: path.clone(),
                reason,
            }),
        None => Ok(value),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use modelgraph_core::InputField;
    use serde_json::json;

    fn field(name: &str, ty: FieldType) -> InputField {
        InputField {
            name: name.to_string(),
            target_name: name.to_string(),
            alias: None,
            id: 0,
            deprecated: false,
            required: false,
            doc: None,
            default_value: None,
            ty,
            assert: None,
            transform: None,
        }
    }

    fn object(name: &str, fields: Vec<InputField>) -> InputNode {
        InputNode::PlainObject(Arc::new(InputObject {
            name: name.to_string(),
            escaped_name: name.to_string(),
            id: 0,
            deprecated: false,
            doc: None,
            fields,
        }))
    }

    fn validator(entries: Vec<InputNode>) -> InputValidator {
        let mut schema = InputSchema::new();
        for node in entries {
            let key = match &node {
                InputNode::PlainObject(obj) => obj.escaped_name.clone(),
                _ => unreachable!("tests only register objects"),
            };
            schema.insert(key, node);
        }
        InputValidator::new(Arc::new(schema))
    }

    #[tokio::test]
    async fn test_absent_and_null_are_omitted() {
        let v = validator(vec![object(
            "Note",
            vec![
                field("title", FieldType::named("String")),
                field("body", FieldType::named("String")),
            ],
        )]);
        let out = v
            .validate_entity("Note", &json!({"body": null}), &RequestContext::empty())
            .await
            .unwrap();
        assert_eq!(out, json!({}));
    }

    #[tokio::test]
    async fn test_unknown_payload_keys_are_dropped() {
        let v = validator(vec![object(
            "Note",
            vec![field("title", FieldType::named("String"))],
        )]);
        let out = v
            .validate_entity(
                "Note",
                &json!({"title": "t", "extra": 1}),
                &RequestContext::empty(),
            )
            .await
            .unwrap();
        assert_eq!(out, json!({"title": "t"}));
    }

    #[tokio::test]
    async fn test_nested_list_coercion_at_every_level() {
        let v = validator(vec![object(
            "Grid",
            vec![field(
                "cells",
                FieldType::list(FieldType::list(FieldType::named("Int"))),
            )],
        )]);
        let out = v
            .validate_entity("Grid", &json!({"cells": 5}), &RequestContext::empty())
            .await
            .unwrap();
        assert_eq!(out, json!({"cells": [[5]]}));

        let out = v
            .validate_entity("Grid", &json!({"cells": [1, [2, 3]]}), &RequestContext::empty())
            .await
            .unwrap();
        assert_eq!(out, json!({"cells": [[1], [2, 3]]}));
    }

    #[tokio::test]
    async fn test_null_list_elements_skip_hooks() {
        let mut list = modelgraph_core::ListType::new(FieldType::named("String"));
        list.assert = Some(AssertHook::new(|v| {
            if v.is_string() {
                Ok(())
            } else {
                Err("expected a string".to_string())
            }
        }));
        let v = validator(vec![object(
            "Tags",
            vec![field("items", FieldType::List(list))],
        )]);
        let out = v
            .validate_entity(
                "Tags",
                &json!({"items": ["a", null, "b"]}),
                &RequestContext::empty(),
            )
            .await
            .unwrap();
        assert_eq!(out, json!({"items": ["a", null, "b"]}));
    }

    #[tokio::test]
    async fn test_non_object_payload_is_invalid_shape() {
        let v = validator(vec![object(
            "Note",
            vec![field("title", FieldType::named("String"))],
        )]);
        let err = v
            .validate_entity("Note", &json!([1, 2]), &RequestContext::empty())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidShape {
                path: FieldPath::root("Note"),
                found: "array",
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_entity() {
        let v = validator(vec![]);
        let err = v
            .validate_entity("Ghost", &json!({}), &RequestContext::empty())
            .await
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownEntity { ref name } if name == "Ghost"));
    }

    #[tokio::test]
    async fn test_unregistered_reference_passes_through() {
        let v = validator(vec![object(
            "Holder",
            vec![field("blob", FieldType::named("Json"))],
        )]);
        let out = v
            .validate_entity(
                "Holder",
                &json!({"blob": {"any": [1, 2]}}),
                &RequestContext::empty(),
            )
            .await
            .unwrap();
        assert_eq!(out, json!({"blob": {"any": [1, 2]}}));
    }

    #[test]
    fn test_json_kind() {
        assert_eq!(json_kind(&json!(null)), "null");
        assert_eq!(json_kind(&json!("s")), "string");
        assert_eq!(json_kind(&json!({})), "object");
    }
}
