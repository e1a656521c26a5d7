//! # Generic Specialization
//!
//! Naming and construction of concrete entities from generic templates.
//!
//! ## Escaped Names
//!
//! A specialization's graph key is a pure function of the template name
//! and its arguments, so the same instantiation always maps to the same
//! key and therefore to the same memoized entity:
//!
//! ```text
//! Page<User>            → Page_User
//! Page<User[]>          → Page__User
//! Pair<Page<User>, Tag> → Pair_Page_User_Tag
//! ```
//!
//! Each list level prepends one `_`; arguments are joined by `_` in
//! declaration order.
//!
//! ## Type-Parameter Substitution
//!
//! A specialization owns a copy of the template's declared fields with
//! every bare reference to a template parameter replaced by the matching
//! argument. Inherited fields are left as declared on their ancestor.

use std::collections::HashMap;

use modelgraph_core::{
    Field, FieldType, GraphError, ListType, PlainObject, Reference,
};

/// Prefix added per list nesting level in escaped names.
pub const LIST_MARKER: char = '_';
/// Separator between the template name and each escaped argument.
pub const ARG_SEPARATOR: char = '_';
/// Machine marker opening every specialization's documentation.
pub const GENERIC_DOC_MARKER: &str = "@Generic";

/// Escaped name of any field type.
pub fn escaped_name(ty: &FieldType) -> String {
    match ty {
        FieldType::Reference(reference) => escaped_reference_name(reference),
        FieldType::List(list) => format!("{LIST_MARKER}{}", escaped_name(&list.element)),
    }
}

/// Escaped name of a reference; the bare name when it carries no arguments.
pub fn escaped_reference_name(reference: &Reference) -> String {
    let mut out = reference.name.clone();
    for param in reference.params.iter().flatten() {
        out.push(ARG_SEPARATOR);
        out.push_str(&escaped_name(param));
    }
    out
}

/// Human-readable name: `Base<Arg1, Arg2>`, list arguments as `Arg[]`.
pub fn generic_name(ty: &FieldType) -> String {
    match ty {
        FieldType::Reference(reference) => generic_reference_name(reference),
        FieldType::List(list) => format!("{}[]", generic_name(&list.element)),
    }
}

pub fn generic_reference_name(reference: &Reference) -> String {
    match &reference.params {
        None => reference.name.clone(),
        Some(params) => {
            let args: Vec<String> = params.iter().map(generic_name).collect();
            format!("{}<{}>", reference.name, args.join(", "))
        }
    }
}

/// Build the concrete entity for `reference`, registered as `escaped`.
///
/// # Errors
///
/// [`GraphError::GenericArity`] when the argument count differs from the
/// template's parameter count.
pub fn specialize(
    template: &PlainObject,
    reference: &Reference,
    escaped: &str,
) -> Result<PlainObject, GraphError> {
    let params = template.generics.as_deref().unwrap_or(&[]);
    let args = reference.params.as_deref().unwrap_or(&[]);
    let human = generic_reference_name(reference);
    if params.len() != args.len() {
        return Err(GraphError::GenericArity {
            generic_name: human,
            expected: params.len(),
            found: args.len(),
            location: reference.location().to_string(),
        });
    }

    let bindings: HashMap<&str, &FieldType> =
        params.iter().map(String::as_str).zip(args.iter()).collect();
    let fields = template
        .fields
        .iter()
        .map(|(name, field)| (name.clone(), substitute_field(field, &bindings, escaped)))
        .collect();

    let doc = match &template.doc {
        Some(doc) => format!("{GENERIC_DOC_MARKER} {human}\n{doc}"),
        None => format!("{GENERIC_DOC_MARKER} {human}"),
    };

    Ok(PlainObject {
        name: human,
        escaped_name: Some(escaped.to_string()),
        id: template.id,
        deprecated: template.deprecated,
        doc: Some(doc),
        file_name: template.file_name.clone(),
        inherit: template.inherit.clone(),
        generics: None,
        fields,
        visible_fields: template.visible_fields.clone(),
    })
}

fn substitute_field(field: &Field, bindings: &HashMap<&str, &FieldType>, owner: &str) -> Field {
    let mut field = field.clone();
    field.owner = owner.to_string();
    if let Some(input) = field.input.as_mut() {
        input.ty = substitute(&input.ty, bindings);
    }
    if let Some(output) = field.output.as_mut() {
        output.ty = substitute(&output.ty, bindings);
        output.param = output.param.as_ref().map(|p| substitute(p, bindings));
    }
    field
}

/// Replace bare references to bound parameters, keeping list hooks intact.
pub fn substitute(ty: &FieldType, bindings: &HashMap<&str, &FieldType>) -> FieldType {
    match ty {
        FieldType::List(list) => FieldType::List(ListType {
            element: Box::new(substitute(&list.element, bindings)),
            assert: list.assert.clone(),
            transform: list.transform.clone(),
        }),
        FieldType::Reference(reference) => {
            if reference.params.is_none() {
                if let Some(arg) = bindings.get(reference.name.as_str()) {
                    return (*arg).clone();
                }
            }
            FieldType::Reference(Reference {
                name: reference.name.clone(),
                params: reference
                    .params
                    .as_ref()
                    .map(|ps| ps.iter().map(|p| substitute(p, bindings)).collect()),
                file_name: reference.file_name.clone(),
            })
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
