//! Non-fatal findings collected during normalization.

use std::fmt;

use serde::Serialize;

/// A recovered condition. Recovery always means omission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Diagnostic {
    /// A visible field whose declaration was found neither on the entity
    /// nor on any ancestor. The field was dropped.
    UnresolvedField {
        entity: String,
        field: String,
        /// Ancestors that were searched, in search order.
        searched: Vec<String>,
        location: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedField {
                entity,
                field,
                searched,
                location,
            } => write!(
                f,
                "ignored field \"{entity}.{field}\": no declaration on the entity or on [{}] at {location}",
                searched.join(", ")
            ),
        }
    }
}
