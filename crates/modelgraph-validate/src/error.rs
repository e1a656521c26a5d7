//! # Validation Errors
//!
//! Every failure names the path of the offending value, rooted at the
//! entity being validated:
//!
//! ```text
//! Person.addresses[1].zip
//! ```

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// One step from an entity into its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object field, by wire name.
    Field(String),
    /// List element, by position after coercion.
    Index(usize),
}

/// Location of a value inside a validated payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    entity: String,
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The path of the entity itself.
    pub fn root(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            segments: Vec::new(),
        }
    }

    /// Extend with an object field.
    pub fn field(&self, name: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.segments.push(PathSegment::Field(name.into()));
        path
    }

    /// Extend with a list index.
    pub fn index(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.segments.push(PathSegment::Index(index));
        path
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// The last field name on the path, skipping trailing indices.
    pub fn last_field(&self) -> Option<&str> {
        self.segments.iter().rev().find_map(|s| match s {
            PathSegment::Field(name) => Some(name.as_str()),
            PathSegment::Index(_) => None,
        })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.entity)?;
        for segment in &self.segments {
            match segment {
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

/// Failure of a single validation call. No partial result accompanies it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An assertion hook rejected a value.
    #[error("assertion failed at {path}: {reason}")]
    AssertionFailed {
        /// Path of the rejected value.
        path: FieldPath,
        /// Reason reported by the hook.
        reason: String,
    },

    /// A transform hook failed.
    #[error("transform failed at {path}: {reason}")]
    TransformRejected {
        /// Path of the value being transformed.
        path: FieldPath,
        /// Reason reported by the hook.
        reason: String,
    },

    /// An object was expected and something else was supplied.
    #[error("expected an object at {path}, found {found}")]
    InvalidShape {
        /// Path of the offending value.
        path: FieldPath,
        /// JSON kind that was found instead.
        found: &'static str,
    },

    /// The requested entity is not an object in the input schema.
    #[error("no input object named \"{name}\"")]
    UnknownEntity {
        /// Requested entity key.
        name: String,
    },

    /// The whole call exceeded the configured time limit.
    #[error("validation of {entity} timed out after {limit:?}")]
    TimedOut {
        /// Entity being validated.
        entity: String,
        /// Configured limit.
        limit: Duration,
    },
}

impl ValidationError {
    /// Path of the failing value, for errors raised inside a payload.
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            Self::AssertionFailed { path, .. }
            | Self::TransformRejected { path, .. }
            | Self::InvalidShape { path, .. } => Some(path),
            Self::UnknownEntity { .. } | Self::TimedOut { .. } => None,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
