//! # Structural Graph Errors
//!
//! Errors raised while building or normalizing a [`TypeGraph`](crate::TypeGraph).
//! Every variant is fatal to the operation that produced it: a broken
//! graph is the front-end's responsibility and is never patched up here.
//!
//! Messages name the offending entity or field and, where the front-end
//! recorded one, the declaring source location.

use thiserror::Error;

use crate::graph::NodeKind;

/// Fatal structural defect in a type graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Two entities were registered under the same name.
    #[error("duplicated entity name: {name}")]
    DuplicateEntity {
        /// The conflicting name.
        name: String,
    },

    /// A reference or inherit-list entry names an entity that does not exist.
    #[error("missing entity \"{name}\" referenced by \"{referenced_by}\" at {location}")]
    MissingEntity {
        /// The name that failed to resolve.
        name: String,
        /// `Entity.field` (or entity) holding the broken reference.
        referenced_by: String,
        /// Declaring source location.
        location: String,
    },

    /// A generic reference or an ancestor points at something other than a `PlainObject`.
    #[error("expected PlainObject for \"{name}\" referenced by \"{referenced_by}\", got {kind} at {location}")]
    NotAPlainObject {
        /// The referenced entity.
        name: String,
        /// Kind actually found in the graph.
        kind: NodeKind,
        /// `Entity.field` holding the reference.
        referenced_by: String,
        /// Declaring source location.
        location: String,
    },

    /// The escaped name of a generic instantiation is already taken, by a
    /// hand-authored entity or by a different instantiation.
    #[error("found entity \"{escaped_name}\" which equals the escaped name of generic {generic_name} at {location}")]
    GenericNameCollision {
        /// The colliding escaped name.
        escaped_name: String,
        /// Human-readable instantiation, e.g. `Page<User>`.
        generic_name: String,
        /// Location of the generic reference.
        location: String,
    },

    /// Type argument count differs from the template's parameter count.
    #[error("generic {generic_name} expects {expected} type argument(s), got {found} at {location}")]
    GenericArity {
        /// Human-readable instantiation.
        generic_name: String,
        /// Parameters declared by the template.
        expected: usize,
        /// Arguments supplied by the reference.
        found: usize,
        /// Location of the generic reference.
        location: String,
    },

    /// Specializations keep producing new instantiations of themselves,
    /// e.g. `Tree<T> { next: Tree<T[]> }`.
    #[error("generic {generic_name} referenced by \"{referenced_by}\" exceeds the specialization depth limit of {limit} for template \"{template}\" at {location}")]
    GenericExpansion {
        /// Template being expanded.
        template: String,
        /// Instantiation that would exceed the limit.
        generic_name: String,
        /// `Entity.field` holding the reference.
        referenced_by: String,
        /// Maximum specialization depth.
        limit: usize,
        /// Location of the generic reference.
        location: String,
    },

    /// A node kind that may not appear as a graph entity.
    #[error("unknown kind: {kind} at graph entry \"{name}\"")]
    UnexpectedKind {
        /// Graph key of the offending entry.
        name: String,
        /// Kind of the offending node.
        kind: NodeKind,
    },
}
