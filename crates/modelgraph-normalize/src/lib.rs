//! # modelgraph-normalize: Graph to Schema Resolution
//!
//! Turns a [`TypeGraph`](modelgraph_core::TypeGraph) into two schema
//! projections: the input shape callers send and the output shape the API
//! returns.
//!
//! ## Normalizer (`normalizer`)
//!
//! [`normalize`] walks the graph once as a growing work-list. Objects get
//! their visible fields resolved against their own declarations and their
//! ancestors, inherited fields ordered ahead of local ones, and each field
//! split into its input and output projections.
//!
//! ## Generic Resolver (`generic`)
//!
//! Field types that reference a template with type arguments are replaced
//! by a concrete specialization. Specializations are memoized by their
//! escaped name, so every use of `Page<User>` resolves to one shared
//! entity, and they are appended to the same work-list.
//!
//! ## Errors
//!
//! Structural defects abort with a [`GraphError`](modelgraph_core::GraphError).
//! Visible fields with no owning declaration are dropped and reported as a
//! [`Diagnostic`].

pub mod diagnostics;
pub mod generic;
pub mod normalizer;

pub use diagnostics::Diagnostic;
pub use generic::{escaped_name, escaped_reference_name, generic_name, generic_reference_name};
pub use normalizer::{normalize, NormalizedSchemas, MAX_SPECIALIZATION_DEPTH};
