//! # modelgraph-validate: Runtime Payload Validation
//!
//! Checks and rewrites untrusted request payloads against the input schema
//! produced by `modelgraph-normalize`.
//!
//! - [`InputValidator`] reads each field by wire name, runs its assertion
//!   and transform hooks, coerces lists, recurses into nested objects and
//!   writes the result under the field's target name.
//! - [`ValidatedHandler`] wraps a resolver so it only ever runs with
//!   validated arguments.
//!
//! ## Concurrency
//!
//! The schema is immutable and shared behind an `Arc`; any number of
//! validation calls may run at once. Each call is a single future: drop it
//! to cancel every pending hook, or bound it with
//! [`ValidatorOptions::timeout`].

pub mod error;
pub mod validator;
pub mod wrapper;

pub use error::{FieldPath, PathSegment, ValidationError};
pub use validator::{InputValidator, ValidatorOptions};
pub use wrapper::{ResolverArgs, ValidatedHandler};
