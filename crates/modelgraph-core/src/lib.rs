//! # modelgraph-core: Type Graph Model
//!
//! This crate is the leaf of the modelgraph workspace. It defines the
//! declaration graph produced by a front-end, the hook types that attach
//! runtime behaviour to fields, and the normalized schema shapes handed
//! to downstream emitters and to the validator.
//!
//! ## Key Design Principles
//!
//! 1. **Closed node set.** [`Node`] enumerates every declaration kind.
//!    Consumers match exhaustively; a kind that is illegal at a given
//!    position is rejected with a [`GraphError`], never skipped.
//!
//! 2. **Shared instances.** Entity payloads live behind `Arc`. Passthrough
//!    nodes and memoized generic specializations are the *same* allocation
//!    in every schema that contains them.
//!
//! 3. **Hooks are code, not data.** [`AssertHook`] and [`TransformHook`]
//!    compare by pointer identity and are skipped by serde, so graphs loaded
//!    from files are structurally complete but carry no runtime checks.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `modelgraph-*` crates.
//! - No `.unwrap()` outside tests.

pub mod error;
pub mod graph;
pub mod hooks;
pub mod schema;

pub use error::GraphError;
pub use graph::{
    EnumMember, EnumNode, Field, FieldType, InputVariant, ListType, Node, NodeKind,
    OutputVariant, PlainObject, Reference, ResolverMethod, ScalarNode, TypeGraph, UnionNode,
    VisibleField,
};
pub use hooks::{AssertHook, RequestContext, TransformHook, TransformInput};
pub use schema::{
    InputField, InputNode, InputObject, InputSchema, OutputField, OutputNode, OutputObject,
    OutputSchema,
};
