//! # modelgraph-cli: Command-Line Interface
//!
//! ## Subcommands
//!
//! - `normalize`: type graph to input/output schemas
//! - `validate`: check a payload file against an input entity
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to the library crates; no schema logic lives here.
//! - Results go to stdout, logs and warnings to stderr.

pub mod input;
pub mod normalize;
pub mod validate;
