//! # Validate Subcommand
//!
//! Normalizes a type graph and validates one payload file against an
//! entity of its input schema. Graphs loaded from files carry no hooks,
//! so this checks shape, renames wire fields and coerces lists.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use serde_json::Value;

use modelgraph_core::{RequestContext, TypeGraph};
use modelgraph_validate::{InputValidator, ValidatorOptions};

use crate::input::read_document;
use crate::normalize::normalize_graph;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Type graph file (JSON, or YAML by extension).
    #[arg(long)]
    pub graph: PathBuf,

    /// Input entity to validate against.
    #[arg(long)]
    pub entity: String,

    /// Payload file (JSON, or YAML by extension).
    #[arg(long)]
    pub payload: PathBuf,

    /// Abort validation after this many milliseconds.
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

pub async fn run_validate(args: &ValidateArgs) -> anyhow::Result<()> {
    let graph: TypeGraph = read_document(&args.graph)?;
    let payload: Value = read_document(&args.payload)?;
    let options = ValidatorOptions {
        timeout: args.timeout_ms.map(Duration::from_millis),
    };
    let validated = validate_payload(&graph, &args.entity, &payload, options).await?;
    println!("{}", serde_json::to_string_pretty(&validated)?);
    Ok(())
}

/// Normalize `graph` and validate `payload` against `entity`.
pub async fn validate_payload(
    graph: &TypeGraph,
    entity: &str,
    payload: &Value,
    options: ValidatorOptions,
) -> anyhow::Result<Value> {
    let schemas = normalize_graph(graph)?;
    let validator = InputValidator::new(Arc::new(schemas.input)).with_options(options);
    let validated = validator
        .validate_entity(entity, payload, &RequestContext::empty())
        .await?;
    tracing::info!(entity, "payload accepted");
    Ok(validated)
}
