//! # Normalize Subcommand
//!
//! Loads a type graph, normalizes it, and writes the schemas either to
//! stdout as one document or to `input.json` / `output.json` in a
//! directory.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;

use modelgraph_core::TypeGraph;
use modelgraph_normalize::{normalize, NormalizedSchemas};

use crate::input::read_document;

/// Arguments for the normalize subcommand.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Type graph file (JSON, or YAML by extension).
    #[arg(long)]
    pub graph: PathBuf,

    /// Directory to write `input.json` and `output.json` into.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[arg(long)]
    pub pretty: bool,
}

pub fn run_normalize(args: &NormalizeArgs) -> anyhow::Result<()> {
    let graph: TypeGraph = read_document(&args.graph)?;
    let schemas = normalize(&graph)
        .with_context(|| format!("failed to normalize {}", args.graph.display()))?;

    for diagnostic in &schemas.diagnostics {
        eprintln!("warning: {diagnostic}");
    }

    match &args.out {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            for (file, doc) in [
                ("input.json", render(&schemas.input, args.pretty)?),
                ("output.json", render(&schemas.output, args.pretty)?),
            ] {
                let path = dir.join(file);
                std::fs::write(&path, doc)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                tracing::info!(path = %path.display(), "wrote schema");
            }
        }
        None => println!("{}", render(&schemas, args.pretty)?),
    }
    Ok(())
}

/// Serialize a schema document.
pub fn render<T: Serialize>(doc: &T, pretty: bool) -> anyhow::Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(doc)?
    } else {
        serde_json::to_string(doc)?
    };
    Ok(out)
}

/// Normalize a graph held in memory; used by the validate subcommand.
pub fn normalize_graph(graph: &TypeGraph) -> anyhow::Result<NormalizedSchemas> {
    Ok(normalize(graph)?)
}
