//! # modelgraph CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Type graph normalizer and payload validator.
#[derive(Parser, Debug)]
#[command(name = "modelgraph", version, about)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Normalize a type graph into input and output schemas.
    Normalize(modelgraph_cli::normalize::NormalizeArgs),
    /// Validate a payload against an input entity.
    Validate(modelgraph_cli::validate::ValidateArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match &cli.command {
        Commands::Normalize(args) => modelgraph_cli::normalize::run_normalize(args),
        Commands::Validate(args) => modelgraph_cli::validate::run_validate(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_validate_args() {
        let cli = Cli::try_parse_from([
            "modelgraph",
            "--log-json",
            "validate",
            "--graph",
            "g.yaml",
            "--entity",
            "Person",
            "--payload",
            "p.json",
            "--timeout-ms",
            "250",
        ])
        .unwrap();
        assert!(cli.log_json);
        match cli.command {
            Commands::Validate(args) => {
                assert_eq!(args.entity, "Person");
                assert_eq!(args.timeout_ms, Some(250));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
