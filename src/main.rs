//! typedexpr - evaluate a JSON expression document against a configured domain

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use typedexpr::config::InterpreterConfig;
use typedexpr::document::ExpressionDocument;
use typedexpr::expression::ExpressionInterpreter;

/// typedexpr - Typed SQL-style expression interpreter
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file declaring entity types and root objects
    #[arg(short, long)]
    config: PathBuf,

    /// Expression document to evaluate
    #[arg(short, long)]
    expression: PathBuf,

    /// Collapse the result to TRUE/FALSE as a WHERE clause would
    #[arg(short, long)]
    predicate: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = InterpreterConfig::from_file(&args.config)?;
    let model = Arc::new(
        config
            .build_domain()
            .context("Failed to build domain model")?,
    );
    info!(
        "Loaded {} types and {} functions from {}",
        model.types().count(),
        model.functions().count(),
        args.config.display()
    );

    let context = config
        .create_context(&model)
        .context("Failed to bind root objects")?;
    let expression = ExpressionDocument::from_file(&args.expression)?
        .resolve(&model, &context)
        .context("Failed to resolve expression")?;

    let interpreter = ExpressionInterpreter::new(model);
    let result = if args.predicate {
        serde_json::Value::Bool(
            interpreter
                .evaluate_predicate(&expression, &context)
                .context("Evaluation failed")?,
        )
    } else {
        interpreter
            .evaluate(&expression, &context)
            .context("Evaluation failed")?
            .to_json()
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
