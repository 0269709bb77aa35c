mod batch;
mod providers;
mod signal;

use std::sync::Arc;

use serde_json::Value;
use sigfuse_core::{AggregatorConfig, SignalAggregator};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    /// Set when the output was produced but `--strict` rejects it.
    pub strict_violation: Option<CliError>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            strict_violation: None,
        }
    }

    pub fn with_strict_violation(mut self, error: CliError) -> Self {
        self.strict_violation = Some(error);
        self
    }
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    let config = Arc::new(load_config(cli)?);

    match &cli.command {
        Command::Signal(args) => signal::run(args, SignalAggregator::new(config)).await,
        Command::Batch(args) => batch::run(args, SignalAggregator::new(config)).await,
        Command::Providers => providers::run(&config),
    }
}

fn load_config(cli: &Cli) -> Result<AggregatorConfig, CliError> {
    let mut builder = AggregatorConfig::builder();

    if let Some(path) = &cli.config {
        builder = builder.with_json_file(path)?;
    }

    if let Some(timeout_ms) = cli.timeout_ms {
        builder = builder.with_timeout_ms(timeout_ms);
    }

    let config = builder.with_keys_from_env().build()?;
    for (category, provider) in config.dangling_providers() {
        tracing::warn!(%category, %provider, "rotation names a provider missing from the catalog");
    }

    Ok(config)
}
