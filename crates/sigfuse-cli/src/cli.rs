//! CLI argument definitions for sigfuse.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `signal` | Aggregate one coin into a trading signal |
//! | `batch` | Aggregate several coins concurrently |
//! | `providers` | Show the provider rotation per category |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--config` | none | JSON config overlay |
//! | `--timeout-ms` | `3000` | Per-provider request timeout |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--log-json` | `false` | Emit logs as JSON on stderr |
//!
//! # Examples
//!
//! ```bash
//! sigfuse signal BTC
//! sigfuse signal ETH --pair ETHBTC --strict
//! sigfuse batch BTC ETH SOL:SOLUSDC --pretty
//! RUST_LOG=sigfuse_core=debug sigfuse providers
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Multi-source crypto signal aggregator.
#[derive(Debug, Parser)]
#[command(
    name = "sigfuse",
    author,
    version,
    about = "Multi-source crypto signal aggregator",
    long_about = "sigfuse queries price, exchange, social, on-chain and technical data \
providers with ordered fallback, scores each category and combines them into a \
weighted trading signal.\n\
\n\
API keys are read from SIGFUSE_<PROVIDER>_API_KEY or the provider's own \
environment variable. Logs are written to stderr; set RUST_LOG to adjust."
)]
pub struct Cli {
    /// JSON file overlaying providers, rotation, keys and timeouts.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Per-provider request timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, default_value_t = false)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Aggregate one coin into a trading signal.
    ///
    /// # Examples
    ///
    ///   sigfuse signal BTC
    ///   sigfuse signal ETH --pair ETHBTC
    Signal(SignalArgs),

    /// Aggregate several coins concurrently.
    ///
    /// Each entry is COIN or COIN:PAIR; the pair defaults to COIN + USDT.
    ///
    /// # Examples
    ///
    ///   sigfuse batch BTC ETH SOL:SOLUSDC
    Batch(BatchArgs),

    /// Show the provider rotation for every category.
    Providers,
}

/// Arguments for the `signal` command.
#[derive(Debug, Args)]
pub struct SignalArgs {
    /// Coin ticker (e.g., BTC).
    pub coin: String,

    /// Trading pair; defaults to the coin followed by USDT.
    #[arg(long)]
    pub pair: Option<String>,

    /// Fail with exit code 3 when no category answered.
    #[arg(long, default_value_t = false)]
    pub strict: bool,
}

/// Arguments for the `batch` command.
#[derive(Debug, Args)]
pub struct BatchArgs {
    /// One or more COIN or COIN:PAIR entries.
    #[arg(required = true, num_args = 1..)]
    pub entries: Vec<String>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_options_parse_after_subcommand() {
        let cli = Cli::parse_from(["sigfuse", "signal", "btc", "--pretty", "--timeout-ms", "500"]);

        assert!(cli.pretty);
        assert_eq!(cli.timeout_ms, Some(500));
        match cli.command {
            Command::Signal(args) => {
                assert_eq!(args.coin, "btc");
                assert_eq!(args.pair, None);
                assert!(!args.strict);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
