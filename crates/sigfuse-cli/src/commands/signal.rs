use sigfuse_core::{Coin, Pair, SignalAggregator};

use crate::cli::SignalArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &SignalArgs, aggregator: SignalAggregator) -> Result<CommandResult, CliError> {
    let coin = Coin::parse(&args.coin)?;
    let pair = match &args.pair {
        Some(raw) => Pair::parse(raw)?,
        None => coin.default_pair(),
    };

    let signal = aggregator.generate_aggregated_signal(&coin, &pair).await;
    let result = CommandResult::ok(serde_json::to_value(&signal)?);

    if args.strict && signal.is_degraded() {
        return Ok(result.with_strict_violation(CliError::DegradedSignal {
            coin: coin.to_string(),
            pair: pair.to_string(),
        }));
    }

    Ok(result)
}
