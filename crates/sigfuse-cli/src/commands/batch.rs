use sigfuse_core::{BatchEntry, SignalAggregator};

use crate::cli::BatchArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &BatchArgs, aggregator: SignalAggregator) -> Result<CommandResult, CliError> {
    let entries = args
        .entries
        .iter()
        .map(|raw| parse_entry(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let report = aggregator.generate_batch(&entries).await;
    Ok(CommandResult::ok(serde_json::to_value(&report)?))
}

/// `COIN` or `COIN:PAIR`. Symbol validation is left to the batch itself so a
/// bad ticker is reported per entry instead of aborting the run.
fn parse_entry(raw: &str) -> Result<BatchEntry, CliError> {
    match raw.split_once(':') {
        None => Ok(BatchEntry::new(raw)),
        Some((coin, pair)) if !coin.is_empty() && !pair.is_empty() && !pair.contains(':') => {
            Ok(BatchEntry::new(coin).with_pair(pair))
        }
        Some(_) => Err(CliError::BatchEntry(raw.to_owned())),
    }
}
