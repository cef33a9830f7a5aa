//! Inspect command implementation.

use crate::cli::InspectArgs;
use crate::error::Result;
use crate::output::Formatter;
use chansweep_domain::traits::NodeClient;
use chansweep_janitor::{Janitor, JanitorConfig};
use std::sync::Arc;

/// Execute the inspect command.
pub async fn execute_inspect<C>(
    args: InspectArgs,
    mut config: JanitorConfig,
    client: Arc<C>,
    formatter: &Formatter,
) -> Result<()>
where
    C: NodeClient + 'static,
{
    if let Some(days) = args.lookback_days {
        config.lookback_days = days;
    }

    let inspection = Janitor::new(config).inspect(client).await?;

    println!("{}", formatter.format_inspection(&inspection, args.inactive)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::error::CliError;
    use chansweep_domain::{ChanId, Channel};
    use chansweep_lnd::{MockNode, MockStream};

    fn args() -> InspectArgs {
        InspectArgs {
            lookback_days: Some(7),
            inactive: false,
        }
    }

    #[tokio::test]
    async fn test_inspect_lists_channels() {
        let node = MockNode::new().with_channel(Channel::new(ChanId::new(1), "aa:0"));
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let result = execute_inspect(args(), JanitorConfig::default(), Arc::new(node), &formatter).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_inspect_failure_is_reported_as_inspection_error() {
        let node = MockNode::new().failing_stream(MockStream::Forwards);
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let err = execute_inspect(args(), JanitorConfig::default(), Arc::new(node), &formatter)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Inspection(_)));
        assert!(err.to_string().starts_with("Inspection failed:"));
    }
}
