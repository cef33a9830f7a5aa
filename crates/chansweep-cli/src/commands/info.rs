//! Info command implementation.

use crate::error::Result;
use crate::output::Formatter;
use chansweep_domain::traits::NodeClient;
use chansweep_lnd::NodeError;

/// Execute the info command.
pub async fn execute_info<C>(client: &C, formatter: &Formatter) -> Result<()>
where
    C: NodeClient<Error = NodeError>,
{
    let info = client.get_info().await?;

    if !info.synced_to_chain {
        tracing::warn!("Node {} is not synced to chain", info.alias);
    }

    println!("{}", formatter.format_node_info(&info)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use chansweep_domain::NodeInfo;
    use chansweep_lnd::MockNode;

    #[tokio::test]
    async fn test_info_reads_node() {
        let node = MockNode::new().with_info(NodeInfo {
            alias: "alice".to_string(),
            synced_to_chain: true,
            ..Default::default()
        });
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        assert!(execute_info(&node, &formatter).await.is_ok());
    }
}
