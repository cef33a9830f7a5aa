//! Close command implementation.

use crate::cli::CloseArgs;
use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::Formatter;
use chansweep_domain::traits::NodeClient;
use chansweep_domain::ChanId;
use chansweep_janitor::{CloseReport, Janitor, JanitorConfig};
use std::io::{BufRead, Write};
use std::sync::Arc;

/// Execute the close command.
///
/// Inspects first; only the channels found inactive are offered for closing.
/// Answers are read from `input` unless `--yes` is given.
pub async fn execute_close<C, R>(
    args: CloseArgs,
    config: JanitorConfig,
    client: Arc<C>,
    formatter: &Formatter,
    input: &mut R,
) -> Result<()>
where
    C: NodeClient + 'static,
    R: BufRead,
{
    let janitor = Janitor::new(apply_overrides(config, &args));
    let table = formatter.format() == OutputFormat::Table;

    let inspection = janitor.inspect(Arc::clone(&client)).await?;
    let ids = inspection.dormant_ids();

    if ids.is_empty() {
        let rendered = nothing_to_close(formatter)?;
        if !rendered.is_empty() {
            println!("{}", rendered);
        }
        return Ok(());
    }

    // Prompt on stderr so json and quiet output on stdout stays parseable
    if !args.yes && !confirm(&ids, input, &mut std::io::stderr())? {
        eprintln!("Exiting...");
        return Ok(());
    }

    if table {
        println!("Closing channels...");
        println!(
            "{}",
            formatter.info(
                "Awaiting channel closures... This may take a while. (mine some blocks if you're on regtest)"
            )
        );
    }

    let report = janitor.close(client, &ids).await;

    println!("{}", formatter.format_report(&report)?);
    Ok(())
}

/// Output for a run that found no inactive channels; machine formats get an empty report
fn nothing_to_close(formatter: &Formatter) -> Result<String> {
    match formatter.format() {
        OutputFormat::Table => Ok(formatter.info("No inactive channels to close!")),
        _ => formatter.format_report(&CloseReport::default()),
    }
}

/// Command-line flags layered over the configured janitor settings
fn apply_overrides(mut config: JanitorConfig, args: &CloseArgs) -> JanitorConfig {
    if let Some(days) = args.lookback_days {
        config.lookback_days = days;
    }
    if args.dry_run {
        config.dry_run = true;
    }
    if args.force {
        config.force_close = true;
    }
    if args.sat_per_vbyte.is_some() {
        config.sat_per_vbyte = args.sat_per_vbyte;
    }
    if args.timeout_secs.is_some() {
        config.close_timeout_secs = args.timeout_secs;
    }
    config
}

/// Ask until the answer is `y` or `n`; end of input counts as `n`.
fn confirm<R: BufRead, W: Write>(ids: &[ChanId], input: &mut R, output: &mut W) -> Result<bool> {
    let listed: Vec<String> = ids.iter().map(ToString::to_string).collect();

    loop {
        write!(
            output,
            "Close {} inactive channels? [{}] (y/n): ",
            ids.len(),
            listed.join(", ")
        )?;
        output.flush()?;

        let mut response = String::new();
        if input.read_line(&mut response)? == 0 {
            writeln!(output)?;
            return Ok(false);
        }

        match response.trim().to_ascii_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chansweep_domain::{ChanId, Channel, ChannelGraphEdge};
    use chansweep_lnd::MockNode;
    use std::io::Cursor;

    fn args(yes: bool) -> CloseArgs {
        CloseArgs {
            lookback_days: None,
            yes,
            dry_run: false,
            force: false,
            sat_per_vbyte: None,
            timeout_secs: None,
        }
    }

    fn dormant_node() -> MockNode {
        MockNode::new()
            .with_channel(Channel::new(ChanId::new(3), "abcd:0"))
            .with_edge(ChannelGraphEdge {
                chan_id: ChanId::new(3),
                last_update: 0,
                chan_point: Some("abcd:0".to_string()),
            })
    }

    #[test]
    fn test_confirm_retries_until_valid() {
        let mut input = Cursor::new("maybe\n\nY\n");
        let mut output = Vec::new();

        let answer = confirm(&[ChanId::new(3), ChanId::new(4)], &mut input, &mut output).unwrap();

        assert!(answer);
        let prompt = String::from_utf8(output).unwrap();
        assert_eq!(prompt.matches("Close 2 inactive channels? [3, 4] (y/n): ").count(), 3);
    }

    #[test]
    fn test_confirm_eof_declines() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert!(!confirm(&[ChanId::new(3)], &mut input, &mut output).unwrap());
    }

    #[test]
    fn test_apply_overrides() {
        let args = CloseArgs {
            lookback_days: Some(30),
            yes: true,
            dry_run: true,
            force: true,
            sat_per_vbyte: Some(2),
            timeout_secs: Some(60),
        };
        let config = apply_overrides(JanitorConfig::default(), &args);

        assert_eq!(config.lookback_days, 30);
        assert!(config.dry_run);
        assert!(config.force_close);
        assert_eq!(config.sat_per_vbyte, Some(2));
        assert_eq!(config.close_timeout_secs, Some(60));
    }

    #[test]
    fn test_flags_absent_keep_config() {
        let config = JanitorConfig {
            sat_per_vbyte: Some(9),
            ..Default::default()
        };
        let config = apply_overrides(config, &args(false));
        assert_eq!(config.sat_per_vbyte, Some(9));
        assert!(!config.dry_run);
    }

    #[test]
    fn test_nothing_to_close_renders_empty_report() {
        let json = nothing_to_close(&Formatter::new(OutputFormat::Json, false)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["outcomes"], serde_json::json!([]));
        assert_eq!(value["closed"], 0);

        let quiet = nothing_to_close(&Formatter::new(OutputFormat::Quiet, false)).unwrap();
        assert!(quiet.is_empty());

        let table = nothing_to_close(&Formatter::new(OutputFormat::Table, false)).unwrap();
        assert!(table.contains("No inactive channels to close!"));
    }

    #[tokio::test]
    async fn test_declined_closes_nothing() {
        let node = dormant_node();
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let mut input = Cursor::new("n\n");

        execute_close(args(false), JanitorConfig::default(), Arc::new(node.clone()), &formatter, &mut input)
            .await
            .unwrap();

        assert!(node.close_calls().is_empty());
    }

    #[tokio::test]
    async fn test_yes_closes_dormant() {
        let node = dormant_node();
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let mut input = Cursor::new("");

        execute_close(args(true), JanitorConfig::default(), Arc::new(node.clone()), &formatter, &mut input)
            .await
            .unwrap();

        assert_eq!(node.close_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_nothing_dormant_skips_prompt() {
        let node = MockNode::new();
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut input = Cursor::new("y\n");

        execute_close(args(false), JanitorConfig::default(), Arc::new(node.clone()), &formatter, &mut input)
            .await
            .unwrap();

        assert!(node.edge_lookups().is_empty());
        assert_eq!(input.position(), 0);
    }
}
