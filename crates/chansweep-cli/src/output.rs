//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use chansweep_domain::{CloseStatus, NodeInfo};
use chansweep_janitor::{CloseReport, Inspection};
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format node identity.
    pub fn format_node_info(&self, info: &NodeInfo) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "identity_pubkey": info.identity_pubkey,
                "alias": info.alias,
                "num_active_channels": info.num_active_channels,
                "block_height": info.block_height,
                "synced_to_chain": info.synced_to_chain,
            }))?),
            OutputFormat::Quiet => Ok(info.identity_pubkey.clone()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Alias", "Pubkey", "Active Channels", "Block Height", "Synced"]);
                builder.push_record([
                    info.alias.clone(),
                    info.identity_pubkey.clone(),
                    info.num_active_channels.to_string(),
                    info.block_height.to_string(),
                    yes_no(info.synced_to_chain).to_string(),
                ]);
                Ok(self.render(builder))
            }
        }
    }

    /// Format the classified channels.
    ///
    /// Quiet output lists inactive channel ids only, one per line.
    pub fn format_inspection(&self, inspection: &Inspection, inactive_only: bool) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_inspection_json(inspection, inactive_only),
            OutputFormat::Table => Ok(self.format_inspection_table(inspection, inactive_only)),
            OutputFormat::Quiet => Ok(inspection
                .dormant_ids()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_inspection_json(&self, inspection: &Inspection, inactive_only: bool) -> Result<String> {
        let classification = &inspection.classification;
        let channels: Vec<serde_json::Value> = inspection
            .channels
            .iter()
            .filter(|c| !inactive_only || classification.is_cold(c.chan_id))
            .map(|c| {
                let evidence = classification.evidence(c.chan_id);
                serde_json::json!({
                    "chan_id": c.chan_id.to_string(),
                    "short_channel_id": c.chan_id.short_form(),
                    "channel_point": c.channel_point,
                    "remote_pubkey": c.remote_pubkey,
                    "capacity": c.capacity,
                    "active": c.active,
                    "downtime_secs": c.downtime(),
                    "hot": classification.is_hot(c.chan_id),
                    "evidence": evidence.map(|e| e.describe()),
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&serde_json::json!({
            "since": inspection.window.since(),
            "hot": classification.hot().len(),
            "cold": classification.cold().len(),
            "channels": channels,
        }))?)
    }

    fn format_inspection_table(&self, inspection: &Inspection, inactive_only: bool) -> String {
        let classification = &inspection.classification;
        let rows: Vec<_> = inspection
            .channels
            .iter()
            .filter(|c| !inactive_only || classification.is_cold(c.chan_id))
            .collect();

        if rows.is_empty() {
            return self.colorize("No channels found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record([
            "Chan ID", "SCID", "Channel Point", "Peer", "Capacity", "Online", "Downtime", "Status",
            "Evidence",
        ]);

        for channel in rows {
            let (status, evidence) = match classification.evidence(channel.chan_id) {
                Some(evidence) => ("active", evidence.describe()),
                None => ("inactive", "-".to_string()),
            };
            builder.push_record([
                channel.chan_id.to_string(),
                channel.chan_id.short_form(),
                channel.channel_point.clone(),
                abbreviate(&channel.remote_pubkey, 16),
                channel.capacity.to_string(),
                yes_no(channel.active).to_string(),
                format_days(channel.downtime()),
                status.to_string(),
                evidence,
            ]);
        }

        let mut out = self.render(builder);
        out.push('\n');
        out.push_str(&format!(
            "{} active, {} inactive (activity since {})",
            classification.hot().len(),
            classification.cold().len(),
            inspection.window.since()
        ));
        out
    }

    /// Format the outcome of a close run.
    pub fn format_report(&self, report: &CloseReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let outcomes: Vec<serde_json::Value> = report
                    .outcomes
                    .iter()
                    .map(|o| {
                        let (detail, response) = match &o.status {
                            CloseStatus::Failed { reason } => (Some(reason.as_str()), None),
                            CloseStatus::Closed { response } => (None, Some(response.as_str())),
                            _ => (None, None),
                        };
                        serde_json::json!({
                            "chan_id": o.chan_id.to_string(),
                            "channel_point": o.channel_point.as_ref().map(ToString::to_string),
                            "status": o.status.label(),
                            "reason": detail,
                            "response": response,
                        })
                    })
                    .collect();

                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "outcomes": outcomes,
                    "closed": report.closed(),
                    "failed": report.failed(),
                    "skipped": report.skipped(),
                    "dry_run": report.dry_run(),
                    "elapsed_secs": report.elapsed.as_secs_f64(),
                }))?)
            }
            OutputFormat::Quiet => Ok(report
                .outcomes
                .iter()
                .filter(|o| o.is_closed())
                .map(|o| o.chan_id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if report.is_empty() {
                    return Ok(self.info("Nothing to close"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Chan ID", "Channel Point", "Result"]);
                for outcome in &report.outcomes {
                    builder.push_record([
                        outcome.chan_id.to_string(),
                        outcome
                            .channel_point
                            .as_ref()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "-".to_string()),
                        outcome.status.to_string(),
                    ]);
                }

                let mut out = self.render(builder);
                out.push('\n');
                out.push_str(&self.report_counts(report));
                Ok(out)
            }
        }
    }

    /// One-line counts for a close run.
    pub fn report_counts(&self, report: &CloseReport) -> String {
        let mut line = format!(
            "{} closed, {} failed, {} skipped",
            report.closed(),
            report.failed(),
            report.skipped()
        );
        if report.dry_run() > 0 {
            line.push_str(&format!(", {} dry run", report.dry_run()));
        }
        line.push_str(&format!(" in {:.2}s", report.elapsed.as_secs_f64()));

        if report.all_succeeded() {
            self.success(&line)
        } else {
            self.warning(&line)
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn abbreviate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

/// Seconds as fractional days, e.g. `3.5d`
fn format_days(secs: u64) -> String {
    format!("{:.1}d", secs as f64 / 86_400.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chansweep_domain::{
        ActivityWindow, ChanId, Channel, ChannelPoint, ClassificationResult, CloseOutcome, Evidence,
    };
    use std::collections::HashMap;
    use std::time::Duration;

    fn inspection() -> Inspection {
        let mut hot = Channel::new(ChanId::new(245191093059585), "aaaa:0");
        hot.remote_pubkey = "02aabbccddeeff00112233445566778899".to_string();
        hot.capacity = 500_000;
        hot.lifetime = 86_400 * 10;
        hot.uptime = 86_400 * 4;
        let cold = Channel::new(ChanId::new(7), "bbbb:1");

        let mut evidence = HashMap::new();
        evidence.insert(
            hot.chan_id,
            Evidence {
                forward: true,
                ..Default::default()
            },
        );
        let classification =
            ClassificationResult::partition([hot.chan_id, cold.chan_id], &evidence);

        Inspection {
            window: ActivityWindow::starting_at(1_000),
            channels: vec![hot, cold],
            classification,
        }
    }

    fn report() -> CloseReport {
        CloseReport::new(
            vec![
                CloseOutcome::closed(ChanId::new(7), ChannelPoint::new("bbbb", 1), "{}"),
                CloseOutcome::skipped(ChanId::new(8)),
                CloseOutcome::failed(ChanId::new(9), None, "channel 9: close failed: timeout"),
            ],
            Duration::from_millis(250),
        )
    }

    #[test]
    fn test_inspection_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_inspection(&inspection(), false).unwrap();
        assert!(output.contains("Channel Point"));
        assert!(output.contains("245191093059585"));
        assert!(output.contains("223x1x1"));
        assert!(output.contains("forward"));
        assert!(output.contains("6.0d"));
        assert!(output.contains("1 active, 1 inactive"));
    }

    #[test]
    fn test_inspection_table_inactive_only() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_inspection(&inspection(), true).unwrap();
        assert!(output.contains("bbbb:1"));
        assert!(!output.contains("aaaa:0"));
    }

    #[test]
    fn test_inspection_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_inspection(&inspection(), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["since"], 1_000);
        assert_eq!(value["channels"][0]["hot"], true);
        assert_eq!(value["channels"][0]["evidence"], "forward");
        assert_eq!(value["channels"][1]["hot"], false);
        assert!(value["channels"][1]["evidence"].is_null());
    }

    #[test]
    fn test_inspection_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_inspection(&inspection(), false).unwrap();
        assert_eq!(output, "7");
    }

    #[test]
    fn test_report_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_report(&report()).unwrap();
        assert!(output.contains("bbbb:1"));
        assert!(output.contains("skipped: unresolved"));
        assert!(output.contains("failed: channel 9: close failed: timeout"));
        assert!(output.contains("1 closed, 1 failed, 1 skipped"));
    }

    #[test]
    fn test_report_json_and_quiet() {
        let json = Formatter::new(OutputFormat::Json, false)
            .format_report(&report())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["outcomes"][1]["status"], "skipped");
        assert_eq!(value["outcomes"][2]["reason"], "channel 9: close failed: timeout");
        assert_eq!(value["failed"], 1);

        let quiet = Formatter::new(OutputFormat::Quiet, false)
            .format_report(&report())
            .unwrap();
        assert_eq!(quiet, "7");
    }

    #[test]
    fn test_node_info_table() {
        let info = NodeInfo {
            identity_pubkey: "03deadbeef".to_string(),
            alias: "regtest-alice".to_string(),
            num_active_channels: 2,
            block_height: 840_000,
            synced_to_chain: true,
        };
        let output = Formatter::new(OutputFormat::Table, false)
            .format_node_info(&info)
            .unwrap();
        assert!(output.contains("regtest-alice"));
        assert!(output.contains("840000"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.error("test"), "✗ test");
    }

    #[test]
    fn test_abbreviate() {
        assert_eq!(abbreviate("02aabb", 16), "02aabb");
        assert_eq!(abbreviate("0123456789abcdefXYZ", 16), "0123456789abcdef…");
    }
}
