//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// chansweep - Find and close Lightning channels with no recent activity.
#[derive(Debug, Parser)]
#[command(name = "chansweep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub lnd: LndArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Node connection overrides; each takes precedence over the active profile.
#[derive(Debug, Default, Args)]
pub struct LndArgs {
    /// LND REST host (must be https://)
    #[arg(long, env = "LND_REST_HOST", global = true)]
    pub rest_host: Option<String>,

    /// Hex-encoded admin macaroon
    #[arg(long, env = "LND_MACAROON", global = true, hide_env_values = true)]
    pub macaroon: Option<String>,

    /// Path to the admin macaroon file
    #[arg(long, env = "LND_MACAROON_PATH", global = true)]
    pub macaroon_path: Option<PathBuf>,

    /// Path to LND's tls.cert
    #[arg(long, env = "LND_TLS_CERT", global = true)]
    pub tls_cert: Option<PathBuf>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub accept_invalid_certs: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the connected node
    Info,

    /// Classify open channels as active or inactive
    Inspect(InspectArgs),

    /// Close inactive channels
    Close(CloseArgs),

    /// Manage configuration profiles
    Profile(ProfileArgs),
}

/// Arguments for the inspect command.
#[derive(Debug, Parser)]
pub struct InspectArgs {
    /// Activity lookback in days
    #[arg(short, long)]
    pub lookback_days: Option<u64>,

    /// List inactive channels only
    #[arg(long)]
    pub inactive: bool,
}

/// Arguments for the close command.
#[derive(Debug, Parser)]
pub struct CloseArgs {
    /// Activity lookback in days
    #[arg(short, long)]
    pub lookback_days: Option<u64>,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Resolve channel points without closing
    #[arg(long)]
    pub dry_run: bool,

    /// Force-close (unilateral) instead of cooperative close
    #[arg(long)]
    pub force: bool,

    /// Fee rate for the closing transactions
    #[arg(long)]
    pub sat_per_vbyte: Option<u64>,

    /// Give up on a single channel after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// REST host
        #[arg(long = "host")]
        host: String,
        /// Macaroon file
        #[arg(long = "macaroon-file")]
        macaroon_file: Option<PathBuf>,
        /// TLS certificate file
        #[arg(long = "cert")]
        cert: Option<PathBuf>,
        /// Skip TLS certificate verification
        #[arg(long = "insecure")]
        insecure: bool,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_command() {
        let cli = Cli::try_parse_from(["chansweep", "inspect", "--lookback-days", "30"]).unwrap();
        match cli.command {
            Command::Inspect(args) => assert_eq!(args.lookback_days, Some(30)),
            _ => panic!("Expected Inspect command"),
        }
    }

    #[test]
    fn test_close_command() {
        let cli = Cli::try_parse_from([
            "chansweep",
            "close",
            "-y",
            "--force",
            "--sat-per-vbyte",
            "3",
        ])
        .unwrap();
        match cli.command {
            Command::Close(args) => {
                assert!(args.yes);
                assert!(args.force);
                assert!(!args.dry_run);
                assert_eq!(args.sat_per_vbyte, Some(3));
            }
            _ => panic!("Expected Close command"),
        }
    }

    #[test]
    fn test_global_overrides_after_subcommand() {
        let cli = Cli::try_parse_from([
            "chansweep",
            "info",
            "--rest-host",
            "https://10.0.0.2:8080",
            "--profile",
            "regtest",
        ])
        .unwrap();
        assert_eq!(cli.lnd.rest_host.as_deref(), Some("https://10.0.0.2:8080"));
        assert_eq!(cli.profile.as_deref(), Some("regtest"));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["chansweep"]).is_err());
    }
}
