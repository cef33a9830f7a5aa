//! Configuration management for the CLI.

use crate::cli::LndArgs;
use crate::error::{CliError, Result};
use chansweep_janitor::JanitorConfig;
use chansweep_lnd::LndConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name
    #[serde(default = "default_profile")]
    pub active_profile: String,

    /// Node connection profiles
    #[serde(default)]
    pub profiles: BTreeMap<String, LndConfig>,

    /// Inspection and close settings
    #[serde(default)]
    pub janitor: JanitorConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// File this configuration was loaded from
    #[serde(skip)]
    path: Option<PathBuf>,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".chansweep").join("config.toml"))
    }

    /// Load configuration from the default path, or defaults if absent.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path()?)
    }

    /// Load configuration from `path`, or defaults if absent.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let mut config = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            toml::from_str::<Config>(&contents)?
        } else {
            Self::default()
        };

        config.path = Some(path);
        Ok(config)
    }

    /// Where [`save`](Self::save) writes
    pub fn path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Self::default_path(),
        }
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        let path = self.path()?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }

    /// Get the active profile.
    pub fn get_active_profile(&self) -> Result<&LndConfig> {
        self.profiles
            .get(&self.active_profile)
            .ok_or_else(|| CliError::Config(format!("Profile '{}' not found", self.active_profile)))
    }

    /// Add or update a profile.
    pub fn set_profile(&mut self, name: String, profile: LndConfig) {
        self.profiles.insert(name, profile);
    }

    /// Switch to a different profile.
    pub fn switch_profile(&mut self, name: String) -> Result<()> {
        if !self.profiles.contains_key(&name) {
            return Err(CliError::Config(format!("Profile '{}' does not exist", name)));
        }
        self.active_profile = name;
        Ok(())
    }

    /// Active profile with command-line and environment overrides applied
    ///
    /// A hex macaroon given on the command line replaces any macaroon file
    /// from the profile, and vice versa.
    pub fn resolve_lnd(&self, overrides: &LndArgs) -> Result<LndConfig> {
        let mut lnd = match (self.get_active_profile(), &overrides.rest_host) {
            (Ok(profile), _) => profile.clone(),
            (Err(_), Some(host)) => LndConfig::new(host.clone()),
            (Err(e), None) => return Err(e),
        };

        if let Some(host) = &overrides.rest_host {
            lnd.rest_host = host.clone();
        }
        if let Some(macaroon) = &overrides.macaroon {
            lnd.macaroon_hex = Some(macaroon.clone());
            lnd.macaroon_path = None;
        } else if let Some(path) = &overrides.macaroon_path {
            lnd.macaroon_path = Some(path.clone());
            lnd.macaroon_hex = None;
        }
        if let Some(cert) = &overrides.tls_cert {
            lnd.tls_cert_path = Some(cert.clone());
        }
        if overrides.accept_invalid_certs {
            lnd.accept_invalid_certs = true;
        }

        lnd.validate()?;
        Ok(lnd)
    }
}

/// Admin macaroon location of a default mainnet LND install
fn default_macaroon_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join(Path::new(".lnd/data/chain/bitcoin/mainnet/admin.macaroon"))
    })
}

impl Default for Config {
    fn default() -> Self {
        let mut lnd = LndConfig::new("https://127.0.0.1:8080");
        lnd.macaroon_path = default_macaroon_path();
        lnd.tls_cert_path = dirs::home_dir().map(|home| home.join(".lnd").join("tls.cert"));

        let mut profiles = BTreeMap::new();
        profiles.insert("default".to_string(), lnd);

        Self {
            active_profile: "default".to_string(),
            profiles,
            janitor: JanitorConfig::default(),
            settings: Settings::default(),
            path: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
