//! Profile command implementation.

use crate::cli::{ProfileAction, ProfileArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use chansweep_lnd::LndConfig;
use std::path::PathBuf;

/// Execute the profile command.
pub fn execute_profile(args: ProfileArgs, config: &mut Config, formatter: &Formatter) -> Result<()> {
    match args.action {
        ProfileAction::List => list_profiles(config, formatter),
        ProfileAction::Show => show_active_profile(config, formatter),
        ProfileAction::Switch { name } => switch_profile(config, name, formatter),
        ProfileAction::Set {
            name,
            host,
            macaroon_file,
            cert,
            insecure,
        } => {
            let mut profile = LndConfig::new(host);
            profile.macaroon_path = macaroon_file;
            profile.tls_cert_path = cert;
            profile.accept_invalid_certs = insecure;
            set_profile(config, name, profile, formatter)
        }
        ProfileAction::Delete { name } => delete_profile(config, name, formatter),
    }
}

fn describe(profile: &LndConfig, indent: &str) {
    println!("{}Host: {}", indent, profile.rest_host);
    if let Some(path) = &profile.macaroon_path {
        println!("{}Macaroon: {}", indent, path.display());
    } else if profile.macaroon_hex.is_some() {
        println!("{}Macaroon: (inline)", indent);
    }
    if let Some(cert) = &profile.tls_cert_path {
        println!("{}TLS cert: {}", indent, cert.display());
    }
    if profile.accept_invalid_certs {
        println!("{}Certificate verification: disabled", indent);
    }
}

/// List all profiles.
fn list_profiles(config: &Config, formatter: &Formatter) -> Result<()> {
    if config.profiles.is_empty() {
        println!("{}", formatter.info("No profiles configured"));
        return Ok(());
    }

    println!("Available profiles:");
    for (name, profile) in &config.profiles {
        if name == &config.active_profile {
            println!("* {}", formatter.success(name));
        } else {
            println!("  {}", name);
        }
        describe(profile, "    ");
    }

    Ok(())
}

/// Show the active profile.
fn show_active_profile(config: &Config, formatter: &Formatter) -> Result<()> {
    let profile = config.get_active_profile()?;

    println!("Active profile: {}", formatter.success(&config.active_profile));
    describe(profile, "  ");
    println!("  Config file: {}", config.path().unwrap_or_else(|_| PathBuf::from("-")).display());

    Ok(())
}

/// Switch to a different profile.
fn switch_profile(config: &mut Config, name: String, formatter: &Formatter) -> Result<()> {
    config.switch_profile(name.clone())?;
    config.save()?;
    println!("{}", formatter.success(&format!("Switched to profile '{}'", name)));
    Ok(())
}

/// Create or update a profile.
fn set_profile(config: &mut Config, name: String, profile: LndConfig, formatter: &Formatter) -> Result<()> {
    if !profile.rest_host.starts_with("https://") {
        return Err(CliError::Config(format!(
            "Invalid host '{}', must be https://",
            profile.rest_host
        )));
    }

    let action = if config.profiles.contains_key(&name) {
        "Updated"
    } else {
        "Created"
    };

    config.set_profile(name.clone(), profile);
    config.save()?;

    println!("{}", formatter.success(&format!("{} profile '{}'", action, name)));

    Ok(())
}

/// Delete a profile.
fn delete_profile(config: &mut Config, name: String, formatter: &Formatter) -> Result<()> {
    if name == config.active_profile {
        return Err(CliError::NotPermitted(
            "Cannot delete the active profile".to_string(),
        ));
    }

    if config.profiles.remove(&name).is_some() {
        config.save()?;
        println!("{}", formatter.success(&format!("Deleted profile '{}'", name)));
    } else {
        println!("{}", formatter.warning(&format!("Profile '{}' does not exist", name)));
    }

    Ok(())
}
