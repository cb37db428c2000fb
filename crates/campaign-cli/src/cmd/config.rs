use crate::output::print_json;
use anyhow::Context;
use campaign_core::config::{Config, WarnLevel};
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration
    Show,
    /// Validate the config for common mistakes
    Validate,
    /// List the role names offered for `responsible`
    Roles,
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
        ConfigSubcommand::Roles => roles(root, json),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    if json {
        print_json(&config)?;
    } else {
        let yaml = serde_yaml::to_string(&config).context("failed to render config")?;
        print!("{yaml}");
    }
    Ok(())
}

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}

fn roles(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    if json {
        print_json(&config.roles)?;
    } else if config.roles.is_empty() {
        println!("No roles configured.");
    } else {
        for role in &config.roles {
            println!("{role}");
        }
    }
    Ok(())
}
