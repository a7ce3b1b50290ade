//
//  redmine-cli
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI configuration commands
//!
//! This module provides commands for managing the config file: getting,
//! setting, unsetting and listing values. The API key is never printed in
//! full.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use crate::config::{mask_secret, ConfigFile, DEFAULT_TIMEOUT_SECS, VALID_KEYS};
use crate::output::write_json;

use super::GlobalOptions;

/// Manage CLI configuration
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get a configuration value
    Get(KeyArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Unset a configuration value
    Unset(KeyArgs),

    /// Show all configuration values, with the API key masked
    #[command(visible_alias = "list")]
    Show,

    /// Show configuration file path
    Path,
}

#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Configuration key (url, api_key, timeout)
    pub key: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Configuration key (url, api_key, timeout)
    pub key: String,

    /// Configuration value
    pub value: String,
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Unknown configuration key '{}'. Valid keys: {}",
        key,
        VALID_KEYS.join(", ")
    )
}

/// Value as shown to the user, with the API key masked.
fn display_value(key: &str, value: &str) -> String {
    if key == "api_key" {
        mask_secret(value)
    } else {
        value.to_string()
    }
}

impl ConfigCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Get(args) => self.get(args, global),
            ConfigSubcommand::Set(args) => self.set(args, global),
            ConfigSubcommand::Unset(args) => self.unset(args, global),
            ConfigSubcommand::Show => self.show(global),
            ConfigSubcommand::Path => self.path(global),
        }
    }

    fn get(&self, args: &KeyArgs, global: &GlobalOptions) -> Result<()> {
        if !VALID_KEYS.contains(&args.key.as_str()) {
            return Err(unknown_key(&args.key));
        }
        let file = ConfigFile::load()?;
        let value = file.get(&args.key).map(|v| display_value(&args.key, &v));

        if global.json {
            return write_json(&serde_json::json!({
                "key": args.key,
                "value": value,
            }));
        }
        if let Some(v) = value {
            println!("{}", v);
        }
        Ok(())
    }

    fn set(&self, args: &SetArgs, global: &GlobalOptions) -> Result<()> {
        let mut file = ConfigFile::load()?;
        if !file.set(&args.key, &args.value)? {
            return Err(unknown_key(&args.key));
        }
        if args.key == "url" {
            // Reject values the client would refuse later
            if let Err(e) = url::Url::parse(&args.value) {
                bail!("Invalid URL '{}': {}", args.value, e);
            }
        }
        let path = file.save()?;
        tracing::debug!("Saved config to {}", path.display());

        let shown = display_value(&args.key, &args.value);
        if global.json {
            return write_json(&serde_json::json!({
                "success": true,
                "key": args.key,
                "value": shown,
            }));
        }
        println!(
            "{} Set {} = {}",
            style("✓").green(),
            style(&args.key).cyan(),
            shown
        );
        Ok(())
    }

    fn unset(&self, args: &KeyArgs, global: &GlobalOptions) -> Result<()> {
        let mut file = ConfigFile::load()?;
        if !file.unset(&args.key) {
            return Err(unknown_key(&args.key));
        }
        file.save()?;

        if global.json {
            return write_json(&serde_json::json!({
                "success": true,
                "key": args.key,
            }));
        }
        println!("{} Unset {}", style("✓").green(), style(&args.key).cyan());
        Ok(())
    }

    fn show(&self, global: &GlobalOptions) -> Result<()> {
        let file = ConfigFile::load()?;
        let api_key = file.api_key.as_deref().map(mask_secret);

        if global.json {
            return write_json(&serde_json::json!({
                "url": file.url,
                "api_key": api_key,
                "timeout": file.timeout,
            }));
        }

        println!();
        println!("{}", style("Configuration").bold());
        println!("{}", "-".repeat(50));
        print_kv("url", file.url.as_deref());
        print_kv("api_key", api_key.as_deref());
        match file.timeout {
            Some(t) => print_kv("timeout", Some(&t.to_string())),
            None => println!(
                "  {}: {}",
                style("timeout").cyan(),
                style(format!("{} (default)", DEFAULT_TIMEOUT_SECS)).dim()
            ),
        }
        println!();
        Ok(())
    }

    fn path(&self, global: &GlobalOptions) -> Result<()> {
        let path = ConfigFile::path()?;
        if global.json {
            return write_json(&serde_json::json!({
                "path": path.display().to_string(),
                "exists": path.exists(),
            }));
        }
        println!("{}", path.display());
        Ok(())
    }
}

fn print_kv(key: &str, value: Option<&str>) {
    match value {
        Some(v) => println!("  {}: {}", style(key).cyan(), v),
        None => println!("  {}: {}", style(key).cyan(), style("(not set)").dim()),
    }
}
