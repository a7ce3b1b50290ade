//
//  redmine-cli
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod completion;
mod config;
mod file;
mod issue;
mod meta;
mod project;
mod tools;
mod user;

pub use completion::CompletionCommand;
pub use config::ConfigCommand;
pub use file::FileCommand;
pub use issue::IssueCommand;
pub use meta::MetaCommand;
pub use project::ProjectCommand;
pub use tools::{ServeCommand, ToolsCommand};
pub use user::UserCommand;

use clap::{Parser, Subcommand};

use crate::api::{ApiError, RedmineClient};
use crate::config::{ConfigFile, RedmineConfig, API_KEY_ENV, TIMEOUT_ENV, URL_ENV};
use crate::output::{OutputFormat, OutputWriter};

/// Redmine CLI - Work with Redmine from the command line
#[derive(Parser, Debug)]
#[command(
    name = "redmine",
    version,
    about = "Work with Redmine from the command line",
    long_about = "redmine is a CLI for the Redmine REST API.\n\n\
                  It brings projects, issues and attachments to your terminal, and \
                  serves the same operations as JSON tools over stdio.",
    propagate_version = true,
    after_help = "Use 'redmine <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Redmine instance URL
    #[arg(long, global = true, env = URL_ENV)]
    pub url: Option<String>,

    /// Redmine API key
    #[arg(long, global = true, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = TIMEOUT_ENV)]
    pub timeout: Option<u64>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

impl GlobalOptions {
    /// Resolves the connection settings from flags, environment and file.
    pub fn config(&self) -> Result<RedmineConfig, ApiError> {
        let file = ConfigFile::load().unwrap_or_else(|e| {
            self.writer()
                .write_warning(&format!("Ignoring config file: {e:#}"));
            ConfigFile::default()
        });
        RedmineConfig::resolve(self.url.as_deref(), self.api_key.as_deref(), self.timeout, &file)
    }

    /// Builds the client every command shares.
    pub fn client(&self) -> Result<RedmineClient, ApiError> {
        let config = self.config()?;
        tracing::debug!("Using Redmine at {}", config.base_url());
        RedmineClient::new(&config)
    }

    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        }
    }

    pub fn writer(&self) -> OutputWriter {
        OutputWriter::new(self.format())
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse and search projects
    #[command(visible_alias = "proj")]
    Project(ProjectCommand),

    /// Manage issues and their relations
    Issue(IssueCommand),

    /// List trackers, statuses and priorities
    Meta(MetaCommand),

    /// List users
    User(UserCommand),

    /// Upload files and download attachments
    File(FileCommand),

    /// List or call tools
    Tools(ToolsCommand),

    /// Serve tools as JSON lines over stdio
    Serve(ServeCommand),

    /// Manage CLI configuration
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),

    /// Print version information
    Version,
}
