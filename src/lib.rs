//
//  redmine-cli
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Redmine CLI Library
//!
//! A thin adapter over the Redmine REST API that exposes projects, issues,
//! relations, metadata, users, memberships and file transfers as individually
//! callable tools.
//!
//! ## Overview
//!
//! The same set of stateless tool handlers is reachable from two surfaces:
//!
//! - the `redmine` command line, with table or JSON output
//! - `redmine serve`, a line-delimited JSON request/response protocol on
//!   stdin/stdout meant for external agents
//!
//! ## Module Structure
//!
//! - [`api`]: HTTP client wrapper, error taxonomy, request/response models
//! - [`tools`]: Tool handlers, the tool catalog and the stdio server
//! - [`config`]: Connection settings from flags, environment and config file
//! - [`cli`]: Command-line interface definitions using clap
//! - [`output`]: Output formatting (Table, JSON)
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use redmine_cli::api::RedmineClient;
//! use redmine_cli::config::RedmineConfig;
//! use redmine_cli::tools::issues::{get_issue, GetIssueArgs};
//!
//! # async fn example() -> Result<(), redmine_cli::api::ApiError> {
//! let config = RedmineConfig::new("https://redmine.example.com", "secret")?;
//! let client = RedmineClient::new(&config)?;
//! let issue = get_issue(&client, GetIssueArgs { issue_id: 42 }).await?;
//! println!("{}", issue["issue"]["subject"]);
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions.
///
/// Contains all CLI commands, arguments, and subcommands defined using the clap derive API.
pub mod cli;

/// Redmine REST API client.
///
/// The client translates typed calls into REST requests, maps HTTP status codes
/// onto [`api::ApiError`] and decodes JSON bodies.
pub mod api;

/// Connection configuration.
///
/// Resolves the Redmine base URL, API key and timeout from command-line flags,
/// environment variables and an optional TOML file.
pub mod config;

/// Tool handlers and the request/response tool server.
pub mod tools;

/// Output formatting for different modes.
///
/// Provides formatters for:
/// - Table format: Human-readable tables for interactive use
/// - JSON format: Structured output for scripting and automation
pub mod output;

/// Re-export of the main CLI struct for convenient access.
pub use cli::Cli;

/// Re-export of the API client and its error type.
pub use api::{ApiError, RedmineClient};

/// Re-export of the connection configuration.
pub use config::RedmineConfig;

/// Application name constant.
///
/// The name of the CLI binary, used for display purposes and configuration paths.
pub const APP_NAME: &str = "redmine";

/// Application version constant.
///
/// The current version of the CLI, automatically derived from Cargo.toml
/// at compile time using the `CARGO_PKG_VERSION` environment variable.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// Standardized exit codes following Unix conventions, allowing scripts
/// to programmatically detect the outcome of CLI operations.
///
/// # Example
///
/// ```rust,no_run
/// use redmine_cli::exit_codes;
/// use std::process;
///
/// process::exit(exit_codes::CONFIG_ERROR);
/// ```
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error.
    ///
    /// An unspecified error occurred during execution.
    /// Check stderr for details.
    pub const ERROR: i32 = 1;

    /// Invalid usage or arguments.
    ///
    /// Also used for arguments rejected by local validation before any
    /// request is sent.
    pub const USAGE: i32 = 2;

    /// Required configuration is missing or invalid.
    ///
    /// Set `REDMINE_URL` and `REDMINE_API_KEY`, pass `--url`/`--api-key`,
    /// or run `redmine config set`.
    pub const CONFIG_ERROR: i32 = 3;

    /// Authentication failed or access was forbidden.
    pub const AUTH_ERROR: i32 = 4;

    /// Resource not found.
    pub const NOT_FOUND: i32 = 8;
}
