//
//  redmine-cli
//  cli/tools.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Tool catalog and stdio server commands
//!
//! `redmine tools` lists the operations exposed to agents, `redmine tools
//! call` runs one of them with JSON arguments, and `redmine serve` answers
//! JSON-line requests on stdin until it closes.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::Value;

use crate::output::{write_json, TableBuilder};
use crate::tools::{self, serve, Tool};

use super::GlobalOptions;

/// List or call tools
#[derive(Args, Debug)]
pub struct ToolsCommand {
    #[command(subcommand)]
    pub command: Option<ToolsSubcommand>,
}

#[derive(Subcommand, Debug)]
pub enum ToolsSubcommand {
    /// List available tools (default)
    #[command(visible_alias = "ls")]
    List,

    /// Call a tool once and print its JSON result
    Call(CallArgs),
}

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Tool name, as shown by 'redmine tools list'
    pub name: Tool,

    /// Arguments as a JSON object
    #[arg(long, short = 'a', default_value = "{}")]
    pub args: String,
}

impl ToolsCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            None | Some(ToolsSubcommand::List) => self.list(global),
            Some(ToolsSubcommand::Call(args)) => self.call(args, global).await,
        }
    }

    fn list(&self, global: &GlobalOptions) -> Result<()> {
        if global.json {
            let catalog: Vec<Value> = Tool::ALL
                .iter()
                .map(|t| serde_json::json!({"name": t.name(), "description": t.description()}))
                .collect();
            return write_json(&catalog);
        }

        let writer = global.writer();
        TableBuilder::new()
            .color(writer.color_enabled())
            .headers(["TOOL", "DESCRIPTION"])
            .rows(Tool::ALL.iter().map(|t| [t.name(), t.description()]))
            .print();
        Ok(())
    }

    async fn call(&self, args: &CallArgs, global: &GlobalOptions) -> Result<()> {
        let arguments: Value = serde_json::from_str(&args.args)
            .with_context(|| format!("--args is not valid JSON: {}", args.args))?;
        let client = global.client()?;
        let result = tools::dispatch(&client, args.name.name(), arguments).await?;
        write_json(&result)
    }
}

/// Serve tools as JSON lines over stdio
#[derive(Args, Debug)]
pub struct ServeCommand {}

impl ServeCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = Arc::new(global.client()?);
        tracing::info!("Serving {} tools for {}", Tool::ALL.len(), client.base_url());
        serve::serve_stdio(client).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_call_parses_tool_name() {
        let cli = Cli::try_parse_from(["redmine", "tools", "call", "get_issue", "--args", r#"{"issue_id":1}"#])
            .unwrap();
        match cli.command {
            crate::cli::Commands::Tools(ToolsCommand {
                command: Some(ToolsSubcommand::Call(args)),
            }) => {
                assert_eq!(args.name, Tool::GetIssue);
                assert_eq!(args.args, r#"{"issue_id":1}"#);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_call_rejects_unknown_tool() {
        assert!(Cli::try_parse_from(["redmine", "tools", "call", "drop_database"]).is_err());
    }
}
