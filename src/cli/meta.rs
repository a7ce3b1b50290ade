//
//  redmine-cli
//  cli/meta.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Lookup commands for the ids used when filtering and editing issues.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::metadata::{IssueStatus, Priority, Tracker};
use crate::output::{format_bool, format_status, truncate, TableRow};
use crate::tools::metadata as handlers;

use super::GlobalOptions;

/// List trackers, statuses and priorities
#[derive(Args, Debug)]
pub struct MetaCommand {
    #[command(subcommand)]
    pub command: MetaSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum MetaSubcommand {
    /// List trackers
    Trackers,

    /// List issue statuses
    Statuses,

    /// List issue priorities
    Priorities,
}

impl TableRow for Tracker {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "DEFAULT STATUS", "DESCRIPTION"]
    }

    fn row(&self, _color: bool) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.default_status
                .as_ref()
                .map(|s| s.name.clone())
                .unwrap_or_default(),
            truncate(self.description.as_deref().unwrap_or(""), 50),
        ]
    }
}

impl TableRow for IssueStatus {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "CLOSED"]
    }

    fn row(&self, color: bool) -> Vec<String> {
        vec![
            self.id.to_string(),
            format_status(&self.name, color),
            format_bool(self.is_closed, color),
        ]
    }
}

impl TableRow for Priority {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "DEFAULT", "ACTIVE"]
    }

    fn row(&self, color: bool) -> Vec<String> {
        vec![
            self.id.to_string(),
            format_status(&self.name, color),
            format_bool(self.is_default, color),
            format_bool(self.active, color),
        ]
    }
}

impl MetaCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let writer = global.writer();
        match &self.command {
            MetaSubcommand::Trackers => {
                let response = handlers::list_trackers(&client).await?;
                writer.write_list::<Tracker>(&response, "trackers")
            }
            MetaSubcommand::Statuses => {
                let response = handlers::list_issue_statuses(&client).await?;
                writer.write_list::<IssueStatus>(&response, "issue_statuses")
            }
            MetaSubcommand::Priorities => {
                let response = handlers::list_priorities(&client).await?;
                writer.write_list::<Priority>(&response, "issue_priorities")
            }
        }
    }
}
