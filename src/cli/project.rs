//
//  redmine-cli
//  cli/project.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Project commands

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;

use crate::api::projects::{Membership, Project};
use crate::api::ResourceId;
use crate::output::{
    format_bool, format_status, print_field, print_optional_field, truncate, TableOutput, TableRow,
};
use crate::tools::projects::{self as handlers, ListProjectsArgs, ProjectArgs, SearchProjectsArgs};

use super::GlobalOptions;

/// Browse and search projects
#[derive(Args, Debug)]
pub struct ProjectCommand {
    #[command(subcommand)]
    pub command: ProjectSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProjectSubcommand {
    /// List projects
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// View a project
    View(ProjectRef),

    /// Search projects by name, identifier or description
    Search(SearchArgs),

    /// List project members
    Members(ProjectRef),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Maximum number of projects to list (max 100)
    #[arg(long, short = 'l', default_value = "25")]
    pub limit: u32,

    /// Number of projects to skip
    #[arg(long, default_value = "0")]
    pub offset: u32,
}

#[derive(Args, Debug)]
pub struct ProjectRef {
    /// Project id or identifier
    pub project: ResourceId,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text to look for
    pub query: String,
}

impl TableRow for Project {
    fn headers() -> &'static [&'static str] {
        &["ID", "IDENTIFIER", "NAME", "STATUS"]
    }

    fn row(&self, color: bool) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.identifier.clone(),
            truncate(&self.name, 40),
            format_status(self.status_label(), color),
        ]
    }
}

impl TableOutput for Project {
    fn print_table(&self, color: bool) {
        let title = if color {
            style(&self.name).cyan().bold().to_string()
        } else {
            self.name.clone()
        };
        println!("{} ({})", title, self.identifier);
        println!();
        print_field("ID", &self.id.to_string(), color);
        print_field("Status", &format_status(self.status_label(), color), color);
        if let Some(public) = self.is_public {
            print_field("Public", &format_bool(public, color), color);
        }
        if let Some(parent) = &self.parent {
            print_field("Parent", &parent.name, color);
        }
        print_optional_field("Homepage", self.homepage.as_deref(), color);
        print_optional_field("Created", self.created_on.as_deref(), color);
        print_optional_field("Updated", self.updated_on.as_deref(), color);

        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            println!();
            println!("{}", description);
        }
    }
}

impl TableRow for Membership {
    fn headers() -> &'static [&'static str] {
        &["ID", "MEMBER", "KIND", "ROLES"]
    }

    fn row(&self, _color: bool) -> Vec<String> {
        let kind = if self.user.is_some() { "user" } else { "group" };
        vec![
            self.id.to_string(),
            self.member_name().to_string(),
            kind.to_string(),
            self.role_names(),
        ]
    }
}

impl ProjectCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ProjectSubcommand::List(args) => self.list(args, global).await,
            ProjectSubcommand::View(args) => self.view(args, global).await,
            ProjectSubcommand::Search(args) => self.search(args, global).await,
            ProjectSubcommand::Members(args) => self.members(args, global).await,
        }
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let response = handlers::list_projects(
            &client,
            ListProjectsArgs {
                limit: args.limit,
                offset: args.offset,
            },
        )
        .await?;
        global.writer().write_list::<Project>(&response, "projects")
    }

    async fn view(&self, args: &ProjectRef, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let response = handlers::get_project(
            &client,
            ProjectArgs {
                project_id: args.project.clone(),
            },
        )
        .await?;
        global.writer().write::<Project>(&response, "project")
    }

    async fn search(&self, args: &SearchArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let response = handlers::search_projects(
            &client,
            SearchProjectsArgs {
                query: args.query.clone(),
            },
        )
        .await?;
        global.writer().write_list::<Project>(&response, "projects")
    }

    async fn members(&self, args: &ProjectRef, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let response = handlers::get_project_members(
            &client,
            ProjectArgs {
                project_id: args.project.clone(),
            },
        )
        .await?;
        global
            .writer()
            .write_list::<Membership>(&response, "memberships")
    }
}
