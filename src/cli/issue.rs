//
//  redmine-cli
//  cli/issue.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issue commands
//!
//! Listing, viewing, creating, editing and deleting issues, plus relation
//! management. Every subcommand goes through the same handlers as the tool
//! server, so local validation behaves identically in both.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use crate::api::issues::{CustomFieldValue, Issue, IssueAttributes, IssueUpdate, UploadRef};
use crate::api::relations::{Relation, RelationType};
use crate::api::ResourceId;
use crate::output::{
    extract, format_status, print_field, print_header, print_optional_field, truncate, write_json,
    TableOutput, TableRow,
};
use crate::tools::issues::{self as handlers, CreateIssueArgs, GetIssueArgs, ListIssuesArgs, UpdateIssueArgs};
use crate::tools::relations::{self as relation_handlers, CreateRelationArgs, DeleteRelationArgs};

use super::GlobalOptions;

/// Manage issues and their relations
#[derive(Args, Debug)]
pub struct IssueCommand {
    #[command(subcommand)]
    pub command: IssueSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum IssueSubcommand {
    /// List issues
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// View an issue with its history, attachments and relations
    View(ViewArgs),

    /// Create a new issue
    Create(CreateArgs),

    /// Edit an issue or add a note
    Edit(EditArgs),

    /// Delete an issue
    Delete(DeleteArgs),

    /// Relate two issues
    Relate(RelateArgs),

    /// Remove an issue relation
    Unrelate(UnrelateArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by project id or identifier
    #[arg(long, short = 'p')]
    pub project: Option<ResourceId>,

    /// Filter by tracker id
    #[arg(long, short = 't')]
    pub tracker: Option<u64>,

    /// Filter by status: open, closed, * or a status id
    #[arg(long, short = 's', default_value = "*")]
    pub status: String,

    /// Filter by assignee id, or "me"
    #[arg(long, short = 'a')]
    pub assignee: Option<ResourceId>,

    /// Filter by priority id
    #[arg(long)]
    pub priority: Option<u64>,

    /// Maximum number of issues to list (max 100)
    #[arg(long, short = 'l', default_value = "25")]
    pub limit: u32,

    /// Number of issues to skip
    #[arg(long, default_value = "0")]
    pub offset: u32,
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Issue ID
    pub id: u64,
}

/// Optional issue fields shared by create and edit
#[derive(Args, Debug, Default)]
pub struct AttributeArgs {
    /// Description text
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Tracker id
    #[arg(long, short = 't')]
    pub tracker: Option<u64>,

    /// Status id
    #[arg(long, short = 's')]
    pub status: Option<u64>,

    /// Priority id
    #[arg(long)]
    pub priority: Option<u64>,

    /// Assignee user id
    #[arg(long, short = 'a')]
    pub assignee: Option<u64>,

    /// Category id
    #[arg(long)]
    pub category: Option<u64>,

    /// Target version id
    #[arg(long = "target-version")]
    pub fixed_version: Option<u64>,

    /// Parent issue id
    #[arg(long)]
    pub parent: Option<u64>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due_date: Option<String>,

    /// Estimated hours
    #[arg(long)]
    pub estimated_hours: Option<f64>,

    /// Done ratio (0-100)
    #[arg(long)]
    pub done_ratio: Option<i32>,

    /// Mark the issue private or public
    #[arg(long)]
    pub private: Option<bool>,

    /// Watcher user id (repeatable)
    #[arg(long = "watcher")]
    pub watchers: Vec<u64>,

    /// Custom field as ID=VALUE (repeatable)
    #[arg(long = "custom-field", value_parser = parse_custom_field)]
    pub custom_fields: Vec<CustomFieldValue>,

    /// Upload token from 'redmine file upload', as TOKEN or TOKEN:FILENAME (repeatable)
    #[arg(long = "upload", value_parser = parse_upload)]
    pub uploads: Vec<UploadRef>,
}

impl AttributeArgs {
    pub fn to_attributes(&self) -> IssueAttributes {
        IssueAttributes {
            description: self.description.clone(),
            tracker_id: self.tracker,
            status_id: self.status,
            priority_id: self.priority,
            assigned_to_id: self.assignee,
            category_id: self.category,
            fixed_version_id: self.fixed_version,
            parent_issue_id: self.parent,
            start_date: self.start_date.clone(),
            due_date: self.due_date.clone(),
            estimated_hours: self.estimated_hours,
            done_ratio: self.done_ratio,
            is_private: self.private,
            watcher_user_ids: non_empty(self.watchers.clone()),
            custom_fields: non_empty(self.custom_fields.clone()),
            uploads: non_empty(self.uploads.clone()),
        }
    }
}

fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

fn parse_custom_field(s: &str) -> Result<CustomFieldValue, String> {
    let (id, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got '{s}'"))?;
    let id = id
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("custom field id must be a number, got '{id}'"))?;
    Ok(CustomFieldValue {
        id,
        value: Value::String(value.to_string()),
    })
}

fn parse_upload(s: &str) -> Result<UploadRef, String> {
    let (token, filename) = match s.split_once(':') {
        Some((token, filename)) => (token, Some(filename.to_string())),
        None => (s, None),
    };
    if token.is_empty() {
        return Err("upload token must not be empty".to_string());
    }
    Ok(UploadRef {
        token: token.to_string(),
        filename,
        content_type: None,
        description: None,
    })
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Project id or identifier
    #[arg(long, short = 'p')]
    pub project: ResourceId,

    /// Issue subject
    #[arg(long)]
    pub subject: String,

    #[command(flatten)]
    pub attributes: AttributeArgs,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Issue ID
    pub id: u64,

    /// New subject
    #[arg(long)]
    pub subject: Option<String>,

    #[command(flatten)]
    pub attributes: AttributeArgs,

    /// Note to add to the issue history
    #[arg(long, short = 'n')]
    pub notes: Option<String>,

    /// Make the note private
    #[arg(long)]
    pub private_notes: Option<bool>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Issue ID
    pub id: u64,

    /// Confirm the deletion
    #[arg(long)]
    pub confirm: bool,
}

#[derive(Args, Debug)]
pub struct RelateArgs {
    /// Source issue ID
    pub id: u64,

    /// Target issue ID
    pub target: u64,

    /// Relation type
    #[arg(long = "type", short = 't', default_value = "relates", value_parser = RelationType::ALL.map(|t| t.as_str()))]
    pub relation_type: String,

    /// Delay in days (precedes/follows only)
    #[arg(long)]
    pub delay: Option<i64>,
}

#[derive(Args, Debug)]
pub struct UnrelateArgs {
    /// Relation ID, as shown by 'redmine issue view'
    pub relation_id: u64,
}

impl TableRow for Issue {
    fn headers() -> &'static [&'static str] {
        &["ID", "TRACKER", "STATUS", "PRIORITY", "ASSIGNEE", "SUBJECT"]
    }

    fn row(&self, color: bool) -> Vec<String> {
        vec![
            format!("#{}", self.id),
            self.tracker.name.clone(),
            format_status(&self.status.name, color),
            format_status(&self.priority.name, color),
            self.assignee_name().to_string(),
            truncate(&self.subject, 60),
        ]
    }
}

impl TableOutput for Issue {
    fn print_table(&self, color: bool) {
        let heading = format!("{} #{}", self.tracker.name, self.id);
        if color {
            println!("{}: {}", style(heading).cyan().bold(), style(&self.subject).bold());
        } else {
            println!("{}: {}", heading, self.subject);
        }
        println!();

        print_field("Project", &self.project.name, color);
        print_field("Status", &format_status(&self.status.name, color), color);
        print_field("Priority", &format_status(&self.priority.name, color), color);
        if let Some(author) = &self.author {
            print_field("Author", &author.name, color);
        }
        print_field(
            "Assignee",
            if self.assigned_to.is_some() { self.assignee_name() } else { "Unassigned" },
            color,
        );
        if let Some(category) = &self.category {
            print_field("Category", &category.name, color);
        }
        if let Some(version) = &self.fixed_version {
            print_field("Target version", &version.name, color);
        }
        if let Some(parent) = &self.parent {
            print_field("Parent", &format!("#{}", parent.id), color);
        }
        print_optional_field("Start date", self.start_date.as_deref(), color);
        print_optional_field("Due date", self.due_date.as_deref(), color);
        if let Some(ratio) = self.done_ratio {
            print_field("Done", &format!("{ratio}%"), color);
        }
        if let Some(hours) = self.estimated_hours {
            print_field("Estimated", &format!("{hours}h"), color);
        }
        print_optional_field("Created", self.created_on.as_deref(), color);
        print_optional_field("Updated", self.updated_on.as_deref(), color);

        if let Some(description) = self.description.as_deref().filter(|d| !d.trim().is_empty()) {
            println!();
            print_header("Description");
            println!("{}", description);
        }

        if !self.children.is_empty() {
            println!();
            print_header("Subtasks");
            for child in &self.children {
                let tracker = child.tracker.as_ref().map(|t| t.name.as_str()).unwrap_or("");
                println!("  {} #{}: {}", tracker, child.id, child.subject);
            }
        }

        if !self.relations.is_empty() {
            println!();
            print_header("Relations");
            for relation in &self.relations {
                println!("  {}", describe_relation(relation));
            }
        }

        if !self.attachments.is_empty() {
            println!();
            print_header("Attachments");
            for attachment in &self.attachments {
                println!(
                    "  {} ({} bytes){}",
                    attachment.filename,
                    attachment.filesize,
                    attachment
                        .content_url
                        .as_deref()
                        .map(|u| format!(" {u}"))
                        .unwrap_or_default()
                );
            }
        }

        let notes: Vec<_> = self
            .journals
            .iter()
            .filter(|j| j.notes.as_deref().is_some_and(|n| !n.trim().is_empty()))
            .collect();
        if !notes.is_empty() {
            println!();
            print_header("Notes");
            for journal in notes {
                let author = journal.user.as_ref().map(|u| u.name.as_str()).unwrap_or("Anonymous");
                let when = journal.created_on.as_deref().unwrap_or("");
                let author = if color {
                    style(author).cyan().bold().to_string()
                } else {
                    author.to_string()
                };
                println!("{} {}{}", author, when, if journal.private_notes { " (private)" } else { "" });
                for line in journal.notes.as_deref().unwrap_or("").lines() {
                    println!("  {}", line);
                }
                println!();
            }
        }
    }
}

fn describe_relation(relation: &Relation) -> String {
    let delay = relation
        .delay
        .map(|d| format!(" (delay {d} days)"))
        .unwrap_or_default();
    format!(
        "[{}] #{} {} #{}{}",
        relation.id, relation.issue_id, relation.relation_type, relation.issue_to_id, delay
    )
}

impl IssueCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            IssueSubcommand::List(args) => self.list(args, global).await,
            IssueSubcommand::View(args) => self.view(args, global).await,
            IssueSubcommand::Create(args) => self.create(args, global).await,
            IssueSubcommand::Edit(args) => self.edit(args, global).await,
            IssueSubcommand::Delete(args) => self.delete(args, global).await,
            IssueSubcommand::Relate(args) => self.relate(args, global).await,
            IssueSubcommand::Unrelate(args) => self.unrelate(args, global).await,
        }
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let response = handlers::list_issues(
            &client,
            ListIssuesArgs {
                project_id: args.project.clone(),
                tracker_id: args.tracker,
                status_id: args.status.clone(),
                assigned_to_id: args.assignee.clone(),
                priority_id: args.priority,
                limit: args.limit,
                offset: args.offset,
            },
        )
        .await?;
        global.writer().write_list::<Issue>(&response, "issues")
    }

    async fn view(&self, args: &ViewArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let response = handlers::get_issue(&client, GetIssueArgs { issue_id: args.id }).await?;
        global.writer().write::<Issue>(&response, "issue")
    }

    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let response = handlers::create_issue(
            &client,
            CreateIssueArgs {
                project_id: args.project.clone(),
                subject: args.subject.clone(),
                attributes: args.attributes.to_attributes(),
            },
        )
        .await?;

        let writer = global.writer();
        if writer.is_json() {
            return write_json(&response);
        }
        let issue: Issue = extract(&response, "issue")?;
        writer.write_success(&format!("Created {} #{}: {}", issue.tracker.name, issue.id, issue.subject));
        Ok(())
    }

    async fn edit(&self, args: &EditArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let response = handlers::update_issue(
            &client,
            UpdateIssueArgs {
                issue_id: args.id,
                changes: IssueUpdate {
                    subject: args.subject.clone(),
                    attributes: args.attributes.to_attributes(),
                    notes: args.notes.clone(),
                    private_notes: args.private_notes,
                },
            },
        )
        .await?;

        let writer = global.writer();
        if !writer.is_json() {
            writer.write_success(&format!("Updated issue #{}", args.id));
            println!();
        }
        writer.write::<Issue>(&response, "issue")
    }

    async fn delete(&self, args: &DeleteArgs, global: &GlobalOptions) -> Result<()> {
        if !args.confirm {
            bail!(
                "Refusing to delete issue #{} without --confirm. Deleted issues cannot be recovered.",
                args.id
            );
        }

        let client = global.client()?;
        let response = handlers::delete_issue(&client, GetIssueArgs { issue_id: args.id }).await?;

        let writer = global.writer();
        if writer.is_json() {
            return write_json(&response);
        }
        writer.write_success(&format!("Deleted issue #{}", args.id));
        Ok(())
    }

    async fn relate(&self, args: &RelateArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let response = relation_handlers::create_issue_relation(
            &client,
            CreateRelationArgs {
                issue_id: args.id,
                issue_to_id: args.target,
                relation_type: args.relation_type.clone(),
                delay: args.delay,
            },
        )
        .await?;

        let writer = global.writer();
        if writer.is_json() {
            return write_json(&response);
        }
        let relation: Relation = extract(&response, "relation")?;
        writer.write_success(&format!("Created relation {}", describe_relation(&relation)));
        Ok(())
    }

    async fn unrelate(&self, args: &UnrelateArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let response = relation_handlers::delete_issue_relation(
            &client,
            DeleteRelationArgs {
                relation_id: args.relation_id,
            },
        )
        .await?;

        let writer = global.writer();
        if writer.is_json() {
            return write_json(&response);
        }
        writer.write_success(&format!("Deleted relation {}", args.relation_id));
        Ok(())
    }
}
