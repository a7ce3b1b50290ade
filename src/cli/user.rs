//
//  redmine-cli
//  cli/user.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! User commands

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};

use crate::api::common::MAX_LIMIT;
use crate::api::metadata::{user_status, User};
use crate::output::{format_bool, TableRow};
use crate::tools::metadata::{self as handlers, ListUsersArgs};

use super::GlobalOptions;

/// List users
#[derive(Args, Debug)]
pub struct UserCommand {
    #[command(subcommand)]
    pub command: UserSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum UserSubcommand {
    /// List users (requires administrator rights)
    #[command(visible_alias = "ls")]
    List(ListArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Registered,
    Locked,
}

impl UserStatus {
    fn code(self) -> u8 {
        match self {
            UserStatus::Active => user_status::ACTIVE,
            UserStatus::Registered => user_status::REGISTERED,
            UserStatus::Locked => user_status::LOCKED,
        }
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Account status to list
    #[arg(long, short = 's', value_enum, default_value = "active")]
    pub status: UserStatus,

    /// Maximum number of users to list
    #[arg(long, short = 'l', default_value_t = MAX_LIMIT)]
    pub limit: u32,
}

impl TableRow for User {
    fn headers() -> &'static [&'static str] {
        &["ID", "LOGIN", "NAME", "EMAIL", "ADMIN"]
    }

    fn row(&self, color: bool) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.login.clone(),
            self.full_name(),
            self.mail.clone().unwrap_or_default(),
            format_bool(self.admin, color),
        ]
    }
}

impl UserCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            UserSubcommand::List(args) => {
                let client = global.client()?;
                let response = handlers::list_users(
                    &client,
                    ListUsersArgs {
                        status: args.status.code(),
                        limit: args.limit,
                    },
                )
                .await?;
                global.writer().write_list::<User>(&response, "users")
            }
        }
    }
}
