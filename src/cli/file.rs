//
//  redmine-cli
//  cli/file.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! File transfer commands
//!
//! `upload` prints the token to pass to `issue create --upload` or
//! `issue edit --upload`; `download` saves an attachment's `content_url`.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;

use crate::output::write_json;
use crate::tools::files::{self as handlers, DownloadAttachmentArgs, UploadFileArgs};

use super::GlobalOptions;

/// Upload files and download attachments
#[derive(Args, Debug)]
pub struct FileCommand {
    #[command(subcommand)]
    pub command: FileSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum FileSubcommand {
    /// Upload a file and print its token
    Upload(UploadArgs),

    /// Download an attachment
    Download(DownloadArgs),
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Local file to upload
    pub path: PathBuf,

    /// Name to store in Redmine (defaults to the file name)
    #[arg(long, short = 'n')]
    pub filename: Option<String>,
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Attachment URL, absolute or relative to the Redmine URL
    #[arg(value_name = "URL")]
    pub attachment_url: String,

    /// Where to save the file
    #[arg(long, short = 'o')]
    pub output: PathBuf,
}

impl FileCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            FileSubcommand::Upload(args) => self.upload(args, global).await,
            FileSubcommand::Download(args) => self.download(args, global).await,
        }
    }

    async fn upload(&self, args: &UploadArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let response = handlers::upload_file(
            &client,
            UploadFileArgs {
                file_path: args.path.clone(),
                filename: args.filename.clone(),
            },
        )
        .await?;

        let writer = global.writer();
        if writer.is_json() {
            return write_json(&response);
        }

        let token = response["upload"]["token"].as_str().unwrap_or_default();
        writer.write_success(&format!("Uploaded {}", args.path.display()));
        println!("Token: {}", style(token).cyan().bold());
        writer.write_info(&format!(
            "Attach it with: redmine issue edit <ID> --upload {}",
            token
        ));
        Ok(())
    }

    async fn download(&self, args: &DownloadArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let response = handlers::download_attachment(
            &client,
            DownloadAttachmentArgs {
                url: args.attachment_url.clone(),
                save_path: args.output.clone(),
            },
        )
        .await?;

        let writer = global.writer();
        if writer.is_json() {
            return write_json(&response);
        }
        writer.write_success(&format!(
            "Saved {} ({} bytes)",
            args.output.display(),
            response["size"]
        ));
        Ok(())
    }
}
