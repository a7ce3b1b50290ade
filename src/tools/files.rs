//
//  redmine-cli
//  tools/files.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! File upload and attachment download tools.

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{ApiError, RedmineClient};

/// Arguments for `upload_file`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadFileArgs {
    pub file_path: PathBuf,

    /// Name stored in Redmine; defaults to the file's base name.
    #[serde(default)]
    pub filename: Option<String>,
}

/// Uploads a file and returns `{"upload": {"token": ...}}`.
///
/// Pass the token in the `uploads` field of `create_issue` or `update_issue`
/// to attach the file.
pub async fn upload_file(client: &RedmineClient, args: UploadFileArgs) -> Result<Value, ApiError> {
    client
        .upload_file(&args.file_path, args.filename.as_deref())
        .await
}

/// Arguments for `download_attachment`.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadAttachmentArgs {
    /// The attachment's `content_url`, absolute or server-relative.
    pub url: String,

    pub save_path: PathBuf,
}

/// Downloads an attachment and returns `{"path": ..., "size": ...}`.
pub async fn download_attachment(
    client: &RedmineClient,
    args: DownloadAttachmentArgs,
) -> Result<Value, ApiError> {
    let size = client.download_file(&args.url, &args.save_path).await?;
    Ok(json!({
        "path": args.save_path.display().to_string(),
        "size": size,
    }))
}
