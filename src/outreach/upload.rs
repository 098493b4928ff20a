// src/outreach/upload.rs — Assemble an upload from local files

use std::path::Path;

use crate::backend::{UploadFile, UploadRequest};
use crate::infra::errors::OutreachError;

pub const UPLOAD_OK: &str = "Upload complete!";
pub const UPLOAD_FAILED: &str = "Upload failed.";

/// Read a spreadsheet into memory, keeping its file name for the part header.
pub async fn read_upload_file(path: &Path) -> Result<UploadFile, OutreachError> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.xlsx".into());
    Ok(UploadFile { file_name, bytes })
}

/// Build an upload from optional paths. A missing file fails before any
/// request is made.
pub async fn upload_request(
    rollout: Option<&Path>,
    stores: Option<&Path>,
) -> Result<UploadRequest, OutreachError> {
    let rollout = match rollout {
        Some(p) => Some(read_upload_file(p).await?),
        None => None,
    };
    let stores = match stores {
        Some(p) => Some(read_upload_file(p).await?),
        None => None,
    };
    Ok(UploadRequest { rollout, stores })
}
