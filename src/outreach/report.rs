// src/outreach/report.rs — Send-log report download target

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::infra::errors::OutreachError;

/// `relatorio_envios-YYYYMMDD-HHMMSS.xlsx`
pub fn default_report_name(now: DateTime<Local>) -> String {
    format!("relatorio_envios-{}.xlsx", now.format("%Y%m%d-%H%M%S"))
}

/// Write report bytes to `dest`, or to a timestamped file in the working
/// directory. Returns the path written.
pub async fn save_report(bytes: &[u8], dest: Option<&Path>) -> Result<PathBuf, OutreachError> {
    let path = match dest {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(default_report_name(Local::now())),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}
