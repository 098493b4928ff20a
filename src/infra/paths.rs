// src/infra/paths.rs — Config location
//
// OUTREACH_HOME overrides everything. Otherwise config lives in
// ~/.rollout-outreach/.

use std::path::PathBuf;

/// Returns the OUTREACH_HOME override, if set.
fn outreach_home() -> Option<PathBuf> {
    std::env::var_os("OUTREACH_HOME").map(PathBuf::from)
}

/// Configuration directory: $OUTREACH_HOME/ or ~/.rollout-outreach/
pub fn config_dir() -> PathBuf {
    if let Some(home) = outreach_home() {
        return home;
    }
    dirs_home().join(".rollout-outreach")
}

/// Home directory, or the working directory when no home can be determined.
pub fn dirs_home() -> PathBuf {
    directories::BaseDirs::new()
        .map(|b| b.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
