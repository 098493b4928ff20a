// src/tab/system.rs — TabHost backed by the platform URL opener
//
// The opener gives no window back, so nothing opened through it can be found,
// redirected or focused later. Each call launches one URL; `TabSession` skips
// the reuse tiers for this host.

use std::sync::atomic::{AtomicU64, Ordering};

use super::{NavigationMode, TabHost, TabRef};
use crate::infra::errors::OutreachError;

#[derive(Default)]
pub struct SystemBrowser {
    launches: AtomicU64,
}

impl SystemBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// URLs handed to the opener so far.
    pub fn launches(&self) -> u64 {
        self.launches.load(Ordering::Relaxed)
    }
}

/// Hand a URL to the platform opener.
fn launch(url: &str) -> std::io::Result<()> {
    let result;
    #[cfg(target_os = "macos")]
    {
        result = std::process::Command::new("open").arg(url).spawn();
    }
    #[cfg(target_os = "linux")]
    {
        result = std::process::Command::new("xdg-open").arg(url).spawn();
    }
    #[cfg(target_os = "windows")]
    {
        result = std::process::Command::new("cmd")
            .args(["/C", "start", "", url])
            .spawn();
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        result = Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "unsupported platform",
        ));
    }
    result.map(|_| ())
}

impl TabHost for SystemBrowser {
    fn open_named(&self, url: &str, name: &str) -> Option<TabRef> {
        if let Err(e) = launch(url) {
            tracing::warn!("could not open browser: {e}");
            return None;
        }
        let id = self.launches.fetch_add(1, Ordering::Relaxed) + 1;
        Some(TabRef {
            id,
            name: name.to_string(),
        })
    }

    fn find_named(&self, _name: &str) -> Option<TabRef> {
        None
    }

    fn is_closed(&self, _tab: &TabRef) -> bool {
        true
    }

    fn redirect(
        &self,
        tab: &TabRef,
        _url: &str,
        _mode: NavigationMode,
    ) -> Result<(), OutreachError> {
        Err(OutreachError::Tab(format!(
            "tab '{}' cannot be addressed through the system opener",
            tab.name
        )))
    }

    fn focus(&self, _tab: &TabRef) -> Result<(), OutreachError> {
        Ok(())
    }

    fn binds_names(&self) -> bool {
        false
    }
}
