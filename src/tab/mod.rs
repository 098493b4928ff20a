// src/tab/mod.rs — Reusable messaging tab
//
// The browser window model is a capability (`TabHost`); `TabSession` holds
// the reuse policy on top of it. Reuse needs a host that binds names; with
// an external URL opener every navigation is a fresh launch.

pub mod session;
pub mod system;

use crate::infra::errors::OutreachError;

pub use session::{Navigation, TabSession};
pub use system::SystemBrowser;

/// Opaque reference to an external tab.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TabRef {
    pub id: u64,
    pub name: String,
}

/// How a redirect treats the tab's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// Replace the current history entry.
    Replace,
    /// Push a new history entry.
    Push,
}

/// Browser tab capability.
pub trait TabHost: Send + Sync {
    /// Open `url` in the tab bound to `name`, creating the tab if needed.
    /// `None` means the browser refused (pop-up blocked).
    fn open_named(&self, url: &str, name: &str) -> Option<TabRef>;

    /// Look up a tab bound to `name` without creating one.
    fn find_named(&self, name: &str) -> Option<TabRef>;

    /// Whether the user closed the tab.
    fn is_closed(&self, tab: &TabRef) -> bool;

    fn redirect(&self, tab: &TabRef, url: &str, mode: NavigationMode)
        -> Result<(), OutreachError>;

    fn focus(&self, tab: &TabRef) -> Result<(), OutreachError>;

    /// Whether a tab opened under a name can be found, redirected and
    /// focused afterwards. Hosts that only hand URLs off (a desktop opener)
    /// return `false`; each navigation then opens the deep link once.
    fn binds_names(&self) -> bool {
        true
    }
}

/// Strip everything but ASCII digits.
pub fn phone_digits(recipient: &str) -> String {
    recipient.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// `https://<host>/send?phone=<digits>&text=<message>`; `phone=` is dropped
/// when the recipient has no digits.
pub fn deep_link(host: &str, recipient: &str, message: &str) -> String {
    let digits = phone_digits(recipient);
    let phone = if digits.is_empty() {
        String::new()
    } else {
        format!("phone={digits}&")
    };
    format!(
        "https://{host}/send?{phone}text={}",
        urlencoding::encode(message)
    )
}
