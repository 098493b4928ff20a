// src/cli/render.rs — Terminal output
//
// Notices and status go to stderr; the prepared message goes to stdout so it
// can be piped.

use crate::outreach::{LookupView, Notice};
use crate::tab::Navigation;

pub fn notice(n: &Notice) {
    eprintln!("{n}");
}

pub fn view(v: &LookupView) {
    if !v.status.is_empty() {
        eprintln!("[status] {}", v.status);
    }
    if !v.message.is_empty() {
        println!("{}", v.message);
    }
    eprintln!(
        "[contact] {}",
        if v.action.is_enabled() {
            "enabled"
        } else {
            "disabled"
        }
    );
}

pub fn navigation(nav: Navigation) {
    let text = match nav {
        Navigation::Reused => "messaging tab updated",
        Navigation::Reattached => "re-attached to messaging tab",
        Navigation::Opened => "opening messaging tab",
        Navigation::Launched => "messaging link sent to the browser",
    };
    eprintln!("[info] {text}");
}
