// src/outreach/lookup.rs — Store lookup: input normalisation and response handling

use crate::backend::{LogPayload, LookupResponse};
use crate::infra::errors::OutreachError;

/// Minimum width of a store number on the wire.
pub const STORE_NUMBER_WIDTH: usize = 3;

/// State of the contact action control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContactAction {
    #[default]
    Disabled,
    Enabled { recipient: String, message: String },
}

impl ContactAction {
    pub fn is_enabled(&self) -> bool {
        matches!(self, ContactAction::Enabled { .. })
    }
}

/// What the user sees after a lookup: the inline status line, the prepared
/// message and the contact control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupView {
    pub status: String,
    pub message: String,
    pub action: ContactAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Pending store with a recipient and a message; contact is enabled.
    Actionable,
    /// Store is fully rolled out; contact stays disabled.
    Complete,
    /// Pending work, but no recipient or no message to send.
    NoContactPath,
    /// Backend answered `ok: false`.
    Rejected,
    /// Status, transport or decode failure.
    Failed,
}

/// Trim and left-pad with zeros to [`STORE_NUMBER_WIDTH`] (`"73"` -> `"073"`).
pub fn pad_store_number(raw: &str) -> Result<String, OutreachError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(OutreachError::Validation("Enter the store number.".into()));
    }
    Ok(format!("{trimmed:0>width$}", width = STORE_NUMBER_WIDTH))
}

/// Status line for a failed lookup.
pub fn failure_status(err: &OutreachError) -> String {
    match err {
        OutreachError::Status { code } => format!("Error {code} while looking up the store."),
        other => format!("Lookup failed: {other}"),
    }
}

/// Turn a decoded response into what the user sees, plus the payload to log.
pub fn interpret(
    number: &str,
    response: LookupResponse,
) -> (LookupView, Option<LogPayload>, LookupOutcome) {
    if response.is_rejected() {
        let view = match response.error.filter(|e| !e.is_empty()) {
            Some(error) => LookupView {
                message: format!("*** {error} ***"),
                status: error,
                action: ContactAction::Disabled,
            },
            None => LookupView {
                status: "Could not fetch the store.".into(),
                ..LookupView::default()
            },
        };
        return (view, None, LookupOutcome::Rejected);
    }

    let complete = response.is_complete();
    let message = response.message.unwrap_or_default();
    let recipient = response.recipient.unwrap_or_default();
    let first = response
        .rows
        .and_then(|rows| rows.into_iter().next())
        .unwrap_or_default();

    let payload = LogPayload {
        number: first.number.unwrap_or_else(|| number.to_string()),
        store_name: first.name.unwrap_or_default(),
        region: first.region.unwrap_or_default(),
        recipient: recipient.clone(),
        message: message.clone(),
    };

    let mut view = LookupView {
        status: String::new(),
        message: message.clone(),
        action: ContactAction::Disabled,
    };

    let outcome = if complete {
        view.status = format!("Store {number} is 100% complete; no contact needed.");
        LookupOutcome::Complete
    } else {
        view.status = "Pending items found. Contact the store to open the messaging tab.".into();
        if !recipient.is_empty() && !message.is_empty() {
            view.action = ContactAction::Enabled { recipient, message };
            LookupOutcome::Actionable
        } else {
            LookupOutcome::NoContactPath
        }
    };

    (view, Some(payload), outcome)
}
