// src/infra/errors.rs — Error types for rollout-outreach

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutreachError {
    // Local validation (no request issued)
    #[error("{0}")]
    Validation(String),

    #[error("Look up the store before registering a send.")]
    MissingLookup,

    // Transport / status
    #[error("Backend answered with status {code}")]
    Status { code: u16 },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Could not decode backend response: {0}")]
    Decode(String),

    // Environment
    #[error("The browser blocked the messaging pop-up. Allow pop-ups for this tool and try again.")]
    PopupBlocked,

    #[error("Tab operation failed: {0}")]
    Tab(String),

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OutreachError {
    /// Errors raised before any request left the process.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            OutreachError::Validation(_) | OutreachError::MissingLookup | OutreachError::Io(_)
        )
    }
}
