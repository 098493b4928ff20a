// src/outreach/session.rs — One outreach session: flows plus the state they share
//
// The session owns the messaging tab and the last lookup. Nothing outlives
// it; a fresh session starts with no payload and no tab handle.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::lookup::{self, ContactAction, LookupOutcome, LookupView};
use super::notice::Notice;
use super::report;
use super::upload::{UPLOAD_FAILED, UPLOAD_OK};
use crate::backend::{LogPayload, RolloutBackend, UploadRequest};
use crate::infra::errors::OutreachError;
use crate::tab::{Navigation, TabSession};

pub const LOG_OK: &str = "Send registered!";
pub const LOG_FAILED: &str = "Failed to register send.";

pub struct OutreachSession {
    backend: Arc<dyn RolloutBackend>,
    tabs: TabSession,
    view: LookupView,
    payload: Option<LogPayload>,
}

impl OutreachSession {
    pub fn new(backend: Arc<dyn RolloutBackend>, tabs: TabSession) -> Self {
        Self {
            backend,
            tabs,
            view: LookupView::default(),
            payload: None,
        }
    }

    pub fn view(&self) -> &LookupView {
        &self.view
    }

    /// Payload of the last successful lookup, if any.
    pub fn payload(&self) -> Option<&LogPayload> {
        self.payload.as_ref()
    }

    pub fn tabs(&self) -> &TabSession {
        &self.tabs
    }

    pub fn tabs_mut(&mut self) -> &mut TabSession {
        &mut self.tabs
    }

    /// Submit the spreadsheets. On success the session starts over.
    pub async fn upload(&mut self, request: UploadRequest) -> Notice {
        match self.backend.upload(request).await {
            Ok(ack) if ack.ok => {
                tracing::info!("upload accepted");
                self.reset();
                Notice::info(UPLOAD_OK)
            }
            Ok(_) => {
                tracing::info!("upload rejected by backend");
                Notice::error(UPLOAD_FAILED)
            }
            Err(e) => {
                tracing::warn!("upload failed: {e}");
                Notice::error(UPLOAD_FAILED)
            }
        }
    }

    /// Look a store up and refresh the view.
    ///
    /// Only a blank input is an `Err`; every backend outcome lands in
    /// [`view`](Self::view).
    pub async fn lookup(&mut self, raw: &str) -> Result<LookupOutcome, OutreachError> {
        let number = lookup::pad_store_number(raw)?;

        // Nothing from the previous lookup may survive a failure of this one.
        self.view = LookupView::default();
        self.payload = None;

        let response = match self.backend.lookup(&number).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(number = %number, "lookup failed: {e}");
                self.view.status = lookup::failure_status(&e);
                return Ok(LookupOutcome::Failed);
            }
        };

        let (view, payload, outcome) = lookup::interpret(&number, response);
        tracing::info!(number = %number, ?outcome, "lookup finished");
        self.view = view;
        self.payload = payload;
        Ok(outcome)
    }

    /// Activate the contact control: open or reuse the messaging tab on the
    /// prepared message.
    pub fn contact(&mut self) -> Result<Navigation, OutreachError> {
        let ContactAction::Enabled { recipient, message } = &self.view.action else {
            return Err(OutreachError::Validation(
                "Nothing to send: look up a pending store with a contact number first.".into(),
            ));
        };
        self.tabs.navigate_to(recipient, message)
    }

    /// Register that the message for the last lookup was sent.
    pub async fn log_send(&self) -> Result<Notice, OutreachError> {
        let Some(payload) = self.payload.as_ref() else {
            return Err(OutreachError::MissingLookup);
        };
        match self.backend.log_send(payload).await {
            Ok(ack) if ack.ok => {
                tracing::info!(number = %payload.number, "send registered");
                Ok(Notice::info(LOG_OK))
            }
            Ok(_) => Ok(Notice::error(LOG_FAILED)),
            Err(e) => {
                tracing::warn!("log failed: {e}");
                Ok(Notice::error(LOG_FAILED))
            }
        }
    }

    /// Download the send-log report and save it locally.
    pub async fn download_report(&self, dest: Option<&Path>) -> Result<PathBuf, OutreachError> {
        let bytes = self.backend.report().await?;
        let path = report::save_report(&bytes, dest).await?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "report saved");
        Ok(path)
    }

    /// Start over: clear the view and payload and let go of the tab handle.
    /// The named tab stays open and is re-attached on the next contact.
    pub fn reset(&mut self) {
        self.view = LookupView::default();
        self.payload = None;
        self.tabs.forget();
    }
}
