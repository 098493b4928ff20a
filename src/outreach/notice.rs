// src/outreach/notice.rs — Alert-style outcomes shown to the user

use std::fmt;

use crate::infra::errors::OutreachError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    /// Local mistakes and a refused pop-up are warnings the user can act
    /// on; backend and transport failures are errors.
    pub fn from_error(err: &OutreachError) -> Self {
        if err.is_local() || matches!(err, OutreachError::PopupBlocked) {
            Self::warning(err.to_string())
        } else {
            Self::error(err.to_string())
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NoticeKind::Info
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            NoticeKind::Info => "info",
            NoticeKind::Warning => "warn",
            NoticeKind::Error => "error",
        };
        write!(f, "[{tag}] {}", self.text)
    }
}
