// src/outreach/mod.rs — Upload, lookup, contact and log flows

pub mod lookup;
pub mod notice;
pub mod report;
pub mod session;
pub mod upload;

pub use lookup::{pad_store_number, ContactAction, LookupOutcome, LookupView};
pub use notice::{Notice, NoticeKind};
pub use session::OutreachSession;
