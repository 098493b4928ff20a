// src/backend/mod.rs — Rollout backend abstraction

pub mod http;
pub mod types;

use async_trait::async_trait;

use crate::infra::errors::OutreachError;
pub use http::HttpBackend;
pub use types::{Ack, LogPayload, LookupResponse, StoreRow, UploadFile, UploadRequest};

/// The HTTP surface of the rollout backend.
///
/// Every call is a single request with no retry. Implementations report a
/// non-2xx lookup as [`OutreachError::Status`] and an unparseable body as
/// [`OutreachError::Decode`].
#[async_trait]
pub trait RolloutBackend: Send + Sync {
    /// `POST /upload` (multipart, parts `rollout` and `lojas`).
    async fn upload(&self, request: UploadRequest) -> Result<Ack, OutreachError>;

    /// `GET /buscar?numero=<number>`. `number` is sent as given.
    async fn lookup(&self, number: &str) -> Result<LookupResponse, OutreachError>;

    /// `POST /log` with the payload as JSON.
    async fn log_send(&self, payload: &LogPayload) -> Result<Ack, OutreachError>;

    /// `GET /relatorio.xlsx`.
    async fn report(&self) -> Result<Vec<u8>, OutreachError>;
}
