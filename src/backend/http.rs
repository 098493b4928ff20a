// src/backend/http.rs — reqwest client for the rollout backend

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::types::{Ack, LogPayload, LookupResponse, UploadFile, UploadRequest};
use super::RolloutBackend;
use crate::infra::config::BackendConfig;
use crate::infra::errors::OutreachError;

/// Talks to the backend over HTTP.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, OutreachError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn lookup_url(&self, number: &str) -> String {
        format!("{}?numero={}", self.url("/buscar"), urlencoding::encode(number))
    }
}

fn file_part(file: UploadFile) -> Part {
    Part::bytes(file.bytes).file_name(file.file_name)
}

/// Build the `/upload` form. Absent files are left out entirely.
pub(crate) fn upload_form(request: UploadRequest) -> Form {
    let mut form = Form::new();
    if let Some(f) = request.rollout {
        form = form.part("rollout", file_part(f));
    }
    if let Some(f) = request.stores {
        form = form.part("lojas", file_part(f));
    }
    form
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, OutreachError> {
    let body = resp.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| OutreachError::Decode(e.to_string()))
}

fn ensure_success(resp: &Response) -> Result<(), OutreachError> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(OutreachError::Status {
            code: status.as_u16(),
        })
    }
}

#[async_trait]
impl RolloutBackend for HttpBackend {
    async fn upload(&self, request: UploadRequest) -> Result<Ack, OutreachError> {
        if request.is_empty() {
            tracing::info!("no spreadsheets selected; sending an empty upload");
        }
        tracing::debug!(
            rollout = request.rollout.is_some(),
            stores = request.stores.is_some(),
            "POST /upload"
        );
        let resp = self
            .client
            .post(self.url("/upload"))
            .multipart(upload_form(request))
            .send()
            .await?;
        decode(resp).await
    }

    async fn lookup(&self, number: &str) -> Result<LookupResponse, OutreachError> {
        tracing::debug!(number, "GET /buscar");
        let resp = self.client.get(self.lookup_url(number)).send().await?;
        ensure_success(&resp)?;
        decode(resp).await
    }

    async fn log_send(&self, payload: &LogPayload) -> Result<Ack, OutreachError> {
        tracing::debug!(number = %payload.number, "POST /log");
        let resp = self
            .client
            .post(self.url("/log"))
            .json(payload)
            .send()
            .await?;
        decode(resp).await
    }

    async fn report(&self) -> Result<Vec<u8>, OutreachError> {
        tracing::debug!("GET /relatorio.xlsx");
        let resp = self.client.get(self.url("/relatorio.xlsx")).send().await?;
        ensure_success(&resp)?;
        Ok(resp.bytes().await?.to_vec())
    }
}
