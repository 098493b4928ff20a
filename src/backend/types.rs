// src/backend/types.rs — Wire types for the rollout backend
//
// Field names on the wire are the backend's (Portuguese); Rust names are ours.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// `{ "ok": bool }` acknowledgement returned by `/upload` and `/log`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

/// Decoded body of `GET /buscar`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub ok: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, rename = "mensagem")]
    pub message: Option<String>,
    #[serde(default, rename = "concluida")]
    pub complete: Option<bool>,
    #[serde(default, rename = "destinatario")]
    pub recipient: Option<String>,
    #[serde(default, rename = "dados")]
    pub rows: Option<Vec<StoreRow>>,
}

impl LookupResponse {
    /// Only an explicit `ok: false` counts as a rejection.
    pub fn is_rejected(&self) -> bool {
        self.ok == Some(false)
    }

    pub fn is_complete(&self) -> bool {
        self.complete.unwrap_or(false)
    }
}

/// One rollout row of a store. The backend sends many more columns; only
/// the identifying ones are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StoreRow {
    #[serde(default, rename = "loja_numero", deserialize_with = "lenient_text")]
    pub number: Option<String>,
    #[serde(default, rename = "loja_nome", deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, rename = "regional", deserialize_with = "lenient_text")]
    pub region: Option<String>,
}

/// Record of one outreach, posted to `/log`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogPayload {
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "loja_nome")]
    pub store_name: String,
    #[serde(rename = "regional")]
    pub region: String,
    #[serde(rename = "destinatario")]
    pub recipient: String,
    #[serde(rename = "mensagem")]
    pub message: String,
}

/// A file queued for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Multipart submission to `/upload`. Both parts are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadRequest {
    /// Sent as the `rollout` part.
    pub rollout: Option<UploadFile>,
    /// Sent as the `lojas` part.
    pub stores: Option<UploadFile>,
}

impl UploadRequest {
    pub fn is_empty(&self) -> bool {
        self.rollout.is_none() && self.stores.is_none()
    }
}

// Spreadsheet-backed JSON: numbers may arrive as `73` or `73.0`, and empty
// cells as `null`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(number_text(&n)),
        Some(other) => Some(other.to_string()),
    })
}

fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}
