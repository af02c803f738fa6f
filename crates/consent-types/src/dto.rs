//! Request and response DTOs for the account-access-consents resource.

use crate::{ConsentRecord, ConsentStatus, Permission};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Create-consent request body.
///
/// Every field is optional at the decoding layer so that missing values reach the
/// validator and are reported as business-rule violations rather than decode errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConsentCreateRequest {
    #[serde(default)]
    pub data: Option<ConsentCreateData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<serde_json::Value>,
    /// Body exactly as received, when decoded through [`ConsentCreateRequest::from_json_slice`].
    #[serde(skip)]
    pub raw: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConsentCreateData {
    #[serde(default)]
    pub expiration_date_time: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub permissions: Option<Vec<Permission>>,
}

impl ConsentCreateRequest {
    /// Decodes a request body and keeps the original text alongside the typed fields.
    /// JSON `null` decodes to `None`.
    pub fn from_json_slice(body: &[u8]) -> Result<Option<Self>, serde_json::Error> {
        let parsed: Option<Self> = serde_json::from_slice(body)?;
        Ok(parsed.map(|mut req| {
            req.raw = Some(String::from_utf8_lossy(body).into_owned());
            req
        }))
    }

    /// Text to keep as the audit snapshot: the received body if known, otherwise the
    /// re-encoded typed request.
    pub fn snapshot(&self) -> Result<String, serde_json::Error> {
        match &self.raw {
            Some(raw) => Ok(raw.clone()),
            None => serde_json::to_string(self),
        }
    }
}

/// Read-consent response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConsentResponse {
    pub data: ConsentResponseData,
}

/// Externally visible consent. Same fields as [`ConsentRecord`] minus the raw request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConsentResponseData {
    pub consent_id: String,
    pub status: ConsentStatus,
    pub creation_date_time: DateTime<FixedOffset>,
    pub status_update_date_time: DateTime<FixedOffset>,
    pub expiration_date_time: DateTime<FixedOffset>,
    pub permissions: Vec<Permission>,
}

impl From<&ConsentRecord> for ConsentResponseData {
    fn from(record: &ConsentRecord) -> Self {
        Self {
            consent_id: record.id.clone(),
            status: record.status,
            creation_date_time: record.creation_time,
            status_update_date_time: record.status_update_time,
            expiration_date_time: record.expiration_time,
            permissions: record.permissions.clone(),
        }
    }
}

impl From<&ConsentRecord> for ConsentResponse {
    fn from(record: &ConsentRecord) -> Self {
        Self {
            data: ConsentResponseData::from(record),
        }
    }
}
