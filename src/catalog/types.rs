//! Airtable record shapes and the flattened [`CatalogRecord`] handed to callers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const FIELD_CODE: &str = "Code";
pub const FIELD_FILENAME: &str = "Filename";
pub const FIELD_DESCRIPTION: &str = "Description";
pub const FIELD_TYPE: &str = "Type";
pub const FIELD_ATTACHMENT: &str = "Attachment";

/// Record as returned by the Airtable REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub id: String,
    #[serde(rename = "createdTime", default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub fields: RawFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFields {
    /// Server-computed display code; a formula field, so it may be text or a number.
    #[serde(rename = "Code", default)]
    pub code: Option<Value>,
    #[serde(rename = "Filename", default)]
    pub filename: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "Type", default)]
    pub content_type: Option<String>,
    #[serde(rename = "Attachment", default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPage {
    #[serde(default)]
    pub records: Vec<RawRecord>,
    #[serde(default)]
    pub offset: Option<String>,
}

/// A catalog entry with its short code resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogRecord {
    pub id: String,
    pub code: Option<String>,
    pub filename: Option<String>,
    pub description: Option<String>,
    pub content_type: Option<String>,
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
}

impl From<RawRecord> for CatalogRecord {
    fn from(raw: RawRecord) -> Self {
        let code = raw.fields.code.and_then(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
        Self {
            id: raw.id,
            code,
            filename: raw.fields.filename,
            description: raw.fields.description,
            content_type: raw.fields.content_type,
            attachments: raw.fields.attachments,
            created_time: raw.created_time,
        }
    }
}

/// Fields for a new record.
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub filename: String,
    pub description: String,
    pub content_type: String,
    /// Remote file Airtable should copy into the attachment field.
    pub attachment_url: Option<String>,
}

/// Identifiers of a freshly created record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedRecord {
    pub record_id: String,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub filter_formula: Option<String>,
    pub page_size: Option<u32>,
    pub offset: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordPage {
    pub records: Vec<CatalogRecord>,
    pub offset: Option<String>,
}
