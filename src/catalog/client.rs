use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, Response, Url};
use serde_json::{Map, Value, json};
use tracing::warn;

use super::error::CatalogError;
use super::types::{
    CatalogRecord, CreatedRecord, FIELD_ATTACHMENT, FIELD_CODE, FIELD_DESCRIPTION, FIELD_FILENAME,
    FIELD_TYPE, ListQuery, NewAsset, RawPage, RawRecord, RecordPage,
};
use crate::config::CatalogConfig;

pub const API_URL: &str = "https://api.airtable.com/v0";
pub const CONTENT_URL: &str = "https://content.airtable.com/v0";

/// Airtable's maximum page size for list requests.
pub const MAX_PAGE_SIZE: u32 = 100;

/// REST client for the asset table.
#[derive(Clone)]
pub struct AirtableClient {
    client: Client,
    api_key: String,
    base_id: String,
    table: String,
    api_url: String,
    content_url: String,
}

impl AirtableClient {
    /// `None` when the catalog credentials are not configured.
    pub fn from_config(client: Client, config: &CatalogConfig) -> Option<Self> {
        if !config.is_configured() {
            return None;
        }
        Some(Self {
            client,
            api_key: config.api_key.clone(),
            base_id: config.base_id.clone(),
            table: config.table_name.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            content_url: config.content_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, root: &str, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = Url::parse(root).map_err(|e| CatalogError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| CatalogError::InvalidUrl(root.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn table_url(&self) -> Result<Url, CatalogError> {
        self.url(&self.api_url, &[&self.base_id, &self.table])
    }

    /// Create a record and read back its server-computed short code.
    pub async fn create_record(&self, asset: &NewAsset) -> Result<CreatedRecord, CatalogError> {
        let mut fields = Map::new();
        fields.insert(FIELD_FILENAME.into(), json!(asset.filename));
        fields.insert(FIELD_DESCRIPTION.into(), json!(asset.description));
        fields.insert(FIELD_TYPE.into(), json!(asset.content_type));
        if let Some(url) = &asset.attachment_url {
            fields.insert(
                FIELD_ATTACHMENT.into(),
                json!([{ "url": url, "filename": asset.filename }]),
            );
        }

        let response = self
            .client
            .post(self.table_url()?)
            .bearer_auth(&self.api_key)
            .json(&json!({ "fields": fields, "typecast": true }))
            .send()
            .await?;
        let raw: RawRecord = check(response).await?.json().await?;
        let record = CatalogRecord::from(raw);

        Ok(CreatedRecord {
            record_id: record.id,
            code: record.code,
        })
    }

    /// One page of records, optionally filtered by an Airtable formula.
    pub async fn list_records(&self, query: &ListQuery) -> Result<RecordPage, CatalogError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(formula) = &query.filter_formula {
            params.push(("filterByFormula", formula.clone()));
        }
        if let Some(size) = query.page_size {
            params.push(("pageSize", size.clamp(1, MAX_PAGE_SIZE).to_string()));
        }
        if let Some(offset) = &query.offset {
            params.push(("offset", offset.clone()));
        }

        let response = self
            .client
            .get(self.table_url()?)
            .bearer_auth(&self.api_key)
            .query(&params)
            .send()
            .await?;
        let page: RawPage = check(response).await?.json().await?;

        Ok(RecordPage {
            records: page.records.into_iter().map(CatalogRecord::from).collect(),
            offset: page.offset,
        })
    }

    /// Look a record up by its short code (e.g. `A42`).
    pub async fn find_by_code(&self, code: &str) -> Result<Option<CatalogRecord>, CatalogError> {
        let query = ListQuery {
            filter_formula: Some(code_formula(code)),
            page_size: Some(1),
            offset: None,
        };
        let page = self.list_records(&query).await?;
        Ok(page.records.into_iter().next())
    }

    /// Upload file bytes into the record's attachment field.
    /// Returns `false` when Airtable refuses the upload.
    pub async fn upload_attachment(
        &self,
        record_id: &str,
        bytes: &[u8],
        filename: &str,
        content_type: &str,
    ) -> Result<bool, CatalogError> {
        let url = self.url(
            &self.content_url,
            &[&self.base_id, record_id, FIELD_ATTACHMENT, "uploadAttachment"],
        )?;
        let body = json!({
            "contentType": content_type,
            "file": STANDARD.encode(bytes),
            "filename": filename,
        });

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(record_id, status = status.as_u16(), %body, "attachment upload refused");
        Ok(false)
    }
}

/// `{Code}='A42'`, with single quotes escaped.
pub fn code_formula(code: &str) -> String {
    format!("{{{FIELD_CODE}}}='{}'", code.trim().replace('\'', "\\'"))
}

async fn check(response: Response) -> Result<Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .await
        .ok()
        .and_then(|text| error_message(&text).or(Some(text)))
        .unwrap_or_else(|| "unknown error".to_string());
    Err(CatalogError::Rejected {
        status: status.as_u16(),
        message,
    })
}

/// Airtable errors look like `{"error": {"type": .., "message": ..}}` or `{"error": "TYPE"}`.
fn error_message(text: &str) -> Option<String> {
    let value: Value = serde_json::from_str(text).ok()?;
    match value.get("error")? {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => {
            let kind = obj.get("type").and_then(Value::as_str).unwrap_or("ERROR");
            match obj.get("message").and_then(Value::as_str) {
                Some(msg) => Some(format!("{kind}: {msg}")),
                None => Some(kind.to_string()),
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(server: &MockServer) -> AirtableClient {
        let config = CatalogConfig {
            api_key: "pat-test".into(),
            base_id: "appBase".into(),
            table_name: "Media Assets".into(),
            api_url: format!("{}/v0", server.uri()),
            content_url: format!("{}/content/v0", server.uri()),
        };
        AirtableClient::from_config(Client::new(), &config).unwrap()
    }

    #[test]
    fn unconfigured_catalog_yields_no_client() {
        assert!(AirtableClient::from_config(Client::new(), &CatalogConfig::default()).is_none());
    }

    #[test]
    fn formula_escapes_quotes() {
        assert_eq!(code_formula("A42"), "{Code}='A42'");
        assert_eq!(code_formula(" x'y "), "{Code}='x\\'y'");
    }

    #[test]
    fn error_message_shapes() {
        assert_eq!(
            error_message(r#"{"error":{"type":"INVALID_REQUEST","message":"bad field"}}"#),
            Some("INVALID_REQUEST: bad field".to_string())
        );
        assert_eq!(
            error_message(r#"{"error":"NOT_FOUND"}"#),
            Some("NOT_FOUND".to_string())
        );
        assert_eq!(error_message("plain"), None);
    }

    #[tokio::test]
    async fn create_record_reads_back_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v0/appBase/Media%20Assets"))
            .and(header("authorization", "Bearer pat-test"))
            .and(body_partial_json(json!({
                "typecast": true,
                "fields": {
                    "Filename": "cube.png",
                    "Type": "image",
                    "Attachment": [{"url": "https://cdn/cube.png"}]
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "recABC",
                "createdTime": "2026-01-01T00:00:00.000Z",
                "fields": {"Code": "A42", "Filename": "cube.png"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let created = client(&server)
            .create_record(&NewAsset {
                filename: "cube.png".into(),
                description: "a red cube".into(),
                content_type: "image".into(),
                attachment_url: Some("https://cdn/cube.png".into()),
            })
            .await
            .unwrap();

        assert_eq!(created.record_id, "recABC");
        assert_eq!(created.code.as_deref(), Some("A42"));
    }

    #[tokio::test]
    async fn list_records_passes_paging_and_returns_offset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/appBase/Media%20Assets"))
            .and(query_param("pageSize", "100"))
            .and(query_param("offset", "itr1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "records": [
                    {"id": "rec1", "fields": {"Code": "A1", "Filename": "a.mp3", "Type": "audio"}},
                    {"id": "rec2", "fields": {"Code": "A2", "Filename": "b.png", "Type": "image"}}
                ],
                "offset": "itr2"
            })))
            .mount(&server)
            .await;

        let page = client(&server)
            .list_records(&ListQuery {
                filter_formula: None,
                page_size: Some(500),
                offset: Some("itr1".into()),
            })
            .await
            .unwrap();

        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[1].code.as_deref(), Some("A2"));
        assert_eq!(page.offset.as_deref(), Some("itr2"));
    }

    #[tokio::test]
    async fn find_by_code_filters_on_code_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/appBase/Media%20Assets"))
            .and(query_param("filterByFormula", "{Code}='A7'"))
            .and(query_param("pageSize", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": []})))
            .mount(&server)
            .await;

        let found = client(&server).find_by_code("A7").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn upload_attachment_sends_base64() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/content/v0/appBase/recABC/Attachment/uploadAttachment"))
            .and(body_partial_json(json!({
                "contentType": "audio/mpeg",
                "file": "aGVsbG8=",
                "filename": "song.mp3"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "recABC"})))
            .mount(&server)
            .await;

        let ok = client(&server)
            .upload_attachment("recABC", b"hello", "song.mp3", "audio/mpeg")
            .await
            .unwrap();
        assert!(ok);
    }

    #[tokio::test]
    async fn refused_upload_is_false_not_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(413).set_body_string("too large"))
            .mount(&server)
            .await;

        let ok = client(&server)
            .upload_attachment("recABC", b"x", "x.bin", "application/octet-stream")
            .await
            .unwrap();
        assert!(!ok);
    }

    #[tokio::test]
    async fn rejection_carries_airtable_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"type": "AUTHENTICATION_REQUIRED", "message": "Authentication required"}
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .list_records(&ListQuery::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Airtable returned status 401: AUTHENTICATION_REQUIRED: Authentication required"
        );
    }
}
