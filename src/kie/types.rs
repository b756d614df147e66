//! Wire types for the kie.ai generation API.
//!
//! Every endpoint answers with the same [`Envelope`]; the provider-specific
//! record lives in `data`. Field names follow the API's camelCase.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Success code carried in [`Envelope::code`].
pub const CODE_OK: i64 = 200;

/// Response wrapper shared by every kie.ai endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl Envelope {
    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }

    pub fn message(&self) -> &str {
        self.msg.as_deref().unwrap_or("")
    }

    /// Decode `data` into a provider record. `None` when absent or malformed.
    pub fn record<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        self.data
            .as_ref()
            .and_then(|data| serde_json::from_value(data.clone()).ok())
    }
}

/// `data` of a successful submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreated {
    pub task_id: String,
}

/// Body for `POST /api/v1/jobs/createTask`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTaskRequest {
    pub model: String,
    pub input: Value,
}

/// `data` of `GET /api/v1/jobs/recordInfo`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    #[serde(default)]
    pub state: Option<String>,
    /// JSON document encoded as a string; see [`JobResult`].
    #[serde(default)]
    pub result_json: Option<String>,
    #[serde(default)]
    pub fail_msg: Option<String>,
    #[serde(default)]
    pub fail_code: Option<Value>,
}

/// Decoded content of [`JobRecord::result_json`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResult {
    #[serde(default)]
    pub result_urls: Vec<String>,
}

/// Body for `POST /api/v1/veo/generate`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VeoGenerateRequest {
    pub prompt: String,
    pub model: String,
    pub aspect_ratio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seeds: Option<u64>,
    pub enable_translation: bool,
}

/// `data` of `GET /api/v1/veo/record-info`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VeoRecord {
    #[serde(default)]
    pub success_flag: Option<i64>,
    #[serde(default)]
    pub response: Option<VeoResponse>,
    #[serde(default)]
    pub error_code: Option<Value>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VeoResponse {
    #[serde(default)]
    pub result_urls: Option<Vec<String>>,
}

/// Body for `POST /api/v1/generate`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SunoGenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub custom_mode: bool,
    pub instrumental: bool,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_back_url: Option<String>,
}

/// `data` of `GET /api/v1/generate/record-info`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SunoRecord {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub response: Option<SunoResponse>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SunoResponse {
    #[serde(default)]
    pub suno_data: Vec<SunoTrack>,
}

/// One generated song.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SunoTrack {
    #[serde(default)]
    pub id: String,
    pub audio_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_tolerates_null_msg_and_data() {
        let env: Envelope = serde_json::from_str(r#"{"code":200,"msg":null,"data":null}"#).unwrap();
        assert!(env.is_ok());
        assert_eq!(env.message(), "");
        assert!(env.data.is_none());
    }

    #[test]
    fn job_record_reads_camel_case() {
        let env: Envelope = serde_json::from_value(json!({
            "code": 200,
            "msg": "success",
            "data": {
                "taskId": "t1",
                "state": "success",
                "resultJson": "{\"resultUrls\":[\"https://cdn/x.png\"]}"
            }
        }))
        .unwrap();
        let record: JobRecord = env.record().unwrap();
        assert_eq!(record.state.as_deref(), Some("success"));
        let raw = record.result_json.as_deref().unwrap();
        let result: JobResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.result_urls, vec!["https://cdn/x.png"]);
    }

    #[test]
    fn veo_request_omits_absent_fields() {
        let req = VeoGenerateRequest {
            prompt: "waves".into(),
            model: "veo3_fast".into(),
            aspect_ratio: "16:9".into(),
            image_urls: None,
            seeds: None,
            enable_translation: true,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["aspectRatio"], "16:9");
        assert_eq!(json["enableTranslation"], true);
        assert!(json.get("imageUrls").is_none());
        assert!(json.get("seeds").is_none());
    }

    #[test]
    fn suno_request_uses_api_field_names() {
        let req = SunoGenerateRequest {
            prompt: None,
            style: Some("lofi".into()),
            title: Some("Rain".into()),
            custom_mode: true,
            instrumental: true,
            model: "V4_5".into(),
            call_back_url: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["customMode"], true);
        assert_eq!(json["instrumental"], true);
        assert!(json.get("prompt").is_none());
        assert!(json.get("callBackUrl").is_none());
    }

    #[test]
    fn suno_track_defaults_optional_fields() {
        let track: SunoTrack =
            serde_json::from_value(json!({"audioUrl": "https://cdn/a.mp3"})).unwrap();
        assert_eq!(track.audio_url, "https://cdn/a.mp3");
        assert!(track.title.is_empty());
        assert_eq!(track.duration, None);
    }
}
