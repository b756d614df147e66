use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use super::error::KieError;
use super::types::{
    CreateTaskRequest, Envelope, SunoGenerateRequest, TaskCreated, VeoGenerateRequest,
};
use crate::poller::StatusSource;

pub const API_URL: &str = "https://api.kie.ai";

const CREATE_TASK_PATH: &str = "/api/v1/jobs/createTask";
const VEO_GENERATE_PATH: &str = "/api/v1/veo/generate";
const SUNO_GENERATE_PATH: &str = "/api/v1/generate";

/// Client for the kie.ai generation endpoints. Every call carries the bearer key.
#[derive(Clone)]
pub struct KieClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl KieClient {
    /// `base_url` is normally [`API_URL`]; tests point it at a mock server.
    pub fn with_base_url(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Submit a market job (`model` + free-form `input`), returning its task id.
    pub async fn create_task(&self, model: &str, input: Value) -> Result<String, KieError> {
        let req = CreateTaskRequest {
            model: model.to_string(),
            input,
        };
        self.submit(CREATE_TASK_PATH, &req).await
    }

    pub async fn generate_video(&self, req: &VeoGenerateRequest) -> Result<String, KieError> {
        self.submit(VEO_GENERATE_PATH, req).await
    }

    pub async fn generate_music(&self, req: &SunoGenerateRequest) -> Result<String, KieError> {
        self.submit(SUNO_GENERATE_PATH, req).await
    }

    async fn submit<B>(&self, path: &str, body: &B) -> Result<String, KieError>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        let envelope = match serde_json::from_str::<Envelope>(&text) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(KieError::Rejected {
                    code: i64::from(status.as_u16()),
                    message: text,
                });
            }
            Err(e) => return Err(KieError::Parse(e.to_string())),
        };

        if !status.is_success() || !envelope.is_ok() {
            let code = if envelope.is_ok() {
                i64::from(status.as_u16())
            } else {
                envelope.code
            };
            return Err(KieError::Rejected {
                code,
                message: envelope.message().to_string(),
            });
        }

        envelope
            .record::<TaskCreated>()
            .map(|created| created.task_id)
            .filter(|id| !id.is_empty())
            .ok_or(KieError::MissingTaskId)
    }
}

impl StatusSource for KieClient {
    /// Bodies that are not envelopes become one carrying the HTTP status,
    /// so adapters see every rejection the same way.
    async fn fetch_status(&self, path: &str, task_id: &str) -> Result<Envelope, KieError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(&self.api_key)
            .query(&[("taskId", task_id)])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str::<Envelope>(&text) {
            Ok(mut envelope) => {
                if !status.is_success() && envelope.is_ok() {
                    envelope.code = i64::from(status.as_u16());
                }
                Ok(envelope)
            }
            Err(_) if !status.is_success() => Ok(Envelope {
                code: i64::from(status.as_u16()),
                msg: Some(text),
                data: None,
            }),
            Err(e) => Err(KieError::Parse(e.to_string())),
        }
    }
}
