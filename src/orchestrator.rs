use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use crate::artifact::materialize;
use crate::catalog::{AirtableClient, NewAsset};
use crate::config::{MediaConfig, PollLimits};
use crate::error::MediaError;
use crate::job::{Job, JobSummary, Stage};
use crate::kie::{KieClient, SunoGenerateRequest, SunoTrack, VeoGenerateRequest};
use crate::media::{ContentKind, MediaKind};
use crate::poller::{JobPoller, PollOutcome, StatusAdapter};

/// Shared HTTP client for every outbound call.
pub fn http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(300))
        .build()
}

/// Client for large downloads such as whisper models. Only connecting is
/// bounded, so slow multi-gigabyte transfers are not cut off.
pub fn download_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()
}

/// Provider request that starts a job.
#[derive(Debug, Clone)]
pub enum Submission {
    Task { model: String, input: Value },
    Video(VeoGenerateRequest),
    Music(SunoGenerateRequest),
}

/// What one generation tool asks the orchestrator to do.
#[derive(Debug, Clone)]
pub struct Generation {
    pub tool: &'static str,
    pub kind: MediaKind,
    pub output_name: Option<String>,
    pub submission: Submission,
    /// Register the artifact in the catalog after download (when configured).
    pub save_to_catalog: bool,
    pub description: String,
}

/// Adapter payloads that point at a downloadable result.
pub trait GeneratedPayload {
    fn download_url(&self) -> &str;

    /// Extra fields merged into the success payload.
    fn details(&self) -> Map<String, Value> {
        Map::new()
    }
}

impl GeneratedPayload for String {
    fn download_url(&self) -> &str {
        self
    }
}

impl GeneratedPayload for Vec<String> {
    fn download_url(&self) -> &str {
        self.first().map(String::as_str).unwrap_or_default()
    }

    fn details(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("result_urls".into(), json!(self));
        map
    }
}

impl GeneratedPayload for SunoTrack {
    fn download_url(&self) -> &str {
        &self.audio_url
    }

    fn details(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("track_id".into(), json!(self.id));
        map.insert("title".into(), json!(self.title));
        map.insert("duration".into(), json!(self.duration));
        map.insert("cover_image_url".into(), json!(self.image_url));
        map
    }
}

/// Result of the optional catalog notification. Never turns a generation into a failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CatalogNote {
    Recorded {
        record_id: String,
        code: Option<String>,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub local_path: PathBuf,
    pub remote_url: String,
    pub bytes: u64,
    pub task_id: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
    pub job: JobSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<CatalogNote>,
}

#[derive(Debug)]
pub struct GenerationFailure {
    pub error: MediaError,
    pub job: JobSummary,
}

/// Drives one generation through submit → poll → materialize → catalog.
pub struct Orchestrator {
    config: MediaConfig,
    http: Client,
    downloads: Client,
    kie: Option<KieClient>,
    catalog: Option<AirtableClient>,
}

impl Orchestrator {
    pub fn new(config: MediaConfig, http: Client) -> Self {
        let kie = (!config.api_key.is_empty()).then(|| {
            KieClient::with_base_url(
                http.clone(),
                config.api_key.clone(),
                config.api_base_url.clone(),
            )
        });
        let catalog = AirtableClient::from_config(http.clone(), &config.catalog);
        Self {
            config,
            downloads: http.clone(),
            http,
            kie,
            catalog,
        }
    }

    /// Use `client` for model downloads instead of the shared client.
    pub fn with_downloads(mut self, client: Client) -> Self {
        self.downloads = client;
        self
    }

    pub fn config(&self) -> &MediaConfig {
        &self.config
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn downloads(&self) -> &Client {
        &self.downloads
    }

    pub fn catalog(&self) -> Option<&AirtableClient> {
        self.catalog.as_ref()
    }

    fn kie(&self) -> Result<&KieClient, MediaError> {
        self.kie.as_ref().ok_or_else(|| {
            MediaError::Config("KIE_API_KEY is not set; generation tools need an API key".into())
        })
    }

    /// Run one generation with the adapter the tool is bound to.
    pub async fn generate<A>(
        &self,
        generation: Generation,
        adapter: &A,
        limits: PollLimits,
    ) -> Result<GenerationReport, GenerationFailure>
    where
        A: StatusAdapter,
        A::Payload: GeneratedPayload,
    {
        let mut job = Job::new(generation.tool);
        info!(tool = generation.tool, invocation = %job.id, "generation started");

        match self.drive(&mut job, &generation, adapter, limits).await {
            Ok(report) => Ok(report),
            Err(error) => {
                job.fail();
                warn!(
                    tool = generation.tool,
                    invocation = %job.id,
                    stage = %job.stage,
                    kind = error.kind(),
                    %error,
                    "generation did not complete"
                );
                Err(GenerationFailure {
                    error,
                    job: JobSummary::from_job(&job),
                })
            }
        }
    }

    async fn drive<A>(
        &self,
        job: &mut Job,
        generation: &Generation,
        adapter: &A,
        limits: PollLimits,
    ) -> Result<GenerationReport, MediaError>
    where
        A: StatusAdapter,
        A::Payload: GeneratedPayload,
    {
        let kie = self.kie()?;

        // SUBMITTED
        let task_id = match &generation.submission {
            Submission::Task { model, input } => kie.create_task(model, input.clone()).await?,
            Submission::Video(req) => kie.generate_video(req).await?,
            Submission::Music(req) => kie.generate_music(req).await?,
        };
        job.submitted(&task_id)?;
        info!(tool = generation.tool, %task_id, provider = adapter.name(), "job submitted");

        // POLLING
        job.advance(Stage::Polling)?;
        let report = JobPoller::new(limits.policy())
            .poll(kie, adapter, &task_id)
            .await?;
        job.poll_attempts = report.attempts;

        let payload = match report.outcome {
            PollOutcome::Success(payload) => payload,
            PollOutcome::Failure { message } => return Err(MediaError::UpstreamFailed(message)),
            PollOutcome::Rejected { code, message } => {
                return Err(MediaError::UpstreamRejected { code, message });
            }
            PollOutcome::Timeout { attempts } => {
                job.advance(Stage::TimedOut)?;
                return Err(MediaError::Timeout { task_id, attempts });
            }
        };

        // MATERIALIZING
        job.advance(Stage::Materializing)?;
        let remote_url = payload.download_url().to_string();
        let local_path = generation.kind.output_path(
            &self.config.output_dir,
            generation.output_name.as_deref(),
            Utc::now(),
        );
        let bytes = materialize(&self.http, &remote_url, &local_path).await?;
        job.advance(Stage::Done)?;
        info!(tool = generation.tool, path = %local_path.display(), bytes, "artifact saved");

        let catalog = if generation.save_to_catalog {
            self.notify_catalog(&local_path, &remote_url, &generation.description)
                .await
        } else {
            None
        };

        Ok(GenerationReport {
            local_path,
            remote_url,
            bytes,
            task_id,
            details: payload.details(),
            job: JobSummary::from_job(job),
            catalog,
        })
    }

    /// Register a saved artifact in the catalog. `None` when no catalog is configured.
    pub async fn notify_catalog(
        &self,
        local_path: &std::path::Path,
        remote_url: &str,
        description: &str,
    ) -> Option<CatalogNote> {
        let catalog = self.catalog.as_ref()?;
        let filename = local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let asset = NewAsset {
            filename,
            description: description.to_string(),
            content_type: ContentKind::from_path(local_path).to_string(),
            attachment_url: Some(remote_url.to_string()),
        };

        match catalog.create_record(&asset).await {
            Ok(created) => {
                info!(
                    record_id = %created.record_id,
                    code = ?created.code,
                    "catalog record created"
                );
                Some(CatalogNote::Recorded {
                    record_id: created.record_id,
                    code: created.code,
                })
            }
            Err(e) => {
                warn!(error = %e, "catalog notification failed; artifact kept");
                Some(CatalogNote::Failed {
                    error: e.to_string(),
                })
            }
        }
    }
}
