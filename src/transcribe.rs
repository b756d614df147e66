//! Local speech-to-text through the whisper.cpp CLI.
//!
//! [`WhisperCli`] makes sure the ggml model for the requested size exists
//! (downloading it on first use) and runs the binary with a timeout,
//! expecting it to leave an `.srt` file next to the requested output stem.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use reqwest::Client;
use tokio::process::Command;
use tracing::info;

use crate::artifact::materialize;
use crate::config::WhisperConfig;
use crate::error::MediaError;

pub const MODEL_SIZES: &[&str] = &["tiny", "base", "small", "medium", "large-v3"];
pub const DEFAULT_MODEL_SIZE: &str = "base";

/// One transcription request.
#[derive(Debug, Clone)]
pub struct TranscribeRequest {
    pub input: PathBuf,
    pub model_size: String,
    pub language: Option<String>,
    /// Output path without extension; whisper appends `.srt`.
    pub output_stem: PathBuf,
}

pub struct WhisperCli {
    client: Client,
    config: WhisperConfig,
}

impl WhisperCli {
    pub fn new(client: Client, config: WhisperConfig) -> Self {
        Self { client, config }
    }

    pub fn model_path(&self, size: &str) -> PathBuf {
        self.config.models_dir.join(format!("ggml-{size}.bin"))
    }

    /// Return the model file for `size`, fetching it when missing. The body is
    /// streamed to disk; `client` should not carry a whole-request timeout.
    pub async fn ensure_model(&self, size: &str) -> Result<PathBuf, MediaError> {
        if !MODEL_SIZES.contains(&size) {
            return Err(MediaError::InvalidInput(format!(
                "unknown model size {size:?}, expected one of {}",
                MODEL_SIZES.join(", ")
            )));
        }

        let path = self.model_path(size);
        if tokio::fs::try_exists(&path).await? {
            return Ok(path);
        }

        let url = format!(
            "{}/ggml-{size}.bin",
            self.config.model_base_url.trim_end_matches('/')
        );
        info!(%url, dest = %path.display(), "downloading whisper model");
        materialize(&self.client, &url, &path).await?;
        Ok(path)
    }

    /// Argument list for one run; kept separate so it can be checked without spawning.
    pub fn args(model: &Path, req: &TranscribeRequest) -> Vec<String> {
        let mut args = vec![
            "-m".to_string(),
            model.display().to_string(),
            "-f".to_string(),
            req.input.display().to_string(),
            "-osrt".to_string(),
            "-of".to_string(),
            req.output_stem.display().to_string(),
        ];
        if let Some(lang) = req.language.as_deref().filter(|l| !l.is_empty()) {
            args.push("-l".to_string());
            args.push(lang.to_string());
        }
        args
    }

    /// Run the transcription and return the subtitle file path.
    pub async fn transcribe(&self, req: &TranscribeRequest) -> Result<PathBuf, MediaError> {
        if !tokio::fs::try_exists(&req.input).await? {
            return Err(MediaError::InvalidInput(format!(
                "input file not found: {}",
                req.input.display()
            )));
        }
        let model = self.ensure_model(&req.model_size).await?;

        if let Some(parent) = req.output_stem.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut command = Command::new(&self.config.binary);
        command
            .args(Self::args(&model, req))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn().map_err(|e| {
            MediaError::Transcription(format!("failed to start {}: {e}", self.config.binary))
        })?;

        let limit = Duration::from_secs(self.config.timeout_secs);
        let output = tokio::time::timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| {
                MediaError::Transcription(format!(
                    "{} did not finish within {}s",
                    self.config.binary, self.config.timeout_secs
                ))
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediaError::Transcription(format!(
                "{} exited with {}: {}",
                self.config.binary,
                output.status,
                stderr.trim()
            )));
        }

        let srt = srt_path(&req.output_stem);
        if !tokio::fs::try_exists(&srt).await? {
            return Err(MediaError::Transcription(format!(
                "expected subtitle file {} was not produced",
                srt.display()
            )));
        }
        Ok(srt)
    }
}

pub fn srt_path(stem: &Path) -> PathBuf {
    let mut name = stem.as_os_str().to_os_string();
    name.push(".srt");
    PathBuf::from(name)
}
