use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::{Value, json};
use tracing::info;

use super::{media_error, one_of, optional_str, required_str, success_result};
use crate::error::MediaError;
use crate::mcp::contracts::TOOL_GENERATE_SUBTITLES;
use crate::media::MediaKind;
use crate::orchestrator::Orchestrator;
use crate::transcribe::{DEFAULT_MODEL_SIZE, MODEL_SIZES, TranscribeRequest, WhisperCli};

pub async fn call(orch: &Orchestrator, args: &Value) -> Value {
    match run(orch, args).await {
        Ok(value) => value,
        Err(err) => media_error(TOOL_GENERATE_SUBTITLES, &err),
    }
}

async fn run(orch: &Orchestrator, args: &Value) -> Result<Value, MediaError> {
    let request = build(args, &orch.config().subtitles_dir)?;
    info!(input = %request.input.display(), model = %request.model_size, "transcribing");

    let whisper = WhisperCli::new(orch.downloads().clone(), orch.config().whisper.clone());
    let srt = whisper.transcribe(&request).await?;
    let bytes = tokio::fs::metadata(&srt).await?.len();

    Ok(success_result(
        format!("Subtitles written to {}", srt.display()),
        json!({
            "local_path": srt,
            "bytes": bytes,
            "input_path": request.input,
            "model_size": request.model_size,
            "language": request.language,
        }),
    ))
}

fn build(args: &Value, subtitles_dir: &Path) -> Result<TranscribeRequest, MediaError> {
    let input = PathBuf::from(required_str(args, "input_path")?);
    let model_size = one_of(args, "model_size", MODEL_SIZES, DEFAULT_MODEL_SIZE)?;
    let language = optional_str(args, "language")?.filter(|l| l != "auto");

    let output_stem = match optional_str(args, "output_path")? {
        Some(path) => strip_srt(PathBuf::from(path)),
        None => {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned());
            strip_srt(MediaKind::Subtitle.output_path(subtitles_dir, stem.as_deref(), Utc::now()))
        }
    };

    Ok(TranscribeRequest {
        input,
        model_size,
        language,
        output_stem,
    })
}

/// whisper appends `.srt` itself.
fn strip_srt(path: PathBuf) -> PathBuf {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("srt") => path.with_extension(""),
        _ => path,
    }
}
