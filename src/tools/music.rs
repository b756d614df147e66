use serde_json::Value;

use super::{OutputArgs, generation_result, media_error, one_of, optional_bool, optional_str};
use crate::error::MediaError;
use crate::kie::{SunoAdapter, SunoGenerateRequest};
use crate::mcp::contracts::TOOL_GENERATE_MUSIC;
use crate::media::MediaKind;
use crate::orchestrator::{Generation, Orchestrator, Submission};

pub const MODELS: &[&str] = &["V3_5", "V4", "V4_5", "V4_5PLUS", "V5"];
pub const DEFAULT_MODEL: &str = "V4_5";

pub async fn call(orch: &Orchestrator, args: &Value) -> Value {
    let callback = orch.config().music_callback_url.clone();
    let generation = match build(args, callback) {
        Ok(generation) => generation,
        Err(err) => return media_error(TOOL_GENERATE_MUSIC, &err),
    };
    let result = orch
        .generate(generation, &SunoAdapter, orch.config().poll.music)
        .await;
    generation_result(TOOL_GENERATE_MUSIC, result)
}

/// Custom mode needs `style` and `title`, plus lyrics in `prompt` unless
/// instrumental. Simple mode only needs a `prompt` description.
fn validate(req: &SunoGenerateRequest) -> Result<(), MediaError> {
    let missing = |field: &str, why: &str| {
        MediaError::InvalidInput(format!("`{field}` is required {why}"))
    };
    if req.custom_mode {
        if req.style.is_none() {
            return Err(missing("style", "when custom_mode is true"));
        }
        if req.title.is_none() {
            return Err(missing("title", "when custom_mode is true"));
        }
        if !req.instrumental && req.prompt.is_none() {
            return Err(missing(
                "prompt",
                "when custom_mode is true and instrumental is false",
            ));
        }
    } else if req.prompt.is_none() {
        return Err(missing("prompt", "when custom_mode is false"));
    }
    Ok(())
}

fn build(args: &Value, call_back_url: Option<String>) -> Result<Generation, MediaError> {
    let request = SunoGenerateRequest {
        prompt: optional_str(args, "prompt")?,
        style: optional_str(args, "style")?,
        title: optional_str(args, "title")?,
        custom_mode: optional_bool(args, "custom_mode", false)?,
        instrumental: optional_bool(args, "instrumental", false)?,
        model: one_of(args, "model", MODELS, DEFAULT_MODEL)?,
        call_back_url,
    };
    validate(&request)?;
    let output = OutputArgs::parse(args)?;

    let description = output
        .description
        .or_else(|| request.title.clone())
        .or_else(|| request.prompt.clone())
        .or_else(|| request.style.clone())
        .unwrap_or_default();

    Ok(Generation {
        tool: TOOL_GENERATE_MUSIC,
        kind: MediaKind::Music,
        output_name: output.output_name,
        submission: Submission::Music(request),
        save_to_catalog: output.save_to_catalog,
        description,
    })
}
