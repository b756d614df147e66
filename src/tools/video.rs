use serde_json::Value;

use super::{
    OutputArgs, generation_result, media_error, one_of, optional_bool, optional_integer,
    required_str, string_list,
};
use crate::error::MediaError;
use crate::kie::{VeoAdapter, VeoGenerateRequest};
use crate::mcp::contracts::TOOL_GENERATE_VIDEO;
use crate::media::MediaKind;
use crate::orchestrator::{Generation, Orchestrator, Submission};

pub const MODELS: &[&str] = &["veo3_fast", "veo3"];
pub const ASPECT_RATIOS: &[&str] = &["16:9", "9:16", "Auto"];

const SEED_RANGE: (u64, u64) = (10_000, 99_999);

pub async fn call(orch: &Orchestrator, args: &Value) -> Value {
    let generation = match build(args) {
        Ok(generation) => generation,
        Err(err) => return media_error(TOOL_GENERATE_VIDEO, &err),
    };
    let result = orch
        .generate(generation, &VeoAdapter, orch.config().poll.video)
        .await;
    generation_result(TOOL_GENERATE_VIDEO, result)
}

fn build(args: &Value) -> Result<Generation, MediaError> {
    let prompt = required_str(args, "prompt")?;
    let request = VeoGenerateRequest {
        prompt: prompt.clone(),
        model: one_of(args, "model", MODELS, "veo3_fast")?,
        aspect_ratio: one_of(args, "aspect_ratio", ASPECT_RATIOS, "16:9")?,
        image_urls: string_list(args, "image_urls")?,
        seeds: optional_integer(args, "seeds", SEED_RANGE.0, SEED_RANGE.1)?,
        enable_translation: optional_bool(args, "enable_translation", true)?,
    };
    let output = OutputArgs::parse(args)?;

    Ok(Generation {
        tool: TOOL_GENERATE_VIDEO,
        kind: MediaKind::Video,
        output_name: output.output_name,
        submission: Submission::Video(request),
        save_to_catalog: output.save_to_catalog,
        description: output.description.unwrap_or(prompt),
    })
}
