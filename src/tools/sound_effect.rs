use serde_json::{Map, Value, json};

use super::{
    OutputArgs, generation_result, media_error, optional_bool, optional_number, required_str,
};
use crate::error::MediaError;
use crate::kie::JobsAdapter;
use crate::mcp::contracts::TOOL_GENERATE_SOUND_EFFECT;
use crate::media::MediaKind;
use crate::orchestrator::{Generation, Orchestrator, Submission};

pub const MODEL: &str = "elevenlabs/sound-effect-v2";

pub const MIN_DURATION_SECS: f64 = 0.5;
pub const MAX_DURATION_SECS: f64 = 22.0;
const DEFAULT_PROMPT_INFLUENCE: f64 = 0.3;

pub async fn call(orch: &Orchestrator, args: &Value) -> Value {
    let generation = match build(args) {
        Ok(generation) => generation,
        Err(err) => return media_error(TOOL_GENERATE_SOUND_EFFECT, &err),
    };
    let result = orch
        .generate(generation, &JobsAdapter, orch.config().poll.jobs)
        .await;
    generation_result(TOOL_GENERATE_SOUND_EFFECT, result)
}

fn build(args: &Value) -> Result<Generation, MediaError> {
    let text = required_str(args, "text")?;
    let duration = optional_number(args, "duration_seconds", MIN_DURATION_SECS, MAX_DURATION_SECS)?;
    let influence = optional_number(args, "prompt_influence", 0.0, 1.0)?
        .unwrap_or(DEFAULT_PROMPT_INFLUENCE);
    let looping = optional_bool(args, "loop", false)?;
    let output = OutputArgs::parse(args)?;

    let mut input = Map::new();
    input.insert("text".into(), json!(text));
    // Without a duration the model picks one from the prompt.
    if let Some(duration) = duration {
        input.insert("duration_seconds".into(), json!(duration));
    }
    input.insert("prompt_influence".into(), json!(influence));
    input.insert("loop".into(), json!(looping));
    input.insert("output_format".into(), json!("mp3_44100_128"));

    Ok(Generation {
        tool: TOOL_GENERATE_SOUND_EFFECT,
        kind: MediaKind::SoundEffect,
        output_name: output.output_name,
        submission: Submission::Task {
            model: MODEL.to_string(),
            input: Value::Object(input),
        },
        save_to_catalog: output.save_to_catalog,
        description: output.description.unwrap_or(text),
    })
}
