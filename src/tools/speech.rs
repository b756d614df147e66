use serde_json::{Value, json};

use super::{
    OutputArgs, generation_result, media_error, optional_number, optional_str, required_str,
};
use crate::error::MediaError;
use crate::kie::JobsAdapter;
use crate::mcp::contracts::TOOL_GENERATE_SPEECH;
use crate::media::MediaKind;
use crate::orchestrator::{Generation, Orchestrator, Submission};

pub const MODEL: &str = "elevenlabs/text-to-speech-multilingual-v2";
pub const DEFAULT_VOICE: &str = "Rachel";

/// Upper bound the provider accepts for a single request.
const MAX_TEXT_CHARS: usize = 5_000;

pub async fn call(orch: &Orchestrator, args: &Value) -> Value {
    let generation = match build(args) {
        Ok(generation) => generation,
        Err(err) => return media_error(TOOL_GENERATE_SPEECH, &err),
    };
    let result = orch
        .generate(generation, &JobsAdapter, orch.config().poll.jobs)
        .await;
    generation_result(TOOL_GENERATE_SPEECH, result)
}

fn build(args: &Value) -> Result<Generation, MediaError> {
    let text = required_str(args, "text")?;
    if text.chars().count() > MAX_TEXT_CHARS {
        return Err(MediaError::InvalidInput(format!(
            "`text` is limited to {MAX_TEXT_CHARS} characters"
        )));
    }
    let voice = optional_str(args, "voice")?.unwrap_or_else(|| DEFAULT_VOICE.to_string());
    let stability = optional_number(args, "stability", 0.0, 1.0)?.unwrap_or(0.5);
    let similarity = optional_number(args, "similarity_boost", 0.0, 1.0)?.unwrap_or(0.75);
    let speed = optional_number(args, "speed", 0.7, 1.2)?.unwrap_or(1.0);
    let output = OutputArgs::parse(args)?;

    let description = output.description.unwrap_or_else(|| {
        let preview: String = text.chars().take(120).collect();
        format!("{voice}: {preview}")
    });

    Ok(Generation {
        tool: TOOL_GENERATE_SPEECH,
        kind: MediaKind::Speech,
        output_name: output.output_name,
        submission: Submission::Task {
            model: MODEL.to_string(),
            input: json!({
                "text": text,
                "voice": voice,
                "stability": stability,
                "similarity_boost": similarity,
                "speed": speed,
            }),
        },
        save_to_catalog: output.save_to_catalog,
        description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let generation = build(&json!({"text": "Hello there"})).unwrap();
        let Submission::Task { input, .. } = &generation.submission else {
            panic!("expected a jobs submission");
        };
        assert_eq!(input["voice"], json!("Rachel"));
        assert_eq!(input["stability"], json!(0.5));
        assert_eq!(input["similarity_boost"], json!(0.75));
        assert_eq!(input["speed"], json!(1.0));
        assert_eq!(generation.description, "Rachel: Hello there");
    }

    #[test]
    fn speed_outside_range_is_rejected() {
        let err = build(&json!({"text": "hi", "speed": 2.0})).unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
    }

    #[test]
    fn overlong_text_is_rejected() {
        let text = "a".repeat(MAX_TEXT_CHARS + 1);
        assert!(build(&json!({"text": text})).is_err());
    }
}
