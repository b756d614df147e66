//! Tool names and input schemas. Both are an external contract with callers.

use serde_json::{Value, json};

use crate::tools::{image, music, video};
use crate::transcribe::MODEL_SIZES;

pub const TOOL_GENERATE_IMAGE: &str = "generate_image";
pub const TOOL_GENERATE_VIDEO: &str = "generate_video";
pub const TOOL_GENERATE_MUSIC: &str = "generate_music";
pub const TOOL_GENERATE_SOUND_EFFECT: &str = "generate_sound_effect";
pub const TOOL_GENERATE_SPEECH: &str = "generate_speech";
pub const TOOL_GENERATE_SUBTITLES: &str = "generate_subtitles";
pub const TOOL_CATALOG_ADD_ASSET: &str = "catalog_add_asset";
pub const TOOL_CATALOG_LIST_ASSETS: &str = "catalog_list_assets";
pub const TOOL_CATALOG_GET_ASSET: &str = "catalog_get_asset";
pub const TOOL_CATALOG_DOWNLOAD_ASSET: &str = "catalog_download_asset";

/// `output_name`, `save_to_catalog` and `description`, merged into every generation schema.
fn with_output_properties(mut schema: Value) -> Value {
    if let Some(props) = schema.get_mut("properties").and_then(Value::as_object_mut) {
        props.insert(
            "output_name".into(),
            json!({
                "type": "string",
                "description": "File name for the saved result; defaults to a timestamped name"
            }),
        );
        props.insert(
            "save_to_catalog".into(),
            json!({
                "type": "boolean",
                "default": true,
                "description": "Register the result in the asset catalog when one is configured"
            }),
        );
        props.insert(
            "description".into(),
            json!({"type": "string", "description": "Catalog description; defaults to the prompt"}),
        );
    }
    schema
}

pub fn generate_image_schema() -> Value {
    with_output_properties(json!({
        "type": "object",
        "properties": {
            "prompt": { "type": "string", "description": "What the image should show" },
            "aspect_ratio": { "type": "string", "enum": image::ASPECT_RATIOS, "default": "1:1" },
            "resolution": { "type": "string", "enum": image::RESOLUTIONS, "default": "1K" },
            "image_urls": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Reference images for editing or style transfer"
            }
        },
        "required": ["prompt"],
        "additionalProperties": false
    }))
}

pub fn generate_video_schema() -> Value {
    with_output_properties(json!({
        "type": "object",
        "properties": {
            "prompt": { "type": "string" },
            "model": { "type": "string", "enum": video::MODELS, "default": "veo3_fast" },
            "aspect_ratio": { "type": "string", "enum": video::ASPECT_RATIOS, "default": "16:9" },
            "image_urls": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Image to animate (image-to-video)"
            },
            "seeds": { "type": "integer", "minimum": 10000, "maximum": 99999 },
            "enable_translation": { "type": "boolean", "default": true }
        },
        "required": ["prompt"],
        "additionalProperties": false
    }))
}

pub fn generate_music_schema() -> Value {
    with_output_properties(json!({
        "type": "object",
        "properties": {
            "prompt": {
                "type": "string",
                "description": "Lyrics in custom mode, otherwise a description of the song"
            },
            "style": { "type": "string", "description": "Genre and mood; required in custom mode" },
            "title": { "type": "string", "description": "Required in custom mode" },
            "custom_mode": { "type": "boolean", "default": false },
            "instrumental": { "type": "boolean", "default": false },
            "model": { "type": "string", "enum": music::MODELS, "default": music::DEFAULT_MODEL }
        },
        "additionalProperties": false
    }))
}

pub fn generate_sound_effect_schema() -> Value {
    with_output_properties(json!({
        "type": "object",
        "properties": {
            "text": { "type": "string", "description": "Description of the sound" },
            "duration_seconds": { "type": "number", "minimum": 0.5, "maximum": 22 },
            "prompt_influence": { "type": "number", "minimum": 0, "maximum": 1, "default": 0.3 },
            "loop": { "type": "boolean", "default": false }
        },
        "required": ["text"],
        "additionalProperties": false
    }))
}

pub fn generate_speech_schema() -> Value {
    with_output_properties(json!({
        "type": "object",
        "properties": {
            "text": { "type": "string" },
            "voice": { "type": "string", "default": "Rachel" },
            "stability": { "type": "number", "minimum": 0, "maximum": 1, "default": 0.5 },
            "similarity_boost": { "type": "number", "minimum": 0, "maximum": 1, "default": 0.75 },
            "speed": { "type": "number", "minimum": 0.7, "maximum": 1.2, "default": 1.0 }
        },
        "required": ["text"],
        "additionalProperties": false
    }))
}

pub fn generate_subtitles_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "input_path": { "type": "string", "description": "Local audio or video file" },
            "model_size": { "type": "string", "enum": MODEL_SIZES, "default": "base" },
            "language": {
                "type": "string",
                "description": "ISO 639-1 code; omit or \"auto\" to detect"
            },
            "output_path": {
                "type": "string",
                "description": "Where to write the .srt; defaults to the subtitles directory"
            }
        },
        "required": ["input_path"],
        "additionalProperties": false
    })
}

pub fn catalog_add_asset_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "file_path": { "type": "string" },
            "description": { "type": "string" }
        },
        "required": ["file_path"],
        "additionalProperties": false
    })
}

pub fn catalog_list_assets_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "filter_formula": {
                "type": "string",
                "description": "Airtable formula, e.g. {Type}='video'"
            },
            "content_type": {
                "type": "string",
                "enum": ["image", "video", "audio", "subtitle", "other"]
            },
            "page_size": { "type": "integer", "minimum": 1, "maximum": 100, "default": 20 },
            "offset": { "type": "string", "description": "Cursor returned by a previous call" }
        },
        "additionalProperties": false
    })
}

pub fn catalog_get_asset_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "code": { "type": "string", "description": "Short code such as A42" }
        },
        "required": ["code"],
        "additionalProperties": false
    })
}

pub fn catalog_download_asset_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "code": { "type": "string" },
            "output_name": {
                "type": "string",
                "description": "File name inside the download directory"
            }
        },
        "required": ["code"],
        "additionalProperties": false
    })
}
