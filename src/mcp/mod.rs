use serde_json::{Value, json};

pub mod contracts;
pub mod server;

pub use server::serve_stdio;

pub fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": contracts::TOOL_GENERATE_IMAGE,
            "description": "Generate an image from a text prompt and save it as PNG.",
            "inputSchema": contracts::generate_image_schema()
        }),
        json!({
            "name": contracts::TOOL_GENERATE_VIDEO,
            "description": "Generate a short video clip (Veo) and save it as MP4.",
            "inputSchema": contracts::generate_video_schema()
        }),
        json!({
            "name": contracts::TOOL_GENERATE_MUSIC,
            "description": "Generate a song or instrumental track (Suno) and save it as MP3.",
            "inputSchema": contracts::generate_music_schema()
        }),
        json!({
            "name": contracts::TOOL_GENERATE_SOUND_EFFECT,
            "description": "Generate a sound effect from a description and save it as MP3.",
            "inputSchema": contracts::generate_sound_effect_schema()
        }),
        json!({
            "name": contracts::TOOL_GENERATE_SPEECH,
            "description": "Synthesize speech from text and save it as MP3.",
            "inputSchema": contracts::generate_speech_schema()
        }),
        json!({
            "name": contracts::TOOL_GENERATE_SUBTITLES,
            "description":
                "Transcribe a local audio or video file into SRT subtitles with whisper.",
            "inputSchema": contracts::generate_subtitles_schema()
        }),
        json!({
            "name": contracts::TOOL_CATALOG_ADD_ASSET,
            "description": "Upload a local file to the asset catalog and return its short code.",
            "inputSchema": contracts::catalog_add_asset_schema()
        }),
        json!({
            "name": contracts::TOOL_CATALOG_LIST_ASSETS,
            "description": "List catalog assets, optionally filtered.",
            "inputSchema": contracts::catalog_list_assets_schema()
        }),
        json!({
            "name": contracts::TOOL_CATALOG_GET_ASSET,
            "description": "Look up one catalog asset by short code.",
            "inputSchema": contracts::catalog_get_asset_schema()
        }),
        json!({
            "name": contracts::TOOL_CATALOG_DOWNLOAD_ASSET,
            "description": "Download a catalog asset's attachment to the local download directory.",
            "inputSchema": contracts::catalog_download_asset_schema()
        }),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_are_unique_and_schemas_are_objects() {
        let defs = tool_definitions();
        let names: HashSet<&str> = defs.iter().filter_map(|d| d["name"].as_str()).collect();
        assert_eq!(names.len(), defs.len());
        assert_eq!(defs.len(), 10);
        for def in &defs {
            assert_eq!(def["inputSchema"]["type"], json!("object"), "{}", def["name"]);
        }
    }

    #[test]
    fn generation_tools_carry_output_properties() {
        let media_tools = tool_definitions().into_iter().filter(|d| {
            d["name"]
                .as_str()
                .is_some_and(|n| n.starts_with("generate_") && n != "generate_subtitles")
        });
        for def in media_tools {
            let props = &def["inputSchema"]["properties"];
            assert!(props.get("output_name").is_some(), "{}", def["name"]);
            assert!(props.get("save_to_catalog").is_some(), "{}", def["name"]);
        }
    }
}
