//! Tool implementations behind `tools/call`.
//!
//! Every tool takes its JSON arguments and always answers with a
//! `{content, structuredContent, isError}` value; errors never escape a tool.

use serde_json::{Value, json};

use crate::error::MediaError;
use crate::mcp::contracts;
use crate::orchestrator::{CatalogNote, GenerationFailure, GenerationReport, Orchestrator};

pub mod catalog;
pub mod image;
pub mod music;
pub mod sound_effect;
pub mod speech;
pub mod subtitles;
pub mod video;

/// Route one call to its tool. Unknown names become an `invalid_input` error.
pub async fn dispatch(orch: &Orchestrator, name: &str, args: &Value) -> Value {
    match name {
        contracts::TOOL_GENERATE_IMAGE => image::call(orch, args).await,
        contracts::TOOL_GENERATE_VIDEO => video::call(orch, args).await,
        contracts::TOOL_GENERATE_MUSIC => music::call(orch, args).await,
        contracts::TOOL_GENERATE_SOUND_EFFECT => sound_effect::call(orch, args).await,
        contracts::TOOL_GENERATE_SPEECH => speech::call(orch, args).await,
        contracts::TOOL_GENERATE_SUBTITLES => subtitles::call(orch, args).await,
        contracts::TOOL_CATALOG_ADD_ASSET => catalog::add_asset(orch, args).await,
        contracts::TOOL_CATALOG_LIST_ASSETS => catalog::list_assets(orch, args).await,
        contracts::TOOL_CATALOG_GET_ASSET => catalog::get_asset(orch, args).await,
        contracts::TOOL_CATALOG_DOWNLOAD_ASSET => catalog::download_asset(orch, args).await,
        _ => error_result("invalid_input", format!("unknown tool: {name}"), None),
    }
}

pub fn error_result(kind: &str, message: impl Into<String>, tool: Option<&str>) -> Value {
    let message = message.into();
    let mut error = json!({
        "kind": kind,
        "message": message,
    });

    if let Some(tool) = tool
        && let Some(obj) = error.as_object_mut()
    {
        obj.insert("tool".to_string(), json!(tool));
    }

    json!({
        "content": [{"type": "text", "text": format!("Error: {message}")}],
        "structuredContent": {"error": error},
        "isError": true
    })
}

pub fn media_error(tool: &str, err: &MediaError) -> Value {
    error_result(err.kind(), err.to_string(), Some(tool))
}

pub fn success_result(text: impl Into<String>, structured: Value) -> Value {
    json!({
        "content": [{"type": "text", "text": text.into()}],
        "structuredContent": structured,
        "isError": false
    })
}

/// Answer for catalog tools when no Airtable credentials are configured.
/// An expected mode, so `isError` stays false.
pub fn not_configured_result(tool: &str) -> Value {
    let message =
        "Catalog is not configured. Set AIRTABLE_API_KEY and AIRTABLE_BASE_ID to enable it.";
    success_result(
        message,
        json!({
            "configured": false,
            "tool": tool,
            "message": message,
        }),
    )
}

/// Shape a generation outcome. Failures keep the invocation summary next to the error.
pub fn generation_result(
    tool: &str,
    result: Result<GenerationReport, GenerationFailure>,
) -> Value {
    match result {
        Ok(report) => {
            let mut structured = match serde_json::to_value(&report) {
                Ok(value) => value,
                Err(e) => return error_result("internal_error", e.to_string(), Some(tool)),
            };
            if let (Some(CatalogNote::Failed { error }), Some(obj)) =
                (&report.catalog, structured.as_object_mut())
            {
                obj.insert("catalog_error".into(), json!(error));
            }

            let mut text = format!(
                "Saved {} ({} bytes)\nRemote URL: {}",
                report.local_path.display(),
                report.bytes,
                report.remote_url
            );
            match &report.catalog {
                Some(CatalogNote::Recorded {
                    code: Some(code), ..
                }) => text.push_str(&format!("\nCatalog code: {code}")),
                Some(CatalogNote::Failed { error }) => {
                    text.push_str(&format!("\nCatalog notification failed: {error}"))
                }
                _ => {}
            }
            success_result(text, structured)
        }
        Err(failure) => {
            let mut value = media_error(tool, &failure.error);
            if let Some(structured) = value
                .get_mut("structuredContent")
                .and_then(Value::as_object_mut)
            {
                structured.insert("job".into(), json!(failure.job));
            }
            value
        }
    }
}

// Argument helpers. Missing optional values fall back to defaults; values of
// the wrong type are rejected rather than ignored.

pub(crate) fn required_str(args: &Value, key: &str) -> Result<String, MediaError> {
    optional_str(args, key)?
        .ok_or_else(|| MediaError::InvalidInput(format!("`{key}` is required")))
}

pub(crate) fn optional_str(args: &Value, key: &str) -> Result<Option<String>, MediaError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let s = s.trim();
            Ok((!s.is_empty()).then(|| s.to_string()))
        }
        Some(_) => Err(MediaError::InvalidInput(format!("`{key}` must be a string"))),
    }
}

pub(crate) fn optional_bool(args: &Value, key: &str, default: bool) -> Result<bool, MediaError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(MediaError::InvalidInput(format!("`{key}` must be a boolean"))),
    }
}

/// Number within `[min, max]`, or `None` when absent.
pub(crate) fn optional_number(
    args: &Value,
    key: &str,
    min: f64,
    max: f64,
) -> Result<Option<f64>, MediaError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => {
            let n = value
                .as_f64()
                .ok_or_else(|| MediaError::InvalidInput(format!("`{key}` must be a number")))?;
            if !(min..=max).contains(&n) {
                return Err(MediaError::InvalidInput(format!(
                    "`{key}` must be between {min} and {max}, got {n}"
                )));
            }
            Ok(Some(n))
        }
    }
}

pub(crate) fn optional_integer(
    args: &Value,
    key: &str,
    min: u64,
    max: u64,
) -> Result<Option<u64>, MediaError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => {
            let n = value.as_u64().ok_or_else(|| {
                MediaError::InvalidInput(format!("`{key}` must be a non-negative integer"))
            })?;
            if !(min..=max).contains(&n) {
                return Err(MediaError::InvalidInput(format!(
                    "`{key}` must be between {min} and {max}, got {n}"
                )));
            }
            Ok(Some(n))
        }
    }
}

/// String from a closed vocabulary, `default` when absent.
pub(crate) fn one_of(
    args: &Value,
    key: &str,
    allowed: &[&str],
    default: &str,
) -> Result<String, MediaError> {
    let value = optional_str(args, key)?.unwrap_or_else(|| default.to_string());
    if allowed.contains(&value.as_str()) {
        Ok(value)
    } else {
        Err(MediaError::InvalidInput(format!(
            "`{key}` must be one of {}, got {value:?}",
            allowed.join(", ")
        )))
    }
}

pub(crate) fn string_list(args: &Value, key: &str) -> Result<Option<Vec<String>>, MediaError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => {
            let list = items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        MediaError::InvalidInput(format!("`{key}` must contain only strings"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok((!list.is_empty()).then_some(list))
        }
        Some(_) => Err(MediaError::InvalidInput(format!(
            "`{key}` must be an array of strings"
        ))),
    }
}

/// Arguments shared by every generation tool.
#[derive(Debug, Clone)]
pub(crate) struct OutputArgs {
    pub output_name: Option<String>,
    pub save_to_catalog: bool,
    pub description: Option<String>,
}

impl OutputArgs {
    pub fn parse(args: &Value) -> Result<Self, MediaError> {
        Ok(Self {
            output_name: optional_str(args, "output_name")?,
            save_to_catalog: optional_bool(args, "save_to_catalog", true)?,
            description: optional_str(args, "description")?,
        })
    }
}
