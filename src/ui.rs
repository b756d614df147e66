//! Terminal output for `mediagen call`: a spinner while the tool runs and
//! colored output for the result.
//!
//! Uses `indicatif` for the spinner and `console` for styling. The spinner
//! draws on stderr, so stdout stays clean for `--json` output.

use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{Value, json};

pub struct CallProgress {
    pb: ProgressBar,
    green: Style,
    red: Style,
    dim: Style,
}

impl CallProgress {
    /// Start the spinner for `tool`.
    pub fn start(tool: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg} {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("running {tool}"));
        pb.enable_steady_tick(Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            dim: Style::new().dim(),
        }
    }

    /// Stop the spinner and print the result. Returns `true` when the tool failed.
    pub fn finish(&self, tool: &str, result: &Value, json_output: bool) -> bool {
        self.pb.finish_and_clear();
        let failed = is_error(result);

        if json_output {
            let structured = result
                .get("structuredContent")
                .cloned()
                .unwrap_or_else(|| json!({}));
            println!(
                "{}",
                serde_json::to_string_pretty(&structured).unwrap_or_default()
            );
        } else if failed {
            eprintln!("  {} {tool}", self.red.apply_to("✗"));
            eprintln!("{}", result_text(result));
        } else {
            println!("  {} {tool}", self.green.apply_to("✓"));
            println!("{}", result_text(result));
        }

        if let Some(stage) = result
            .pointer("/structuredContent/job/stage")
            .and_then(Value::as_str)
        {
            eprintln!("{}", self.dim.apply_to(format!("  stage: {stage}")));
        }
        failed
    }
}

pub fn is_error(result: &Value) -> bool {
    result
        .get("isError")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// First text block of a tool result.
pub fn result_text(result: &Value) -> &str {
    result
        .get("content")
        .and_then(Value::as_array)
        .and_then(|blocks| blocks.first())
        .and_then(|block| block.get("text"))
        .and_then(Value::as_str)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_text_and_error_flag() {
        let ok = json!({
            "content": [{"type": "text", "text": "Saved out/a.png"}],
            "structuredContent": {},
            "isError": false
        });
        assert!(!is_error(&ok));
        assert_eq!(result_text(&ok), "Saved out/a.png");

        let failed = crate::tools::error_result("timeout", "gave up", None);
        assert!(is_error(&failed));
        assert_eq!(result_text(&failed), "Error: gave up");
    }

    #[test]
    fn missing_fields_are_tolerated() {
        assert!(!is_error(&json!({})));
        assert_eq!(result_text(&json!({"content": []})), "");
    }
}
