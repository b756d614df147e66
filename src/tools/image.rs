use serde_json::{Value, json};

use super::{OutputArgs, generation_result, media_error, one_of, required_str, string_list};
use crate::error::MediaError;
use crate::kie::JobsAdapter;
use crate::mcp::contracts::TOOL_GENERATE_IMAGE;
use crate::media::MediaKind;
use crate::orchestrator::{Generation, Orchestrator, Submission};

pub const MODEL: &str = "nano-banana-pro";

pub const ASPECT_RATIOS: &[&str] = &[
    "1:1", "2:3", "3:2", "3:4", "4:3", "4:5", "5:4", "9:16", "16:9", "21:9", "auto",
];
pub const RESOLUTIONS: &[&str] = &["1K", "2K", "4K"];

/// Reference images accepted by the model.
const MAX_IMAGE_INPUTS: usize = 8;

pub async fn call(orch: &Orchestrator, args: &Value) -> Value {
    let generation = match build(args) {
        Ok(generation) => generation,
        Err(err) => return media_error(TOOL_GENERATE_IMAGE, &err),
    };
    let result = orch
        .generate(generation, &JobsAdapter, orch.config().poll.jobs)
        .await;
    generation_result(TOOL_GENERATE_IMAGE, result)
}

fn build(args: &Value) -> Result<Generation, MediaError> {
    let prompt = required_str(args, "prompt")?;
    let aspect_ratio = one_of(args, "aspect_ratio", ASPECT_RATIOS, "1:1")?;
    let resolution = one_of(args, "resolution", RESOLUTIONS, "1K")?;
    let image_urls = string_list(args, "image_urls")?.unwrap_or_default();
    if image_urls.len() > MAX_IMAGE_INPUTS {
        return Err(MediaError::InvalidInput(format!(
            "at most {MAX_IMAGE_INPUTS} reference images are supported"
        )));
    }
    let output = OutputArgs::parse(args)?;

    Ok(Generation {
        tool: TOOL_GENERATE_IMAGE,
        kind: MediaKind::Image,
        output_name: output.output_name,
        submission: Submission::Task {
            model: MODEL.to_string(),
            input: json!({
                "prompt": prompt,
                "image_input": image_urls,
                "aspect_ratio": aspect_ratio,
                "resolution": resolution,
                "output_format": "png",
            }),
        },
        save_to_catalog: output.save_to_catalog,
        description: output.description.unwrap_or(prompt),
    })
}

#[cfg(test)]
mod tests {
    use reqwest::Client;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::{MediaConfig, PollLimits};

    #[test]
    fn defaults_fill_request() {
        let generation = build(&json!({"prompt": "a fox"})).unwrap();
        let Submission::Task { model, input } = generation.submission else {
            panic!("expected a jobs submission");
        };
        assert_eq!(model, "nano-banana-pro");
        assert_eq!(input["aspect_ratio"], json!("1:1"));
        assert_eq!(input["resolution"], json!("1K"));
        assert_eq!(input["image_input"], json!([]));
        assert_eq!(generation.description, "a fox");
        assert!(generation.save_to_catalog);
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(build(&json!({})).is_err());
        assert!(build(&json!({"prompt": "x", "aspect_ratio": "7:3"})).is_err());
        assert!(build(&json!({"prompt": "x", "resolution": "8K"})).is_err());
    }

    #[tokio::test]
    async fn red_cube_end_to_end() {
        let server = MockServer::start().await;
        let remote_url = format!("{}/files/red-cube.png", server.uri());

        Mock::given(method("POST"))
            .and(path("/api/v1/jobs/createTask"))
            .and(body_partial_json(json!({
                "model": "nano-banana-pro",
                "input": {
                    "prompt": "a red cube on a white background",
                    "aspect_ratio": "1:1",
                    "resolution": "1K"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200, "msg": "success", "data": {"taskId": "img-1"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        // Two in-progress answers, then success on the third query.
        Mock::given(method("GET"))
            .and(path("/api/v1/jobs/recordInfo"))
            .and(query_param("taskId", "img-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200, "data": {"state": "generating"}
            })))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/jobs/recordInfo"))
            .and(query_param("taskId", "img-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200, "data": {
                    "state": "success",
                    "resultJson": json!({"resultUrls": [remote_url]}).to_string()
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/files/red-cube.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x89PNG fake".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = MediaConfig {
            api_key: "kie-test".into(),
            api_base_url: server.uri(),
            output_dir: dir.path().to_path_buf(),
            ..MediaConfig::default()
        };
        config.poll.jobs = PollLimits {
            max_attempts: 5,
            interval_ms: 1,
        };
        let orch = Orchestrator::new(config, Client::new());

        let result = call(
            &orch,
            &json!({
                "prompt": "a red cube on a white background",
                "output_name": "red_cube"
            }),
        )
        .await;

        assert_eq!(result["isError"], json!(false), "{result}");
        let structured = &result["structuredContent"];
        let local_path = structured["local_path"].as_str().unwrap();
        assert!(local_path.ends_with("red_cube.png"));
        assert_eq!(structured["remote_url"], json!(remote_url));
        assert_eq!(structured["job"]["poll_attempts"], json!(3));
        assert_eq!(structured["job"]["stage"], json!("done"));
        assert_eq!(std::fs::read(local_path).unwrap(), b"\x89PNG fake");
    }
}
