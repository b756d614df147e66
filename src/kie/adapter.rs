//! Status vocabularies of the three kie.ai job surfaces.
//!
//! Each adapter turns one [`Envelope`] into a [`PollStep`]. Unrecognized
//! intermediate states always map to [`PollStep::Continue`] so that a new
//! upstream state never aborts a job that is still running.

use serde_json::Value;
use tracing::debug;

use super::types::{Envelope, JobRecord, JobResult, SunoRecord, SunoTrack, VeoRecord};
use crate::poller::{PollStep, StatusAdapter};

pub const JOBS_STATUS_PATH: &str = "/api/v1/jobs/recordInfo";
pub const VEO_STATUS_PATH: &str = "/api/v1/veo/record-info";
pub const SUNO_STATUS_PATH: &str = "/api/v1/generate/record-info";

fn rejected<T>(envelope: &Envelope) -> PollStep<T> {
    let message = match envelope.message() {
        "" => "no message".to_string(),
        msg => msg.to_string(),
    };
    PollStep::Rejected {
        code: envelope.code,
        message,
    }
}

fn fail_code_text(code: &Value) -> String {
    match code.as_str() {
        Some(s) => s.to_string(),
        None => code.to_string(),
    }
}

/// Market jobs API (`/api/v1/jobs/*`): image, sound effect and speech models.
///
/// `state` is one of `waiting`, `queuing`, `generating`, `success`, `fail`.
/// On success the URLs sit inside `resultJson`, a string that has to be
/// parsed a second time.
#[derive(Debug, Clone, Copy, Default)]
pub struct JobsAdapter;

impl StatusAdapter for JobsAdapter {
    type Payload = String;

    fn name(&self) -> &'static str {
        "jobs"
    }

    fn status_path(&self) -> &'static str {
        JOBS_STATUS_PATH
    }

    fn classify(&self, envelope: &Envelope) -> PollStep<String> {
        if !envelope.is_ok() {
            return rejected(envelope);
        }
        let Some(record) = envelope.record::<JobRecord>() else {
            return PollStep::Continue;
        };

        match record.state.as_deref() {
            Some("success") => {
                let Some(raw) = record.result_json.as_deref() else {
                    return PollStep::Failure("job succeeded without resultJson".into());
                };
                match serde_json::from_str::<JobResult>(raw) {
                    Ok(result) => match result.result_urls.into_iter().next() {
                        Some(url) => PollStep::Success(url),
                        None => PollStep::Failure("job succeeded without result URLs".into()),
                    },
                    Err(e) => PollStep::Failure(format!("unreadable resultJson: {e}")),
                }
            }
            Some("fail") => {
                let message = record
                    .fail_msg
                    .filter(|m| !m.is_empty())
                    .or_else(|| {
                        record
                            .fail_code
                            .map(|c| format!("failure code {}", fail_code_text(&c)))
                    })
                    .unwrap_or_else(|| "generation job failed".to_string());
                PollStep::Failure(message)
            }
            Some("waiting" | "queuing" | "generating") | None => PollStep::Continue,
            Some(other) => {
                debug!(state = other, "unrecognized jobs state, continuing");
                PollStep::Continue
            }
        }
    }
}

/// Veo video API.
///
/// Success is `successFlag == 1` with a non-empty `response.resultUrls`.
/// Either `errorCode` or `errorMessage` on its own signals failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct VeoAdapter;

/// Envelope code the Veo status endpoint uses while a record is still being produced.
const VEO_PROCESSING_CODE: i64 = 400;
const VEO_PROCESSING_MARKER: &str = "processing";

impl VeoAdapter {
    /// Veo answers some in-flight queries with a 400 envelope whose message
    /// mentions processing. This matches free text, so keep it here only.
    pub fn is_still_processing(envelope: &Envelope) -> bool {
        envelope.code == VEO_PROCESSING_CODE
            && envelope
                .message()
                .to_lowercase()
                .contains(VEO_PROCESSING_MARKER)
    }
}

impl StatusAdapter for VeoAdapter {
    type Payload = Vec<String>;

    fn name(&self) -> &'static str {
        "veo"
    }

    fn status_path(&self) -> &'static str {
        VEO_STATUS_PATH
    }

    fn classify(&self, envelope: &Envelope) -> PollStep<Vec<String>> {
        if Self::is_still_processing(envelope) {
            return PollStep::Continue;
        }
        if !envelope.is_ok() {
            return rejected(envelope);
        }
        let Some(record) = envelope.record::<VeoRecord>() else {
            return PollStep::Continue;
        };

        let urls = record
            .response
            .and_then(|r| r.result_urls)
            .unwrap_or_default();
        if record.success_flag == Some(1) && !urls.is_empty() {
            return PollStep::Success(urls);
        }

        let message = record.error_message.filter(|m| !m.is_empty());
        match (record.error_code, message) {
            (None, None) => PollStep::Continue,
            (_, Some(message)) => PollStep::Failure(message),
            (Some(code), None) => {
                PollStep::Failure(format!("video generation failed (error code {code})"))
            }
        }
    }
}

/// Suno music API.
///
/// `SUCCESS` is terminal, `FAILED` and `ERROR` are failures. `PENDING`,
/// `TEXT_SUCCESS` and `FIRST_SUCCESS` are partial progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct SunoAdapter;

impl StatusAdapter for SunoAdapter {
    type Payload = SunoTrack;

    fn name(&self) -> &'static str {
        "suno"
    }

    fn status_path(&self) -> &'static str {
        SUNO_STATUS_PATH
    }

    fn classify(&self, envelope: &Envelope) -> PollStep<SunoTrack> {
        if !envelope.is_ok() {
            return rejected(envelope);
        }
        let Some(record) = envelope.record::<SunoRecord>() else {
            return PollStep::Continue;
        };

        match record.status.as_deref() {
            Some("SUCCESS") => {
                match record.response.and_then(|r| r.suno_data.into_iter().next()) {
                    Some(track) => PollStep::Success(track),
                    None => PollStep::Failure("music generation succeeded without tracks".into()),
                }
            }
            Some(status @ ("FAILED" | "ERROR")) => PollStep::Failure(
                record
                    .error_message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| format!("music generation ended with status {status}")),
            ),
            Some("PENDING" | "TEXT_SUCCESS" | "FIRST_SUCCESS") | None => PollStep::Continue,
            Some(other) => {
                debug!(status = other, "unrecognized suno status, continuing");
                PollStep::Continue
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn env(value: Value) -> Envelope {
        serde_json::from_value(value).unwrap()
    }

    // --- jobs ---

    #[test]
    fn jobs_intermediate_states_continue() {
        for state in ["waiting", "queuing", "generating", "brand_new_state"] {
            let step = JobsAdapter.classify(&env(json!({"code": 200, "data": {"state": state}})));
            assert_eq!(step, PollStep::Continue, "{state}");
        }
    }

    #[test]
    fn jobs_success_takes_first_url() {
        let step = JobsAdapter.classify(&env(json!({"code": 200, "data": {
            "state": "success",
            "resultJson": "{\"resultUrls\":[\"https://a\",\"https://b\"]}"
        }})));
        assert_eq!(step, PollStep::Success("https://a".to_string()));
    }

    #[test]
    fn jobs_success_without_urls_fails() {
        let step = JobsAdapter.classify(&env(json!({"code": 200, "data": {
            "state": "success",
            "resultJson": "{\"resultUrls\":[]}"
        }})));
        assert!(matches!(step, PollStep::Failure(_)));
    }

    #[test]
    fn jobs_fail_falls_back_to_code() {
        let step = JobsAdapter.classify(&env(json!({"code": 200, "data": {
            "state": "fail", "failMsg": "", "failCode": "501"
        }})));
        assert_eq!(step, PollStep::Failure("failure code 501".into()));

        let step = JobsAdapter.classify(&env(json!({"code": 200, "data": {
            "state": "fail", "failCode": 422
        }})));
        assert_eq!(step, PollStep::Failure("failure code 422".into()));
    }

    #[test]
    fn jobs_missing_data_continues() {
        let step = JobsAdapter.classify(&env(json!({"code": 200, "data": null})));
        assert_eq!(step, PollStep::Continue);
    }

    // --- veo ---

    #[test]
    fn veo_flag_without_urls_continues() {
        let step = VeoAdapter.classify(&env(json!({"code": 200, "data": {
            "successFlag": 1, "response": {"resultUrls": []}
        }})));
        assert_eq!(step, PollStep::Continue);
    }

    #[test]
    fn veo_error_code_alone_fails() {
        let step = VeoAdapter.classify(&env(json!({"code": 200, "data": {
            "successFlag": 2, "errorCode": 422
        }})));
        assert_eq!(
            step,
            PollStep::Failure("video generation failed (error code 422)".into())
        );
    }

    #[test]
    fn veo_null_error_fields_continue() {
        let step = VeoAdapter.classify(&env(json!({"code": 200, "data": {
            "successFlag": 0, "errorCode": null, "errorMessage": null
        }})));
        assert_eq!(step, PollStep::Continue);
    }

    #[test]
    fn veo_processing_shim_requires_code_and_text() {
        assert!(VeoAdapter::is_still_processing(&env(
            json!({"code": 400, "msg": "Video is PROCESSING"})
        )));
        assert!(!VeoAdapter::is_still_processing(&env(
            json!({"code": 500, "msg": "processing"})
        )));
        assert!(!VeoAdapter::is_still_processing(&env(
            json!({"code": 400, "msg": "bad prompt"})
        )));

        let step = VeoAdapter.classify(&env(json!({"code": 400, "msg": "bad prompt"})));
        assert_eq!(
            step,
            PollStep::Rejected {
                code: 400,
                message: "bad prompt".into()
            }
        );
    }

    // --- suno ---

    #[test]
    fn suno_partial_states_continue() {
        for status in ["PENDING", "TEXT_SUCCESS", "FIRST_SUCCESS", "CALLBACK_PENDING"] {
            let step = SunoAdapter.classify(&env(json!({"code": 200, "data": {"status": status}})));
            assert_eq!(step, PollStep::Continue, "{status}");
        }
    }

    #[test]
    fn suno_failure_uses_error_message() {
        let step = SunoAdapter.classify(&env(json!({"code": 200, "data": {
            "status": "FAILED", "errorMessage": "lyrics flagged"
        }})));
        assert_eq!(step, PollStep::Failure("lyrics flagged".into()));

        let step = SunoAdapter.classify(&env(json!({"code": 200, "data": {"status": "ERROR"}})));
        assert_eq!(
            step,
            PollStep::Failure("music generation ended with status ERROR".into())
        );
    }

    #[test]
    fn suno_success_with_empty_list_fails() {
        let step = SunoAdapter.classify(&env(json!({"code": 200, "data": {
            "status": "SUCCESS", "response": {"sunoData": []}
        }})));
        assert!(matches!(step, PollStep::Failure(_)));
    }

    #[test]
    fn rejected_envelope_without_message() {
        let step = SunoAdapter.classify(&env(json!({"code": 500})));
        assert_eq!(
            step,
            PollStep::Rejected {
                code: 500,
                message: "no message".into()
            }
        );

        let step = JobsAdapter.classify(&env(json!({"code": 402, "msg": "Credits insufficient"})));
        assert_eq!(
            step,
            PollStep::Rejected {
                code: 402,
                message: "Credits insufficient".into()
            }
        );
    }
}
