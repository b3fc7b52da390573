use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::{
    AppState,
    models::{common::RelayOutcome, relay::RelayRequest},
    services::{
        gemini::{RelayError, generate_content},
        instructions::{Instruction, fetch_instruction},
    },
    utils::{generate_content_url, resolve_model},
};

pub mod payload;

/// Runs one relay request to completion and folds every failure into the
/// error outcome. All per-call state lives in `req`.
pub async fn dispatch_relay(req: RelayRequest, state: &AppState) -> RelayOutcome {
    match run_pipeline(req, state).await {
        Ok(data) => RelayOutcome::Success { data },
        Err(e) => {
            error!("Relay failed: {}", e);
            RelayOutcome::Error {
                error: e.to_string(),
            }
        }
    }
}

async fn run_pipeline(req: RelayRequest, state: &AppState) -> Result<Value, RelayError> {
    let RelayRequest {
        config: machine,
        settings,
        messages,
    } = req;

    let instruction =
        fetch_instruction(&state.http, &machine, &state.cfg.fallback_instruction).await;
    match &instruction {
        Instruction::Fetched(_) => info!("Instruction fetched successfully"),
        Instruction::Defaulted { reason, .. } => {
            warn!("Instruction fetch failed ({reason}), using default instruction")
        }
    }
    debug!("Instruction: {}", instruction.text());

    let model = resolve_model(&machine, &settings);
    debug!("Fallback model is {}, using {}", machine.fallback_llm, model);
    let url = generate_content_url(&machine, model, &settings.token)?;

    info!("Relaying {} message(s) to {}", messages.len(), model);
    let body = payload::build_payload(instruction.into_text(), &settings, messages);
    debug!(
        "Final API payload: {}",
        serde_json::to_string(&body).unwrap_or_default()
    );

    generate_content(&state.http, url, &body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        models::relay::{LlmSettings, MachineConfig, Message},
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    const API_PATH: &str = "/v1beta/models/gemini-fallback:generateContent";

    fn state() -> AppState {
        AppState {
            cfg: Config::default(),
            http: reqwest::Client::new(),
        }
    }

    fn request(server: &MockServer, settings: LlmSettings, messages: Vec<Message>) -> RelayRequest {
        RelayRequest {
            config: MachineConfig {
                server: server.uri(),
                instructions_file: "machine.txt".to_string(),
                fallback_llm: "gemini-fallback".to_string(),
                api_url: format!("{}/v1beta/models/", server.uri()),
            },
            settings: LlmSettings {
                token: "test-key".to_string(),
                ..settings
            },
            messages,
        }
    }

    async fn mount_instruction(server: &MockServer, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path("/machine.txt"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    async fn mount_api(server: &MockServer, api_path: &str, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(api_path))
            .and(query_param("key", "test-key"))
            .respond_with(response)
            .expect(1)
            .mount(server)
            .await;
    }

    async fn sent_body(server: &MockServer) -> Value {
        let requests: Vec<Request> = server.received_requests().await.unwrap();
        let post = requests
            .iter()
            .find(|r| r.method.as_str() == "POST")
            .expect("model API was not called");
        serde_json::from_slice(&post.body).unwrap()
    }

    fn candidate_response() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"role": "model", "content": {"parts": [{"text": "hi"}]}}]
        }))
    }

    #[tokio::test]
    async fn success_relays_first_candidate() {
        let server = MockServer::start().await;
        mount_instruction(&server, 200, "Be brief.\n").await;
        mount_api(&server, API_PATH, candidate_response()).await;

        let outcome = dispatch_relay(
            request(&server, LlmSettings::default(), vec![Message::text("user", "hello")]),
            &state(),
        )
        .await;

        assert_eq!(
            outcome,
            RelayOutcome::Success {
                data: json!({"role": "model", "content": {"parts": [{"text": "hi"}]}})
            }
        );
        let body = sent_body(&server).await;
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be brief.");
        assert_eq!(
            body["contents"],
            json!([[{"role": "user", "parts": [{"text": "hello"}]}]])
        );
    }

    #[tokio::test]
    async fn failed_instruction_fetch_still_calls_api_with_default() {
        let server = MockServer::start().await;
        mount_instruction(&server, 404, "missing").await;
        mount_api(&server, API_PATH, candidate_response()).await;

        let outcome = dispatch_relay(request(&server, LlmSettings::default(), Vec::new()), &state()).await;

        assert!(outcome.is_success());
        let body = sent_body(&server).await;
        assert_eq!(
            body["systemInstruction"],
            json!({"role": "developer", "parts": [{"text": "You are a helpful assistant."}]})
        );
        assert_eq!(
            body["contents"],
            json!([{"role": "user", "parts": [{"text": "What model are you?"}]}])
        );
    }

    #[tokio::test]
    async fn settings_model_is_used_in_url() {
        let server = MockServer::start().await;
        mount_instruction(&server, 200, "x").await;
        mount_api(
            &server,
            "/v1beta/models/gemini-custom:generateContent",
            candidate_response(),
        )
        .await;

        let settings = LlmSettings {
            model: Some("gemini-custom".to_string()),
            ..Default::default()
        };
        let outcome = dispatch_relay(request(&server, settings, Vec::new()), &state()).await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn rate_limit_is_reported_with_json_details() {
        let server = MockServer::start().await;
        mount_instruction(&server, 200, "x").await;
        mount_api(
            &server,
            API_PATH,
            ResponseTemplate::new(429).set_body_json(json!({"error": "rate limited"})),
        )
        .await;

        let outcome = dispatch_relay(request(&server, LlmSettings::default(), Vec::new()), &state()).await;

        let error = match outcome {
            RelayOutcome::Error { error } => error,
            other => panic!("expected error outcome, got {other:?}"),
        };
        assert!(error.contains("API Error: 429"), "{error}");
        assert!(error.contains(r#"{"error":"rate limited"}"#), "{error}");
    }

    #[tokio::test]
    async fn plain_text_error_body_is_kept() {
        let server = MockServer::start().await;
        mount_instruction(&server, 200, "x").await;
        mount_api(
            &server,
            API_PATH,
            ResponseTemplate::new(500).set_body_string("upstream exploded"),
        )
        .await;

        let outcome = dispatch_relay(request(&server, LlmSettings::default(), Vec::new()), &state()).await;
        assert_eq!(
            outcome,
            RelayOutcome::Error {
                error: "API Error: 500 - upstream exploded".to_string()
            }
        );
    }

    #[tokio::test]
    async fn malformed_response_json_is_an_error() {
        let server = MockServer::start().await;
        mount_instruction(&server, 200, "x").await;
        mount_api(
            &server,
            API_PATH,
            ResponseTemplate::new(200).set_body_string("not json"),
        )
        .await;

        let outcome = dispatch_relay(request(&server, LlmSettings::default(), Vec::new()), &state()).await;
        assert!(matches!(outcome, RelayOutcome::Error { ref error } if error.starts_with("json error")));
    }

    #[tokio::test]
    async fn empty_candidates_is_an_error() {
        let server = MockServer::start().await;
        mount_instruction(&server, 200, "x").await;
        mount_api(
            &server,
            API_PATH,
            ResponseTemplate::new(200).set_body_json(json!({"candidates": []})),
        )
        .await;

        let outcome = dispatch_relay(request(&server, LlmSettings::default(), Vec::new()), &state()).await;
        assert_eq!(
            outcome,
            RelayOutcome::Error {
                error: "API response contained no candidates".to_string()
            }
        );
    }

    #[tokio::test]
    async fn unreachable_api_is_an_error() {
        let server = MockServer::start().await;
        mount_instruction(&server, 200, "x").await;

        let mut req = request(&server, LlmSettings::default(), Vec::new());
        req.config.api_url = "http://127.0.0.1:9/models/".to_string();

        let outcome = dispatch_relay(req, &state()).await;
        assert!(matches!(outcome, RelayOutcome::Error { ref error } if error.starts_with("request error")));
    }
}
