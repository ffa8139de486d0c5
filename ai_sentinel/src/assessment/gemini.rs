use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Instant;
use url::Url;

use super::AssessmentService;
use super::prompt::{SYSTEM_INSTRUCTION, build_prompt, response_schema};
use crate::analysis::{ScenarioAnalysis, decode_analysis};
use crate::{AnalyzerError, AssessmentConfig};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiService {
    client: Client,
    generate_url: Url,
    model: String,
    api_key: String,
}

impl std::fmt::Debug for GeminiService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiService")
            .field("generate_url", &self.generate_url.as_str())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiService {
    /// Build a client for `config`, authenticating with `api_key`.
    pub fn new(config: &AssessmentConfig, api_key: impl Into<String>) -> Result<Self> {
        let generate_url = generate_content_url(&config.endpoint, &config.model)?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            generate_url,
            model: config.model.clone(),
            api_key: api_key.into(),
        })
    }

    /// Build a client from configuration, failing fast when no credential is set.
    pub fn from_config(config: &AssessmentConfig) -> Result<Self, AnalyzerError> {
        let api_key = config.credential()?;
        Self::new(config, api_key).map_err(AnalyzerError::ServiceFailure)
    }

    fn request_body(scenario: &str) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": build_prompt(scenario) }]
            }],
            "systemInstruction": {
                "parts": [{ "text": SYSTEM_INSTRUCTION }]
            },
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        })
    }
}

#[async_trait]
impl AssessmentService for GeminiService {
    fn provider_id(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn assess(&self, scenario: &str) -> Result<ScenarioAnalysis> {
        let started = Instant::now();
        crate::log_debug!("Requesting assessment from {} ({} chars)", self.model, scenario.chars().count());

        let response = self
            .client
            .post(self.generate_url.clone())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&Self::request_body(scenario))
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to call Gemini generateContent endpoint")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gemini request failed with {}: {}", status, body));
        }

        let payload: Value = response
            .json()
            .await
            .context("Failed to parse Gemini response JSON")?;
        let text = response_text(&payload)
            .ok_or_else(|| anyhow!("Gemini response carried no text payload"))?;

        let analysis = decode_analysis(&text)?;
        crate::log_info!(
            "Assessment received: risk={} threats={} recommendations={} elapsed_ms={}",
            analysis.risk_level,
            analysis.threats.len(),
            analysis.recommendations.len(),
            started.elapsed().as_millis()
        );
        Ok(analysis)
    }
}

fn generate_content_url(endpoint: &str, model: &str) -> Result<Url> {
    let mut url = Url::parse(endpoint)
        .with_context(|| format!("Invalid assessment endpoint: {endpoint}"))?;
    let method = format!("{model}:generateContent");
    url.path_segments_mut()
        .map_err(|_| anyhow!("Assessment endpoint cannot be a base URL: {endpoint}"))?
        .pop_if_empty()
        .extend(["v1beta", "models", method.as_str()]);
    Ok(url)
}

/// Concatenated text parts of the first candidate, if any non-blank text exists.
fn response_text(payload: &Value) -> Option<String> {
    let parts = payload
        .get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RiskLevel;
    use crate::config::create_default_config;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn service_for(server: &MockServer) -> GeminiService {
        let mut config = create_default_config().assessment;
        config.endpoint = server.uri();
        GeminiService::new(&config, "test-key").unwrap()
    }

    fn candidate_with_text(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        })
    }

    #[tokio::test]
    async fn sends_schema_constrained_request_and_decodes_reply() {
        let server = MockServer::start().await;
        let analysis_json = r#"{"riskLevel":"MEDIUM","summary":"s","threats":[{"title":"t","description":"d"}],"recommendations":[{"title":"r","action":"a"}]}"#;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header(API_KEY_HEADER, "test-key"))
            .and(body_partial_json(json!({
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": {
                        "required": ["riskLevel", "summary", "threats", "recommendations"]
                    }
                },
                "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_with_text(analysis_json)))
            .expect(1)
            .mount(&server)
            .await;

        let analysis = service_for(&server).assess("upload contracts").await.unwrap();
        assert_eq!(analysis.risk_level, RiskLevel::Medium);
        assert_eq!(analysis.threats[0].description, "d");
        assert_eq!(analysis.recommendations[0].action, "a");
    }

    #[tokio::test]
    async fn joins_split_text_parts() {
        let server = MockServer::start().await;
        let body = json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "{\"riskLevel\":\"LOW\",\"summary\":\"ok\"," },
                    { "text": "\"threats\":[],\"recommendations\":[]}" }
                ]}
            }]
        });
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let analysis = service_for(&server).assess("x").await.unwrap();
        assert_eq!(analysis.risk_level, RiskLevel::Low);
        assert!(analysis.threats.is_empty());
    }

    #[tokio::test]
    async fn error_status_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = service_for(&server).assess("x").await.unwrap_err();
        assert!(format!("{err:#}").contains("503"));
    }

    #[tokio::test]
    async fn missing_or_blank_text_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_with_text("  ")))
            .mount(&server)
            .await;

        let service = service_for(&server);
        assert!(service.assess("x").await.is_err());
        assert!(service.assess("x").await.is_err());
    }

    #[tokio::test]
    async fn key_stays_out_of_url_and_transport_errors() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let mut config = create_default_config().assessment;
        config.endpoint = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let service = GeminiService::new(&config, "SECRET-KEY-123").unwrap();
        assert!(!service.generate_url.as_str().contains("SECRET-KEY-123"));
        assert!(!format!("{service:?}").contains("SECRET-KEY-123"));

        let err = service.assess("x").await.unwrap_err();
        assert!(!format!("{err:#}").contains("SECRET-KEY-123"));
        assert!(!format!("{err:?}").contains("SECRET-KEY-123"));
    }

    #[test]
    fn url_keeps_endpoint_prefix() {
        let url = generate_content_url("https://proxy.example.com/gemini/", "gemini-2.5-flash").unwrap();
        assert_eq!(
            url.as_str(),
            "https://proxy.example.com/gemini/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert!(generate_content_url("not a url", "m").is_err());
    }

    #[test]
    fn from_config_requires_credential() {
        let config = create_default_config().assessment;
        assert!(matches!(
            GeminiService::from_config(&config),
            Err(AnalyzerError::ConfigurationMissing)
        ));
    }
}
