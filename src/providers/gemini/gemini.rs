use crate::config::ProviderConfig;
use crate::providers::traits::{CompletionProvider, InlineImage};
use crate::providers::utils::encode_base64;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiProvider {
    api_key: String,
    client: Client,
    api_url: String,
    model: String,
    temperature: f32,
}

impl GeminiProvider {
    /// Probes the configured candidate models in order and binds to the
    /// first one the API reports as available.
    pub async fn connect(api_key: String, config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        for model in &config.models {
            match probe_model(&client, &config.api_url, &api_key, model).await {
                Ok(()) => {
                    tracing::info!(model = %model, "Gemini model selected");
                    return Ok(Self {
                        api_key,
                        client,
                        api_url: config.api_url.clone(),
                        model: model.clone(),
                        temperature: config.temperature,
                    });
                }
                Err(e) => {
                    tracing::warn!(model = %model, error = %e, "Gemini model unavailable, trying next candidate");
                }
            }
        }

        Err(anyhow!(
            "No Gemini model available (tried: {})",
            config.models.join(", ")
        ))
    }

    fn build_body(&self, prompt: &str, image: Option<&InlineImage>) -> Value {
        let mut parts = vec![json!({ "text": prompt })];

        if let Some(image) = image {
            parts.push(json!({
                "inline_data": {
                    "mime_type": image.mime_type,
                    "data": encode_base64(&image.data)
                }
            }));
        }

        json!({
            "contents": [{
                "role": "user",
                "parts": parts
            }],
            "generationConfig": {
                "temperature": self.temperature
            }
        })
    }
}

async fn probe_model(client: &Client, api_url: &str, api_key: &str, model: &str) -> Result<()> {
    let response = client
        .get(format!("{}/models/{}", api_url, model))
        .header(API_KEY_HEADER, api_key)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(anyhow!("model probe returned status {}", status));
    }
    Ok(())
}

fn extract_text(response_json: &Value) -> Result<String> {
    if let Some(error) = response_json.get("error") {
        return Err(anyhow!("API returned error: {}", error));
    }

    let parts = response_json
        .get("candidates")
        .and_then(|candidates| candidates.get(0))
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.as_array())
        .ok_or_else(|| {
            let debug_json = serde_json::to_string_pretty(response_json).unwrap_or_default();
            anyhow!("Invalid response format. Response JSON: {}", debug_json)
        })?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.trim().is_empty() {
        return Err(anyhow!("Gemini response contained no text"));
    }
    Ok(text)
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, prompt: &str, image: Option<&InlineImage>) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.api_url, self.model))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&self.build_body(prompt, image))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(anyhow!("API request failed: Status {}, Body: {}", status, error_text));
        }

        let response_json: Value = response.json().await?;
        extract_text(&response_json)
    }

    async fn get_model_info(&self) -> Result<String> {
        Ok(self.model.clone())
    }

    fn clone_box(&self) -> Box<dyn CompletionProvider + Send + Sync> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer, models: &[&str]) -> ProviderConfig {
        ProviderConfig {
            models: models.iter().map(|m| m.to_string()).collect(),
            api_url: server.uri(),
            temperature: 0.4,
            timeout_secs: 5,
        }
    }

    fn text_response(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] }
            }]
        })
    }

    #[tokio::test]
    async fn test_connect_picks_first_available_model() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models/retired-model"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/models/gemini-1.5-flash"))
            .and(header(API_KEY_HEADER, "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "models/gemini-1.5-flash" })))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server, &["retired-model", "gemini-1.5-flash", "never-probed"]);
        let provider = GeminiProvider::connect("secret".to_string(), &config).await.unwrap();
        assert_eq!(provider.get_model_info().await.unwrap(), "gemini-1.5-flash");
    }

    #[tokio::test]
    async fn test_connect_fails_when_no_model_available() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let config = config_for(&server, &["a", "b"]);
        let err = GeminiProvider::connect("secret".to_string(), &config)
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("tried: a, b"));
    }

    #[tokio::test]
    async fn test_complete_sends_inline_image() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models/gemini-1.5-flash"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-flash:generateContent"))
            .and(body_partial_json(json!({
                "contents": [{
                    "parts": [
                        { "text": "describe" },
                        { "inline_data": { "mime_type": "image/png", "data": "cGxhdGU=" } }
                    ]
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("{\"total_cals\": 1}")))
            .expect(1)
            .mount(&server)
            .await;

        let provider = GeminiProvider::connect("secret".to_string(), &config_for(&server, &["gemini-1.5-flash"]))
            .await
            .unwrap();
        let image = InlineImage {
            mime_type: "image/png".to_string(),
            data: b"plate".to_vec(),
        };
        let text = provider.complete("describe", Some(&image)).await.unwrap();
        assert_eq!(text, "{\"total_cals\": 1}");
    }

    #[tokio::test]
    async fn test_complete_surfaces_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let provider = GeminiProvider::connect("secret".to_string(), &config_for(&server, &["m"]))
            .await
            .unwrap();
        let err = provider.complete("hi", None).await.unwrap_err();
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("overloaded"));
    }

    #[tokio::test]
    async fn test_transport_errors_do_not_carry_the_key() {
        let client = Client::new();
        let err = probe_model(&client, "http://127.0.0.1:1", "SUPERSECRETKEY", "m")
            .await
            .unwrap_err();
        assert!(!format!("{:#}", err).contains("SUPERSECRETKEY"));

        let provider = GeminiProvider {
            api_key: "SUPERSECRETKEY".to_string(),
            client,
            api_url: "http://127.0.0.1:1".to_string(),
            model: "m".to_string(),
            temperature: 0.4,
        };
        let err = provider.complete("hi", None).await.unwrap_err();
        assert!(!format!("{:#}", err).contains("SUPERSECRETKEY"));
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"a\":" }, { "text": " 1}" }] } }]
        });
        assert_eq!(extract_text(&body).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_text_rejects_error_payload() {
        let body = json!({ "error": { "code": 400, "message": "bad key" } });
        assert!(extract_text(&body).unwrap_err().to_string().contains("bad key"));
    }
}
