// Gemini API client

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Text returned by a structured generation call. `None` when the model sent no text parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedText {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOptions {
    pub aspect_ratio: String,
}

impl ImageOptions {
    pub fn square() -> Self {
        Self {
            aspect_ratio: "1:1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResponse {
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub data: String,
}

/// The two generative capabilities the app consumes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiProvider: Send + Sync {
    async fn generate_text(&self, prompt: &str, schema: &Value) -> Result<GeneratedText>;

    async fn generate_image(&self, prompt: &str, options: &ImageOptions) -> Result<ImageResponse>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: Value,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

impl GenerateContentResponse {
    fn into_first_parts(self) -> Vec<ContentPart> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts)
            .unwrap_or_default()
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    text_model: String,
    image_model: String,
    client: Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(
        base_url: String,
        api_key: String,
        text_model: String,
        image_model: String,
        request_timeout: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(request_timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            text_model,
            image_model,
            client,
        })
    }

    pub fn from_config(config: &crate::models::AppConfig, api_key: String) -> Result<Self> {
        Self::new(
            config.base_url.clone(),
            api_key,
            config.text_model.clone(),
            config.image_model.clone(),
            config.request_timeout,
        )
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }

    async fn generate_content(
        &self,
        model: &str,
        prompt: &str,
        generation_config: Value,
    ) -> Result<Vec<ContentPart>> {
        let url = self.endpoint(model);
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config,
        };

        tracing::debug!(model, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send generateContent request")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("API request failed with status {status}: {text}");
        }

        let result = response
            .json::<GenerateContentResponse>()
            .await
            .context("Failed to parse generateContent response")?;

        Ok(result.into_first_parts())
    }
}

#[async_trait]
impl AiProvider for GeminiClient {
    async fn generate_text(&self, prompt: &str, schema: &Value) -> Result<GeneratedText> {
        let config = serde_json::json!({
            "responseMimeType": "application/json",
            "responseSchema": schema,
        });
        let parts = self
            .generate_content(&self.text_model, prompt, config)
            .await?;

        let texts: Vec<String> = parts.into_iter().filter_map(|part| part.text).collect();
        let text = if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        };

        Ok(GeneratedText { text })
    }

    async fn generate_image(&self, prompt: &str, options: &ImageOptions) -> Result<ImageResponse> {
        let config = serde_json::json!({ "imageConfig": options });
        let parts = self
            .generate_content(&self.image_model, prompt, config)
            .await?;

        Ok(ImageResponse { parts })
    }
}
