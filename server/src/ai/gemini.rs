use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ai::provider::DraftProvider;
use crate::domain::error::DomainError;
use crate::infrastructure::settings::Settings;

/// `generateContent` client; the reply text sits under
/// `candidates[0].content.parts[*].text`.
pub(crate) struct GeminiProvider {
    client: Client,
    api_url: String,
    model: String,
    api_key: String,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiProvider {
    pub(crate) fn new(settings: &Settings) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(settings.ai_generation_timeout_secs))
            .build()
            .expect("failed to build reqwest client");

        Self {
            client,
            api_url: settings.gemini_api_url.trim_end_matches('/').to_string(),
            model: settings.gemini_model.clone(),
            api_key: settings.gemini_api_key.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.api_url, self.model)
    }
}

#[async_trait]
impl DraftProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        if self.api_key.is_empty() {
            return Err(DomainError::Upstream(
                "gemini api key is not configured".to_string(),
            ));
        }

        let payload = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.8,
                max_output_tokens: 2000,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| DomainError::Upstream(format!("gemini request failed: {err}")))?
            .error_for_status()
            .map_err(|err| DomainError::Upstream(format!("gemini request failed: {err}")))?;

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| DomainError::Upstream(format!("gemini reply unreadable: {err}")))?;

        let answer = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if answer.is_empty() {
            return Err(DomainError::Upstream("no response from model".to_string()));
        }
        Ok(answer)
    }
}
