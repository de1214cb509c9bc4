use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ai::provider::DraftProvider;
use crate::domain::error::DomainError;
use crate::infrastructure::settings::Settings;

const SYSTEM_PROMPT: &str = "You write casual, personal tech blog posts. \
Short paragraphs, real opinions, no corporate jargon. Keep it 400-600 words \
and answer with the JSON object you were asked for.";

/// Workflow-inference client; the reply text sits nested under
/// `result.answer.<model>`.
pub(crate) struct OpenArenaProvider {
    client: Client,
    api_url: String,
    workflow_id: String,
    token: String,
    model: String,
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    workflow_id: &'a str,
    query: &'a str,
    is_persistence_allowed: bool,
    modelparams: Map<String, Value>,
}

#[derive(Deserialize)]
struct InferenceResponse {
    #[serde(default)]
    result: Option<InferenceResult>,
}

#[derive(Deserialize)]
struct InferenceResult {
    #[serde(default)]
    answer: Option<Map<String, Value>>,
}

impl OpenArenaProvider {
    pub(crate) fn new(settings: &Settings) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(settings.ai_generation_timeout_secs))
            .build()
            .expect("failed to build reqwest client");

        Self {
            client,
            api_url: settings.openarena_api_url.clone(),
            workflow_id: settings.openarena_workflow_id.clone(),
            token: settings.openarena_token.clone(),
            model: settings.openarena_model.clone(),
        }
    }

    fn modelparams(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert(
            self.model.clone(),
            serde_json::json!({
                "system_prompt": SYSTEM_PROMPT,
                "temperature": "0.8",
                "max_tokens": "2000",
            }),
        );
        params
    }
}

#[async_trait]
impl DraftProvider for OpenArenaProvider {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        if self.token.is_empty() {
            return Err(DomainError::Upstream(
                "open arena token is not configured".to_string(),
            ));
        }

        let payload = InferenceRequest {
            workflow_id: &self.workflow_id,
            query: prompt,
            is_persistence_allowed: false,
            modelparams: self.modelparams(),
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|err| DomainError::Upstream(format!("open arena request failed: {err}")))?
            .error_for_status()
            .map_err(|err| DomainError::Upstream(format!("open arena request failed: {err}")))?;

        let body: InferenceResponse = response
            .json()
            .await
            .map_err(|err| DomainError::Upstream(format!("open arena reply unreadable: {err}")))?;

        let answer = body
            .result
            .and_then(|result| result.answer)
            .and_then(|answer| {
                answer
                    .get(&self.model)
                    .or_else(|| answer.values().next())
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_default();

        if answer.is_empty() {
            return Err(DomainError::Upstream("no response from model".to_string()));
        }
        Ok(answer)
    }
}
