//! OpenAI chat-completions backend.

use async_trait::async_trait;

use super::{
    ensure_success, extract_text, trim_base, CompletionProvider, ProviderError, ProviderKind,
};

pub struct OpenAiProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(client: reqwest::Client, api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: trim_base(base_url),
            client,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn complete(&self, prompt: &str, model: &str) -> Result<String, ProviderError> {
        let request_body = serde_json::json!({
            "model": model,
            "messages": [
                {"role": "user", "content": prompt}
            ]
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let response = ensure_success(response, "OpenAI").await?;

        let resp_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        extract_text(
            resp_json.pointer("/choices/0/message/content"),
            "choices[0].message.content",
        )
    }
}
