//! Anthropic messages backend.

use async_trait::async_trait;

use super::{
    ensure_success, extract_text, trim_base, CompletionProvider, ProviderError, ProviderKind,
};

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    api_key: String,
    base_url: String,
    max_tokens: u32,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        base_url: String,
        max_tokens: u32,
    ) -> Self {
        Self {
            api_key,
            base_url: trim_base(base_url),
            max_tokens,
            client,
        }
    }
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    async fn complete(&self, prompt: &str, model: &str) -> Result<String, ProviderError> {
        let request_body = serde_json::json!({
            "model": model,
            "max_tokens": self.max_tokens,
            "messages": [{
                "role": "user",
                "content": prompt
            }]
        });

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let response = ensure_success(response, "Anthropic").await?;

        let resp_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        if resp_json["stop_reason"] == "max_tokens" {
            tracing::warn!(
                model,
                max_tokens = self.max_tokens,
                "Anthropic reply truncated at max_tokens"
            );
        }

        extract_text(resp_json.pointer("/content/0/text"), "content[0].text")
    }
}
