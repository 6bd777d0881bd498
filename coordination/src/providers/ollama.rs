//! Ollama generate backend.
//!
//! `/api/generate` streams newline-delimited JSON objects. Each carries a
//! `response` fragment; the object with `done: true` ends the stream.

use async_trait::async_trait;
use futures::StreamExt;

use super::{ensure_success, trim_base, CompletionProvider, ProviderError, ProviderKind};

pub struct OllamaProvider {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self {
            base_url: trim_base(base_url),
            client,
        }
    }
}

/// Accumulates `response` fragments from the NDJSON stream.
#[derive(Debug, Default)]
struct StreamAccumulator {
    pending: Vec<u8>,
    text: String,
    done: bool,
}

impl StreamAccumulator {
    fn push(&mut self, chunk: &[u8]) -> Result<(), ProviderError> {
        self.pending.extend_from_slice(chunk);
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.consume_line(&line)?;
            if self.done {
                break;
            }
        }
        Ok(())
    }

    fn consume_line(&mut self, line: &[u8]) -> Result<(), ProviderError> {
        let line = String::from_utf8_lossy(line);
        let line = line.trim();
        if line.is_empty() || self.done {
            return Ok(());
        }

        let value: serde_json::Value = serde_json::from_str(line)
            .map_err(|e| ProviderError::Parse(format!("invalid stream line: {}", e)))?;

        if let Some(err) = value.get("error").and_then(|e| e.as_str()) {
            return Err(ProviderError::RequestFailed(format!(
                "Ollama API error: {}",
                err
            )));
        }
        if let Some(fragment) = value.get("response").and_then(|r| r.as_str()) {
            self.text.push_str(fragment);
        }
        if value.get("done").and_then(|d| d.as_bool()).unwrap_or(false) {
            self.done = true;
        }
        Ok(())
    }

    fn finish(mut self) -> Result<String, ProviderError> {
        let rest = std::mem::take(&mut self.pending);
        self.consume_line(&rest)?;

        let text = self.text.trim().to_string();
        if text.is_empty() {
            return Err(ProviderError::Parse("Ollama stream produced no text".to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl CompletionProvider for OllamaProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    async fn complete(&self, prompt: &str, model: &str) -> Result<String, ProviderError> {
        let request_body = serde_json::json!({
            "model": model,
            "prompt": prompt,
            "stream": true
        });

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let response = ensure_success(response, "Ollama").await?;

        let mut acc = StreamAccumulator::default();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
            acc.push(&chunk)?;
            if acc.done {
                break;
            }
        }

        acc.finish()
    }
}
