//! Debate participants — one side of the proposition bound to a backend model.
//!
//! A participant keeps its own running history. Every prompt it sends
//! carries that history explicitly; nothing is shared with the opponent
//! except the opponent text handed to [`Participant::respond_to`].

use std::sync::Arc;

use tracing::info;

use super::transcript::{ParticipantInfo, Stance};
use crate::providers::{CompletionProvider, ProviderError};

/// Prompt wording shared by every turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptStyle {
    /// Ask for citations supporting each argument.
    pub cite_sources: bool,
}

impl PromptStyle {
    /// Opening prompt, conditioned on the topic only.
    pub fn opening(&self, topic: &str, stance: Stance) -> String {
        let mut prompt = format!(
            "You are participating in a debate on the topic: '{}'. \
             You are {} the proposition. Make a convincing opening argument for your position.",
            topic, stance
        );
        if self.cite_sources {
            prompt.push_str(" Please also provide relevant citations supporting your position.");
        }
        prompt
    }

    /// Rebuttal prompt over the participant's full history.
    pub fn rebuttal(&self, topic: &str, stance: Stance, history: &[String]) -> String {
        let mut prompt = format!(
            "You are participating in a debate on the topic: '{}'. \
             You are {} the proposition. Here's the debate history so far:\n\n",
            topic, stance
        );
        prompt.push_str(&history.join("\n\n"));
        let instruction = if self.cite_sources {
            format!(
                "\n\nNow, carefully consider the opponent's latest arguments and, \
                 maintaining your position {} the proposition, respond to those arguments. \
                 Please provide relevant citations supporting your argument.",
                stance
            )
        } else {
            format!(
                "\n\nNow, respond to the opponent's latest argument, \
                 maintaining your position {} the proposition.",
                stance
            )
        };
        prompt.push_str(&instruction);
        prompt
    }

    /// Closing prompt over the participant's full history.
    pub fn closing(&self, topic: &str, stance: Stance, history: &[String]) -> String {
        let mut prompt = format!(
            "You have been participating in a debate on the topic: '{}'. \
             You are {} the proposition. Here's the entire debate history:\n\n",
            topic, stance
        );
        prompt.push_str(&history.join("\n\n"));
        prompt.push_str(
            "\n\nNow, provide a concluding statement for the debate, \
             summarizing your position and the key points you've made.",
        );
        prompt
    }
}

/// One side of the debate.
pub struct Participant {
    stance: Stance,
    model: String,
    topic: String,
    style: PromptStyle,
    backend: Arc<dyn CompletionProvider>,
    responses: Vec<String>,
    history: Vec<String>,
}

impl Participant {
    pub fn new(
        stance: Stance,
        model: impl Into<String>,
        topic: impl Into<String>,
        style: PromptStyle,
        backend: Arc<dyn CompletionProvider>,
    ) -> Self {
        let model = model.into();
        info!(%stance, provider = %backend.kind(), %model, "debater initialized");
        Self {
            stance,
            model,
            topic: topic.into(),
            style,
            backend,
            responses: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn stance(&self) -> Stance {
        self.stance
    }

    pub fn info(&self) -> ParticipantInfo {
        ParticipantInfo {
            provider: self.backend.kind(),
            model: self.model.clone(),
        }
    }

    /// Own utterances so far.
    pub fn responses(&self) -> &[String] {
        &self.responses
    }

    /// Labelled context lines fed into rebuttal and closing prompts.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Most recent utterance, if any.
    pub fn latest(&self) -> Option<&str> {
        self.responses.last().map(String::as_str)
    }

    /// Produce the opening argument.
    pub async fn open(&mut self) -> Result<String, ProviderError> {
        let prompt = self.style.opening(&self.topic, self.stance);
        let response = self.backend.complete(&prompt, &self.model).await?;
        self.record(&response, "opening argument");
        Ok(response)
    }

    /// Rebut the opponent's latest argument.
    pub async fn respond_to(&mut self, opponent_argument: &str) -> Result<String, ProviderError> {
        self.history
            .push(format!("Opponent's argument: {}", opponent_argument));
        let prompt = self.style.rebuttal(&self.topic, self.stance, &self.history);
        let response = self.backend.complete(&prompt, &self.model).await?;
        self.record(&response, "response");
        Ok(response)
    }

    /// Produce the concluding statement.
    pub async fn conclude(&mut self) -> Result<String, ProviderError> {
        let prompt = self.style.closing(&self.topic, self.stance, &self.history);
        let response = self.backend.complete(&prompt, &self.model).await?;
        self.record(&response, "conclusion");
        Ok(response)
    }

    fn record(&mut self, response: &str, label: &str) {
        self.responses.push(response.to_string());
        self.history
            .push(format!("{} {}: {}", self.stance.label(), label, response));
    }
}
