//! LLM Debate Coordination Library
//!
//! This library provides:
//! - A linear debate state machine (opening → rebuttal rounds → closing)
//! - Participants that carry their own prompt history
//! - Completion backends for OpenAI, Anthropic and Ollama behind one trait
//! - Transcript persistence as JSON plus a template-rendered HTML document
//!
//! # Usage
//!
//! ```no_run
//! use coordination::debate::{DebateOrchestrator, Participant, PromptStyle, Stance};
//! use coordination::providers::{build_provider, ProviderKind, ProviderSettings};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = ProviderSettings::default();
//! let backend = build_provider(ProviderKind::Ollama, &settings)?;
//! let topic = "Cities should ban cars";
//!
//! let style = PromptStyle::default();
//! let for_side = Participant::new(Stance::For, "llama3", topic, style.clone(), backend.clone());
//! let against_side = Participant::new(Stance::Against, "llama3", topic, style, backend);
//!
//! let mut debate = DebateOrchestrator::new("demo", topic, 2, for_side, against_side)?;
//! let transcript = debate.run().await?;
//! assert_eq!(transcript.turns.len(), 8);
//! # Ok(())
//! # }
//! ```

#![allow(clippy::uninlined_format_args)]

pub mod debate;
pub mod providers;
pub mod render;

// Re-export key debate types
pub use debate::{
    DebateError, DebateOrchestrator, DebatePhase, OutputError, OutputPaths, Participant, Phase,
    PromptStyle, Stance, Transcript, TranscriptMetadata, Turn,
};

// Re-export provider types
pub use providers::{
    build_provider, CompletionProvider, ProviderError, ProviderKind, ProviderSettings,
};

// Re-export rendering types
pub use render::{RenderError, TemplateSet};
