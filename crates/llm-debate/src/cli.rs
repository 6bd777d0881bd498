//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use coordination::ProviderKind;

/// Run a debate between two LLMs.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Type of LLM to use (openai, anthropic, ollama)
    pub llm_type: ProviderKind,

    /// Model name for the chosen LLM
    pub model: String,

    /// Topic of the debate
    pub topic: String,

    /// Number of debate rounds
    #[arg(long, default_value_t = 3)]
    pub rounds: u32,

    /// Custom output filename (without extension); defaults to topic + timestamp
    #[arg(long, visible_alias = "filename")]
    pub output: Option<String>,

    /// Directory the JSON and HTML files are written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Set the logging level (RUST_LOG overrides)
    #[arg(long, value_enum, ignore_case = true, default_value = "info")]
    pub log_level: LogLevel,

    /// LLM type for the "against" side (defaults to llm_type)
    #[arg(long)]
    pub against_llm_type: Option<ProviderKind>,

    /// Model for the "against" side (defaults to model)
    #[arg(long)]
    pub against_model: Option<String>,

    /// Directory holding debate.html and error.html
    #[arg(long, env = "DEBATE_TEMPLATE_DIR")]
    pub template_dir: Option<PathBuf>,

    /// Ask participants to cite sources for their arguments
    #[arg(long, default_value_t = false)]
    pub cite_sources: bool,
}

impl Args {
    /// Backend for the "against" side.
    pub fn against_provider(&self) -> ProviderKind {
        self.against_llm_type.unwrap_or(self.llm_type)
    }

    /// Model for the "against" side.
    pub fn against_model_name(&self) -> &str {
        self.against_model.as_deref().unwrap_or(&self.model)
    }
}

/// Log levels accepted by `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// `EnvFilter` directive for this level.
    pub fn directive(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error | Self::Critical => "error",
        }
    }
}
