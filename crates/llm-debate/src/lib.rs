//! `llm-debate` — command-line front end for the debate coordination library.
//!
//! Parses arguments, loads configuration from the environment (and `.env`),
//! runs one debate and writes the JSON transcript plus the HTML document.

pub mod cli;
pub mod config;
pub mod runner;
pub mod telemetry;

pub use cli::{Args, LogLevel};
pub use config::{ConfigError, Settings};
