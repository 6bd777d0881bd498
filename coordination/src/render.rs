//! HTML rendering of a finished transcript.
//!
//! Rendering is plain placeholder substitution over two template files kept
//! next to each other: the main document template and the error template.
//! Both are read up front so a missing file is reported before any model
//! call is made.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::debate::Transcript;

/// File name of the main document template.
pub const MAIN_TEMPLATE: &str = "debate.html";
/// File name of the failure notice template.
pub const ERROR_TEMPLATE: &str = "error.html";

/// Errors from template loading
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("HTML template file not found: {}", .path.display())]
    TemplateMissing { path: PathBuf },

    #[error("failed to read template {}: {source}", .path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The two templates every run needs.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    main: String,
    error: String,
}

impl TemplateSet {
    /// Load `debate.html` and `error.html` from `dir`.
    pub fn load(dir: &Path) -> Result<Self, RenderError> {
        let set = Self {
            main: read_template(&dir.join(MAIN_TEMPLATE))?,
            error: read_template(&dir.join(ERROR_TEMPLATE))?,
        };
        tracing::debug!(dir = %dir.display(), "templates loaded");
        Ok(set)
    }

    /// Build from in-memory template text.
    pub fn from_strings(main: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            main: main.into(),
            error: error.into(),
        }
    }

    /// Render the full debate document.
    pub fn render(&self, transcript: &Transcript) -> String {
        let meta = &transcript.metadata;
        fill(
            &self.main,
            &[
                ("topic", meta.topic.as_str()),
                ("llm_type", meta.provider_label().as_str()),
                ("model", meta.model_label().as_str()),
                ("date", meta.started_at.to_rfc3339().as_str()),
                ("time_taken", format!("{:.2}", meta.time_taken_secs).as_str()),
                ("rounds", meta.rounds.to_string().as_str()),
                ("debate_content", debate_content(transcript).as_str()),
            ],
        )
    }

    /// Render the failure notice for a debate that did not complete.
    pub fn render_error(&self, topic: &str, error: &str) -> String {
        fill(&self.error, &[("topic", topic), ("error", error)])
    }
}

/// Substitute `{name}` placeholders in one pass over `template`.
///
/// Substituted values are never rescanned; unknown `{...}` runs (CSS blocks
/// included) are copied through.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let hit = values.iter().find_map(|(name, value)| {
            tail[1..]
                .strip_prefix(*name)
                .and_then(|after| after.strip_prefix('}'))
                .map(|after| (*value, after))
        });
        match hit {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn read_template(path: &Path) -> Result<String, RenderError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            RenderError::TemplateMissing {
                path: path.to_path_buf(),
            }
        } else {
            RenderError::TemplateRead {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// One `round` block per phase, one `argument` block per turn.
fn debate_content(transcript: &Transcript) -> String {
    let mut content = String::new();
    for (phase, turns) in transcript.sections() {
        content.push_str(&format!("<div class=\"round\"><h2>{}</h2>", phase.title()));
        for turn in turns {
            content.push_str(&format!(
                "\n    <div class=\"argument {}\">\n        <h3>{}</h3>\n        <p>{}</p>\n    </div>",
                turn.stance,
                turn.stance.label(),
                turn.text
            ));
        }
        content.push_str("</div>");
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debate::{ParticipantInfo, Phase, Stance, TranscriptMetadata, Turn};
    use crate::providers::ProviderKind;

    fn sample() -> Transcript {
        let info = ParticipantInfo {
            provider: ProviderKind::Anthropic,
            model: "claude-3-5-sonnet".to_string(),
        };
        Transcript {
            metadata: TranscriptMetadata {
                debate_id: "d-1".to_string(),
                topic: "Remote work beats the office".to_string(),
                rounds: 0,
                for_participant: info.clone(),
                against_participant: info,
                cite_sources: false,
                started_at: chrono::Local::now(),
                time_taken_secs: 12.3456,
            },
            turns: vec![
                Turn {
                    phase: Phase::Opening,
                    stance: Stance::For,
                    text: "No commute.".to_string(),
                },
                Turn {
                    phase: Phase::Opening,
                    stance: Stance::Against,
                    text: "Hallway chats {topic} matter.".to_string(),
                },
                Turn {
                    phase: Phase::Closing,
                    stance: Stance::For,
                    text: "Focus wins.".to_string(),
                },
                Turn {
                    phase: Phase::Closing,
                    stance: Stance::Against,
                    text: "Culture wins.".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_render_fills_placeholders() {
        let templates = TemplateSet::from_strings(
            "<h1>{topic}</h1><p>{llm_type} / {model} / {time_taken}s / {rounds}</p>{debate_content}",
            "",
        );
        let html = templates.render(&sample());
        assert!(html.starts_with("<h1>Remote work beats the office</h1>"));
        assert!(html.contains("anthropic / claude-3-5-sonnet / 12.35s / 0"));
        assert!(html.contains("<h2>Opening Arguments</h2>"));
        assert!(html.contains("<h2>Conclusions</h2>"));
        assert!(html.contains("<div class=\"argument against\">"));
        assert!(html.contains("<h3>For</h3>"));
    }

    #[test]
    fn test_turn_text_is_verbatim() {
        let templates = TemplateSet::from_strings("{debate_content}", "");
        let html = templates.render(&sample());
        for turn in &sample().turns {
            assert!(html.contains(&turn.text), "missing: {}", turn.text);
        }
    }

    #[test]
    fn test_placeholder_text_in_values_is_left_alone() {
        let mut transcript = sample();
        transcript.metadata.topic = "Is {model} biased? {debate_content}".to_string();
        let templates = TemplateSet::from_strings(
            "<style>h1 { color: red; }</style><h1>{topic}</h1>{model}|{debate_content}",
            "",
        );

        let html = templates.render(&transcript);
        assert!(html.starts_with(
            "<style>h1 { color: red; }</style><h1>Is {model} biased? {debate_content}</h1>"
        ));
        assert!(html.contains("</h1>claude-3-5-sonnet|<div class=\"round\">"));
        assert_eq!(html.matches("No commute.").count(), 1);
        assert!(html.contains("Hallway chats {topic} matter."));
    }

    #[test]
    fn test_render_error_leaves_error_text_alone() {
        let templates = TemplateSet::from_strings("", "<p>{topic}: {error}</p>");
        assert_eq!(
            templates.render_error("about {error}", "bad {topic}"),
            "<p>about {error}: bad {topic}</p>"
        );
    }

    #[test]
    fn test_render_error() {
        let templates = TemplateSet::from_strings("", "<p>{topic} failed: {error}</p>");
        assert_eq!(
            templates.render_error("t", "API key not configured"),
            "<p>t failed: API key not configured</p>"
        );
    }

    #[test]
    fn test_missing_template_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MAIN_TEMPLATE), "{debate_content}").unwrap();

        let err = TemplateSet::load(dir.path()).unwrap_err();
        match err {
            RenderError::TemplateMissing { path } => assert!(path.ends_with(ERROR_TEMPLATE)),
            other => panic!("unexpected error: {other}"),
        }

        std::fs::write(dir.path().join(ERROR_TEMPLATE), "{error}").unwrap();
        assert!(TemplateSet::load(dir.path()).is_ok());
    }
}
