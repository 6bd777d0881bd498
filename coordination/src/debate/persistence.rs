//! Debate persistence — writes the finished transcript as JSON and HTML.
//!
//! Both documents are built in memory before anything touches the disk. If
//! the second write fails the first file is removed, so a failed save leaves
//! no files behind.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;

use super::transcript::Transcript;
use crate::render::TemplateSet;

/// Error during persistence operations.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("serialize failed: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("deserialize failed for {}: {source}", .path.display())]
    Deserialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the two output documents were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub json: PathBuf,
    pub html: PathBuf,
}

/// Output basename derived from the topic and a timestamp.
///
/// Lowercases the topic, collapses whitespace runs to `_`, drops anything
/// that is not an ASCII letter, digit, `_` or `-`, then appends
/// `_YYYYmmdd_HHMMSS`.
pub fn default_basename(topic: &str, now: DateTime<Local>) -> String {
    let words: Vec<String> = topic
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
                .map(|c| c.to_ascii_lowercase())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect();

    let stem = if words.is_empty() {
        "debate".to_string()
    } else {
        words.join("_")
    };
    format!("{}_{}", stem, now.format("%Y%m%d_%H%M%S"))
}

/// Render both documents and write `{basename}.json` and `{basename}.html` under `dir`.
pub async fn write_outputs(
    transcript: &Transcript,
    templates: &TemplateSet,
    dir: &Path,
    basename: &str,
) -> Result<OutputPaths, OutputError> {
    let json = serde_json::to_string_pretty(transcript).map_err(OutputError::Serialize)?;
    let html = templates.render(transcript);

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| OutputError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

    let paths = OutputPaths {
        json: dir.join(format!("{}.json", basename)),
        html: dir.join(format!("{}.html", basename)),
    };
    write_file(&paths.json, json).await?;
    if let Err(err) = write_file(&paths.html, html).await {
        // Never leave a JSON transcript without its HTML twin
        if let Err(e) = tokio::fs::remove_file(&paths.json).await {
            tracing::warn!(path = %paths.json.display(), "could not remove partial output: {}", e);
        }
        return Err(err);
    }

    tracing::info!(
        json = %paths.json.display(),
        html = %paths.html.display(),
        "Debate results saved"
    );
    Ok(paths)
}

/// Parse a transcript previously written by [`write_outputs`].
pub async fn load_transcript(path: &Path) -> Result<Transcript, OutputError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| OutputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&raw).map_err(|source| OutputError::Deserialize {
        path: path.to_path_buf(),
        source,
    })
}

async fn write_file(path: &Path, contents: String) -> Result<(), OutputError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| OutputError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_default_basename() {
        let now = at(2024, 3, 9, 14, 5, 7);
        assert_eq!(
            default_basename("Islam promotes women's rights", now),
            "islam_promotes_womens_rights_20240309_140507"
        );
    }

    #[test]
    fn test_default_basename_strips_path_characters() {
        let now = at(2024, 1, 1, 0, 0, 0);
        assert_eq!(
            default_basename("  AI / ML:   hype?  ", now),
            "ai_ml_hype_20240101_000000"
        );
        assert_eq!(default_basename("???", now), "debate_20240101_000000");
    }

    fn finished_transcript() -> Transcript {
        use crate::debate::{ParticipantInfo, Phase, Stance, TranscriptMetadata, Turn};
        use crate::providers::ProviderKind;

        let info = ParticipantInfo {
            provider: ProviderKind::Ollama,
            model: "llama3".to_string(),
        };
        let turns = [Phase::Opening, Phase::Closing]
            .into_iter()
            .flat_map(|phase| {
                Stance::ORDER.into_iter().map(move |stance| Turn {
                    phase,
                    stance,
                    text: format!("{} {}", stance, phase),
                })
            })
            .collect();
        Transcript {
            metadata: TranscriptMetadata {
                debate_id: "d-save".to_string(),
                topic: "Tabs beat spaces".to_string(),
                rounds: 0,
                for_participant: info.clone(),
                against_participant: info,
                cite_sources: false,
                started_at: at(2024, 5, 1, 9, 30, 0),
                time_taken_secs: 1.5,
            },
            turns,
        }
    }

    #[tokio::test]
    async fn test_write_outputs_creates_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("nested");
        let templates = TemplateSet::from_strings("{topic}{debate_content}", "{error}");

        let paths = write_outputs(&finished_transcript(), &templates, &out_dir, "out")
            .await
            .unwrap();
        assert!(paths.json.is_file());
        assert!(paths.html.is_file());
        let loaded = load_transcript(&paths.json).await.unwrap();
        assert_eq!(loaded.turns.len(), 4);
    }

    #[tokio::test]
    async fn test_failed_html_write_removes_json() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the HTML file should go makes that write fail
        std::fs::create_dir(dir.path().join("out.html")).unwrap();
        let templates = TemplateSet::from_strings("{debate_content}", "{error}");

        let err = write_outputs(&finished_transcript(), &templates, dir.path(), "out")
            .await
            .unwrap_err();
        match err {
            OutputError::Io { path, .. } => assert!(path.ends_with("out.html")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!dir.path().join("out.json").exists());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_transcript(&dir.path().join("nope.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, OutputError::Io { .. }));
    }

    #[tokio::test]
    async fn test_load_garbage_is_deserialize_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"metadata\": 3}").unwrap();
        let err = load_transcript(&path).await.unwrap_err();
        assert!(matches!(err, OutputError::Deserialize { .. }));
    }
}
