//! Transcript data model — turns, metadata, and the finished record.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::providers::ProviderKind;

/// Which side of the proposition a participant argues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    For,
    Against,
}

impl Stance {
    /// Both stances in speaking order.
    pub const ORDER: [Stance; 2] = [Stance::For, Stance::Against];

    /// The opposing stance.
    pub fn opponent(self) -> Self {
        match self {
            Self::For => Self::Against,
            Self::Against => Self::For,
        }
    }

    /// Capitalized label used in history lines and rendered headings.
    pub fn label(self) -> &'static str {
        match self {
            Self::For => "For",
            Self::Against => "Against",
        }
    }
}

impl std::fmt::Display for Stance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::For => write!(f, "for"),
            Self::Against => write!(f, "against"),
        }
    }
}

/// Phase a turn was produced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Phase {
    Opening,
    /// Rebuttal round, 1-indexed.
    Rebuttal { round: u32 },
    Closing,
}

impl Phase {
    /// Section heading for the rendered document.
    pub fn title(self) -> String {
        match self {
            Self::Opening => "Opening Arguments".to_string(),
            Self::Rebuttal { round } => format!("Round {}", round),
            Self::Closing => "Conclusions".to_string(),
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Opening => write!(f, "opening"),
            Self::Rebuttal { round } => write!(f, "rebuttal-round-{}", round),
            Self::Closing => write!(f, "closing"),
        }
    }
}

/// One produced utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub phase: Phase,
    pub stance: Stance,
    pub text: String,
}

/// Backend and model one side ran on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantInfo {
    pub provider: ProviderKind,
    pub model: String,
}

/// Debate-level metadata recorded alongside the turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptMetadata {
    /// Unique debate identifier.
    pub debate_id: String,
    /// The proposition under debate.
    pub topic: String,
    /// Number of rebuttal rounds requested.
    pub rounds: u32,
    pub for_participant: ParticipantInfo,
    pub against_participant: ParticipantInfo,
    /// Whether participants were asked to cite sources.
    #[serde(default)]
    pub cite_sources: bool,
    /// When the debate started (local time, RFC 3339).
    pub started_at: DateTime<Local>,
    /// Wall-clock duration of the whole debate.
    pub time_taken_secs: f64,
}

impl TranscriptMetadata {
    /// Provider label, collapsed when both sides share a backend.
    pub fn provider_label(&self) -> String {
        let (a, b) = (
            self.for_participant.provider,
            self.against_participant.provider,
        );
        if a == b {
            a.to_string()
        } else {
            format!("{} vs {}", a, b)
        }
    }

    /// Model label, collapsed when both sides share a model.
    pub fn model_label(&self) -> String {
        let (a, b) = (
            &self.for_participant.model,
            &self.against_participant.model,
        );
        if a == b {
            a.clone()
        } else {
            format!("{} vs {}", a, b)
        }
    }
}

/// The complete ordered record of a debate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub metadata: TranscriptMetadata,
    pub turns: Vec<Turn>,
}

impl Transcript {
    /// Number of turns a finished debate with `rounds` rebuttal rounds holds.
    pub fn expected_turn_count(rounds: u32) -> usize {
        2 + 2 * rounds as usize + 2
    }

    /// Whether the turn list has the shape of a completed debate.
    pub fn is_complete(&self) -> bool {
        self.turns.len() == Self::expected_turn_count(self.metadata.rounds)
    }

    /// Turns spoken by one side, in order.
    pub fn turns_for(&self, stance: Stance) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(move |t| t.stance == stance)
    }

    /// Consecutive turns grouped by phase, in phase order.
    pub fn sections(&self) -> Vec<(Phase, Vec<&Turn>)> {
        let mut sections: Vec<(Phase, Vec<&Turn>)> = Vec::new();
        for turn in &self.turns {
            match sections.last_mut() {
                Some((phase, turns)) if *phase == turn.phase => turns.push(turn),
                _ => sections.push((turn.phase, vec![turn])),
            }
        }
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(provider: ProviderKind, model: &str) -> ParticipantInfo {
        ParticipantInfo {
            provider,
            model: model.to_string(),
        }
    }

    fn transcript(turns: Vec<Turn>, rounds: u32) -> Transcript {
        Transcript {
            metadata: TranscriptMetadata {
                debate_id: "d-1".to_string(),
                topic: "Tea is better than coffee".to_string(),
                rounds,
                for_participant: info(ProviderKind::OpenAi, "gpt-4o"),
                against_participant: info(ProviderKind::OpenAi, "gpt-4o"),
                cite_sources: false,
                started_at: Local::now(),
                time_taken_secs: 1.5,
            },
            turns,
        }
    }

    fn turn(phase: Phase, stance: Stance) -> Turn {
        Turn {
            phase,
            stance,
            text: format!("{} {}", phase, stance),
        }
    }

    #[test]
    fn test_expected_turn_count() {
        assert_eq!(Transcript::expected_turn_count(0), 4);
        assert_eq!(Transcript::expected_turn_count(1), 6);
        assert_eq!(Transcript::expected_turn_count(3), 10);
    }

    #[test]
    fn test_sections_group_by_phase() {
        let t = transcript(
            vec![
                turn(Phase::Opening, Stance::For),
                turn(Phase::Opening, Stance::Against),
                turn(Phase::Rebuttal { round: 1 }, Stance::For),
                turn(Phase::Rebuttal { round: 1 }, Stance::Against),
                turn(Phase::Closing, Stance::For),
                turn(Phase::Closing, Stance::Against),
            ],
            1,
        );
        assert!(t.is_complete());

        let sections = t.sections();
        let titles: Vec<String> = sections.iter().map(|(p, _)| p.title()).collect();
        assert_eq!(titles, vec!["Opening Arguments", "Round 1", "Conclusions"]);
        assert!(sections.iter().all(|(_, turns)| turns.len() == 2));
        assert_eq!(t.turns_for(Stance::Against).count(), 3);
    }

    #[test]
    fn test_labels_collapse_when_equal() {
        let mut t = transcript(vec![], 0);
        assert_eq!(t.metadata.provider_label(), "openai");
        assert_eq!(t.metadata.model_label(), "gpt-4o");

        t.metadata.against_participant = info(ProviderKind::Anthropic, "claude-3-5-sonnet");
        assert_eq!(t.metadata.provider_label(), "openai vs anthropic");
        assert_eq!(t.metadata.model_label(), "gpt-4o vs claude-3-5-sonnet");
    }

    #[test]
    fn test_phase_serializes_tagged() {
        let json = serde_json::to_value(Phase::Rebuttal { round: 2 }).unwrap();
        assert_eq!(json["kind"], "rebuttal");
        assert_eq!(json["round"], 2);
        assert_eq!(
            serde_json::to_value(Phase::Closing).unwrap()["kind"],
            "closing"
        );
    }

    #[test]
    fn test_stance_helpers() {
        assert_eq!(Stance::For.opponent(), Stance::Against);
        assert_eq!(Stance::Against.label(), "Against");
        assert_eq!(Stance::For.to_string(), "for");
    }
}
