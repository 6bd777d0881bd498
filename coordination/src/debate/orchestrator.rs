//! Debate orchestrator — drives opening, rebuttal rounds and closing.
//!
//! The loop is strictly sequential: every turn is awaited before the next
//! prompt is built, because each prompt depends on what came before.

use std::time::Instant;

use chrono::Local;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::participant::Participant;
use super::state::{DebatePhase, DebateSession, TransitionError};
use super::transcript::{Phase, Stance, Transcript, TranscriptMetadata, Turn};
use crate::providers::ProviderError;

/// Error from a debate run.
#[derive(Debug, Error)]
pub enum DebateError {
    /// A backend request failed; the debate was aborted at this turn.
    #[error("{stance} participant failed during {phase}: {source}")]
    Provider {
        stance: Stance,
        phase: Phase,
        #[source]
        source: ProviderError,
    },

    /// State transition failed.
    #[error("transition failed: {0}")]
    Transition(#[from] TransitionError),

    /// The debate request itself is unusable.
    #[error("invalid debate request: {0}")]
    InvalidRequest(String),

    /// `run` was called on a finished or aborted debate.
    #[error("debate already {0}")]
    AlreadyFinished(DebatePhase),
}

/// The debate orchestrator — owns both participants and the session.
///
/// Usage:
/// 1. Build both [`Participant`]s with their backends
/// 2. Create with `new()`
/// 3. Call `run()` once; it returns the finished [`Transcript`] or the
///    first error, after which the session is `Aborted`
pub struct DebateOrchestrator {
    session: DebateSession,
    topic: String,
    cite_sources: bool,
    for_side: Participant,
    against_side: Participant,
    turns: Vec<Turn>,
}

impl DebateOrchestrator {
    pub fn new(
        debate_id: &str,
        topic: &str,
        rounds: u32,
        for_side: Participant,
        against_side: Participant,
    ) -> Result<Self, DebateError> {
        if topic.trim().is_empty() {
            return Err(DebateError::InvalidRequest("topic is empty".to_string()));
        }
        if for_side.stance() != Stance::For || against_side.stance() != Stance::Against {
            return Err(DebateError::InvalidRequest(format!(
                "participants must be for/against, got {}/{}",
                for_side.stance(),
                against_side.stance()
            )));
        }

        Ok(Self {
            session: DebateSession::new(debate_id, rounds),
            topic: topic.to_string(),
            cite_sources: false,
            for_side,
            against_side,
            turns: Vec::with_capacity(Transcript::expected_turn_count(rounds)),
        })
    }

    /// Record in the metadata that participants were asked for citations.
    pub fn with_cite_sources(mut self, cite_sources: bool) -> Self {
        self.cite_sources = cite_sources;
        self
    }

    /// Current state-machine phase.
    pub fn phase(&self) -> DebatePhase {
        self.session.phase
    }

    /// Get a reference to the current session.
    pub fn session(&self) -> &DebateSession {
        &self.session
    }

    /// Turns produced so far.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Compact status line.
    pub fn status_line(&self) -> String {
        format!("{} | turns {}", self.session.status_line(), self.turns.len())
    }

    /// Run every phase to completion.
    ///
    /// On a backend failure the session moves to `Aborted` and the error is
    /// returned; turns produced before the failure are not handed out.
    pub async fn run(&mut self) -> Result<Transcript, DebateError> {
        if self.session.is_complete() {
            return Err(DebateError::AlreadyFinished(self.session.phase));
        }

        let started_at = Local::now();
        let clock = Instant::now();
        info!(topic = %self.topic, rounds = self.session.max_rounds, "Starting debate...");

        match self.run_phases().await {
            Ok(()) => {
                let transcript = Transcript {
                    metadata: TranscriptMetadata {
                        debate_id: self.session.id.clone(),
                        topic: self.topic.clone(),
                        rounds: self.session.max_rounds,
                        for_participant: self.for_side.info(),
                        against_participant: self.against_side.info(),
                        cite_sources: self.cite_sources,
                        started_at,
                        time_taken_secs: clock.elapsed().as_secs_f64(),
                    },
                    turns: self.turns.clone(),
                };
                info!(
                    turns = transcript.turns.len(),
                    secs = transcript.metadata.time_taken_secs,
                    "Debate complete"
                );
                Ok(transcript)
            }
            Err(err) => {
                error!(status = %self.status_line(), "Debate aborted: {}", err);
                if !self.session.is_complete() {
                    if let Err(e) = self
                        .session
                        .transition(DebatePhase::Aborted, &err.to_string())
                    {
                        warn!("could not mark debate aborted: {}", e);
                    }
                }
                Err(err)
            }
        }
    }

    async fn run_phases(&mut self) -> Result<(), DebateError> {
        self.session.start()?;
        for stance in Stance::ORDER {
            let text = self
                .side_mut(stance)
                .open()
                .await
                .map_err(|e| provider_error(stance, Phase::Opening, e))?;
            self.push_turn(Phase::Opening, stance, text);
        }

        while self.session.has_rounds_remaining() {
            let round = self.session.current_round + 1;
            self.session
                .transition(DebatePhase::Rebuttal, &format!("round {} started", round))?;
            debug!("Round {}:", round);

            let phase = Phase::Rebuttal { round };
            for stance in Stance::ORDER {
                // The against side answers the for side's rebuttal from this same round.
                let opponent = self
                    .side(stance.opponent())
                    .latest()
                    .unwrap_or_default()
                    .to_string();
                let text = self
                    .side_mut(stance)
                    .respond_to(&opponent)
                    .await
                    .map_err(|e| provider_error(stance, phase, e))?;
                self.push_turn(phase, stance, text);
            }
        }

        self.session
            .transition(DebatePhase::Closing, "rebuttals finished")?;
        debug!("Concluding statements:");
        for stance in Stance::ORDER {
            let text = self
                .side_mut(stance)
                .conclude()
                .await
                .map_err(|e| provider_error(stance, Phase::Closing, e))?;
            self.push_turn(Phase::Closing, stance, text);
        }

        self.session
            .transition(DebatePhase::Complete, "closing statements recorded")?;
        Ok(())
    }

    fn push_turn(&mut self, phase: Phase, stance: Stance, text: String) {
        info!(%phase, %stance, chars = text.len(), "turn recorded");
        debug!("{}: {}", stance.label(), text);
        self.turns.push(Turn {
            phase,
            stance,
            text,
        });
    }

    fn side(&self, stance: Stance) -> &Participant {
        match stance {
            Stance::For => &self.for_side,
            Stance::Against => &self.against_side,
        }
    }

    fn side_mut(&mut self, stance: Stance) -> &mut Participant {
        match stance {
            Stance::For => &mut self.for_side,
            Stance::Against => &mut self.against_side,
        }
    }
}

fn provider_error(stance: Stance, phase: Phase, source: ProviderError) -> DebateError {
    DebateError::Provider {
        stance,
        phase,
        source,
    }
}
