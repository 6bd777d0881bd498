//! Debate state machine.
//!
//! ```text
//! Idle ─► Opening ─┬─► Rebuttal ⟲ (once per round) ─┬─► Closing ─► Complete
//!                  └────────── rounds == 0 ─────────┘
//! any live phase ─► Aborted
//! ```

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Where a debate is in its fixed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebatePhase {
    Idle,
    Opening,
    /// One rebuttal round; re-entered for every round.
    Rebuttal,
    Closing,
    Complete,
    /// A backend request failed and the debate was abandoned.
    Aborted,
}

impl DebatePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Aborted)
    }

    /// Phases reachable from this one, ignoring the round counter.
    pub fn valid_transitions(self) -> &'static [DebatePhase] {
        match self {
            Self::Idle => &[Self::Opening, Self::Aborted],
            Self::Opening | Self::Rebuttal => &[Self::Rebuttal, Self::Closing, Self::Aborted],
            Self::Closing => &[Self::Complete, Self::Aborted],
            Self::Complete | Self::Aborted => &[],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Opening => "opening",
            Self::Rebuttal => "rebuttal",
            Self::Closing => "closing",
            Self::Complete => "complete",
            Self::Aborted => "aborted",
        }
    }
}

impl std::fmt::Display for DebatePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded phase change.
#[derive(Debug, Clone)]
pub struct DebateTransition {
    pub from: DebatePhase,
    pub to: DebatePhase,
    pub at: DateTime<Local>,
    pub reason: String,
}

/// A phase change the session refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot move debate from {from} to {to}: {reason}")]
pub struct TransitionError {
    pub from: DebatePhase,
    pub to: DebatePhase,
    pub reason: String,
}

/// Phase, round counter and change log for one debate.
#[derive(Debug, Clone)]
pub struct DebateSession {
    pub id: String,
    pub phase: DebatePhase,
    /// Rebuttal rounds started so far.
    pub current_round: u32,
    /// Rebuttal rounds requested.
    pub max_rounds: u32,
    pub transitions: Vec<DebateTransition>,
    pub created_at: DateTime<Local>,
}

impl DebateSession {
    pub fn new(id: &str, max_rounds: u32) -> Self {
        Self {
            id: id.to_string(),
            phase: DebatePhase::Idle,
            current_round: 0,
            max_rounds,
            transitions: Vec::new(),
            created_at: Local::now(),
        }
    }

    /// Move to `to`, enforcing the round budget.
    ///
    /// Entering `Rebuttal` starts the next round and fails once every round
    /// has run; `Closing` is refused while rounds remain.
    pub fn transition(&mut self, to: DebatePhase, reason: &str) -> Result<(), TransitionError> {
        if let Some(refusal) = self.refusal(to) {
            return Err(TransitionError {
                from: self.phase,
                to,
                reason: refusal,
            });
        }

        self.transitions.push(DebateTransition {
            from: self.phase,
            to,
            at: Local::now(),
            reason: reason.to_string(),
        });
        self.phase = to;
        if to == DebatePhase::Rebuttal {
            self.current_round += 1;
        }
        Ok(())
    }

    fn refusal(&self, to: DebatePhase) -> Option<String> {
        if !self.phase.valid_transitions().contains(&to) {
            return Some(if self.phase.is_terminal() {
                format!("debate is already {}", self.phase)
            } else {
                format!("{} cannot follow {}", to, self.phase)
            });
        }
        match to {
            DebatePhase::Rebuttal if !self.has_rounds_remaining() => Some(format!(
                "all {} rebuttal rounds already ran",
                self.max_rounds
            )),
            DebatePhase::Closing if self.has_rounds_remaining() => Some(format!(
                "only {} of {} rebuttal rounds ran",
                self.current_round, self.max_rounds
            )),
            _ => None,
        }
    }

    /// Idle → Opening.
    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.transition(DebatePhase::Opening, "debate started")
    }

    pub fn is_complete(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn has_rounds_remaining(&self) -> bool {
        self.current_round < self.max_rounds
    }

    pub fn status_line(&self) -> String {
        format!(
            "[{}] round {}/{} | debate={}",
            self.phase, self.current_round, self.max_rounds, self.id
        )
    }
}
