//! Debate Orchestration — For/Against Turn Sequencing
//!
//! State machine for a scripted debate between two model-backed
//! participants, one arguing for a proposition and one against it.
//!
//! # Debate Flow
//!
//! ```text
//! Idle → Opening → Rebuttal ×N → Closing → Complete
//!   │       │  (for, against)    │
//!   │       └── N = 0 ───────────┘
//!   │
//!   └─ backend failure at any point → Aborted
//! ```
//!
//! Within each phase the "for" side speaks first. Openings see only the
//! topic; every later turn sees the speaker's full history.

pub mod orchestrator;
pub mod participant;
pub mod persistence;
pub mod state;
pub mod transcript;

pub use orchestrator::{DebateError, DebateOrchestrator};
pub use participant::{Participant, PromptStyle};
pub use persistence::{default_basename, load_transcript, write_outputs, OutputError, OutputPaths};
pub use state::{DebatePhase, DebateSession, DebateTransition, TransitionError};
pub use transcript::{ParticipantInfo, Phase, Stance, Transcript, TranscriptMetadata, Turn};
