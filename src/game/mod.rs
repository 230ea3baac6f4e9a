//! Duel simulation modules

pub mod animation;
pub mod arena;
pub mod duel;
pub mod engine;
pub mod error;
pub mod events;
pub mod orchestrator;
pub mod participant;
pub mod scheduler;
pub mod snapshot;

pub use animation::AnimationClock;
pub use arena::{ArenaLayout, MAX_PARTICIPANTS, MIN_PARTICIPANTS};
pub use duel::Game;
pub use engine::{
    EliminationEngine, Round, RoundOutcome, RoundPhase, RoundRandom, RoundTiming, SeededRandom,
};
pub use error::DuelError;
pub use events::{DuelEvent, ParticipantInfo};
pub use orchestrator::{OrchestratorConfig, RoundOrchestrator};
pub use participant::{Participant, ParticipantId};
pub use snapshot::{DuelSnapshot, ParticipantView};
