//! Lifecycle events emitted to external collaborators (UI, audio)

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::participant::{Participant, ParticipantId};

/// Participant identity for event payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantInfo {
    pub id: ParticipantId,
    pub name: String,
}

impl From<&Participant> for ParticipantInfo {
    fn from(p: &Participant) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
        }
    }
}

/// Duel lifecycle events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum DuelEvent {
    /// A new duel was seated
    DuelStarted {
        game_id: Uuid,
        participants: Vec<ParticipantInfo>,
    },

    /// Every alive participant fired
    ShotsFired {
        game_id: Uuid,
        round: u32,
        participant_ids: Vec<ParticipantId>,
    },

    /// Survivor chosen, the rest killed
    RoundResolved {
        game_id: Uuid,
        round: u32,
        survivor_ids: Vec<ParticipantId>,
        killed_ids: Vec<ParticipantId>,
    },

    /// Terminal event; `winner` is absent when nobody survived
    GameOver {
        game_id: Uuid,
        winner: Option<ParticipantInfo>,
    },

    /// Duel cleared before or after it finished
    DuelReset { game_id: Uuid },
}

impl DuelEvent {
    pub fn game_id(&self) -> Uuid {
        match self {
            DuelEvent::DuelStarted { game_id, .. }
            | DuelEvent::ShotsFired { game_id, .. }
            | DuelEvent::RoundResolved { game_id, .. }
            | DuelEvent::GameOver { game_id, .. }
            | DuelEvent::DuelReset { game_id } => *game_id,
        }
    }
}
