//! Game state for one duel

use uuid::Uuid;

use super::events::ParticipantInfo;
use super::participant::{Participant, ParticipantId};

/// A seated duel (owned by the orchestrator)
#[derive(Debug, Clone)]
pub struct Game {
    pub id: Uuid,
    /// Seating order, fixed at creation
    pub participants: Vec<Participant>,
    pub running: bool,
    pub winner: Option<ParticipantId>,
}

impl Game {
    pub fn new(participants: Vec<Participant>) -> Self {
        Self {
            id: Uuid::new_v4(),
            participants,
            running: false,
            winner: None,
        }
    }

    /// Count alive participants
    pub fn alive_count(&self) -> usize {
        self.participants.iter().filter(|p| p.alive).count()
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(id.0)
    }

    /// Stop the duel and record the last one standing, if any
    pub fn finish(&mut self) -> Option<ParticipantInfo> {
        self.running = false;
        self.winner = self.participants.iter().find(|p| p.alive).map(|p| p.id);
        self.winner_info()
    }

    pub fn winner_info(&self) -> Option<ParticipantInfo> {
        self.winner
            .and_then(|id| self.participant(id))
            .map(ParticipantInfo::from)
    }

    pub fn roster(&self) -> Vec<ParticipantInfo> {
        self.participants.iter().map(ParticipantInfo::from).collect()
    }
}
