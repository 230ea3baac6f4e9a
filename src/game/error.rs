//! Duel setup errors

/// Reasons a duel cannot be started
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DuelError {
    #[error("A duel needs between 3 and 14 participants, got {count}")]
    InvalidParticipantCount { count: usize },

    #[error("Participant name at seat {seat} is empty")]
    EmptyName { seat: usize },

    #[error("Participant name '{name}' is used more than once")]
    DuplicateName { name: String },
}
