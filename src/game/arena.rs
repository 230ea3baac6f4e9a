//! Roster validation and circular seating

use std::collections::HashSet;
use std::f32::consts::{FRAC_PI_2, TAU};

use super::error::DuelError;
use super::participant::{Participant, ParticipantId};

/// Fewest participants a duel accepts
pub const MIN_PARTICIPANTS: usize = 3;
/// Most participants a duel accepts
pub const MAX_PARTICIPANTS: usize = 14;

/// Seating circle radius as a fraction of the smaller half-dimension
const SEAT_RADIUS_FACTOR: f32 = 0.6;

/// Arena dimensions used to place participants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaLayout {
    pub width: f32,
    pub height: f32,
}

impl Default for ArenaLayout {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl ArenaLayout {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Radius of the seating circle
    pub fn seat_radius(&self) -> f32 {
        let (cx, cy) = self.center();
        cx.min(cy) * SEAT_RADIUS_FACTOR
    }

    /// Position and inward facing for seat `index` of `count`
    /// Returns (x, y, facing)
    pub fn seat(&self, index: usize, count: usize) -> (f32, f32, f32) {
        let (cx, cy) = self.center();
        let radius = self.seat_radius();
        let angle = index as f32 / count as f32 * TAU;
        (
            cx + angle.cos() * radius,
            cy + angle.sin() * radius,
            angle + FRAC_PI_2,
        )
    }

    /// Validate `names` and seat them around the circle in order
    pub fn seat_participants<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<Vec<Participant>, DuelError> {
        let names = validate_roster(names)?;
        let count = names.len();

        Ok(names
            .into_iter()
            .enumerate()
            .map(|(index, name)| {
                let (x, y, facing) = self.seat(index, count);
                Participant::new(ParticipantId(index), name, x, y, facing)
            })
            .collect())
    }
}

/// Check roster size and names, returning the trimmed names
pub fn validate_roster<S: AsRef<str>>(names: &[S]) -> Result<Vec<String>, DuelError> {
    let count = names.len();
    if !(MIN_PARTICIPANTS..=MAX_PARTICIPANTS).contains(&count) {
        return Err(DuelError::InvalidParticipantCount { count });
    }

    let mut seen = HashSet::with_capacity(count);
    let mut trimmed = Vec::with_capacity(count);

    for (seat, name) in names.iter().enumerate() {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(DuelError::EmptyName { seat });
        }
        if !seen.insert(name) {
            return Err(DuelError::DuplicateName {
                name: name.to_string(),
            });
        }
        trimmed.push(name.to_string());
    }

    Ok(trimmed)
}
