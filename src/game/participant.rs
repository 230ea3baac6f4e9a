//! Per-participant duel state

use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;
use std::fmt;

/// Upper bound of the death tilt, in radians
pub const MAX_DEATH_ROTATION: f32 = FRAC_PI_2;

/// Seat index of a participant (0-based, seating order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub usize);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Participant state in a duel (authoritative)
#[derive(Debug, Clone)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,

    // Seating
    pub x: f32,
    pub y: f32,
    /// Base facing angle in radians
    pub facing: f32,

    // Simulation
    pub alive: bool,
    pub firing: bool,

    // Visual
    /// Muzzle flash opacity in [0, 1]
    pub muzzle_flash: f32,
    /// Death tilt in [0, π/2]
    pub death_rotation: f32,
}

impl Participant {
    pub fn new(id: ParticipantId, name: String, x: f32, y: f32, facing: f32) -> Self {
        Self {
            id,
            name,
            x,
            y,
            facing,
            alive: true,
            firing: false,
            muzzle_flash: 0.0,
            death_rotation: 0.0,
        }
    }

    /// Begin a fire event. Dead participants stay silent.
    pub fn start_firing(&mut self) {
        if !self.alive {
            return;
        }
        self.firing = true;
        self.muzzle_flash = 1.0;
    }

    /// Fade the muzzle flash by `step`, ending the fire event at zero
    pub fn decay_muzzle_flash(&mut self, step: f32) {
        if !self.firing || self.muzzle_flash <= 0.0 {
            return;
        }

        let next = self.muzzle_flash - step;
        // Snap float residue (1.0 - 10 * 0.1) to zero
        if next <= f32::EPSILON {
            self.muzzle_flash = 0.0;
            self.firing = false;
        } else {
            self.muzzle_flash = next;
        }
    }

    /// Mark dead. Calling again has no effect.
    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Ease the death tilt toward π/2
    pub fn advance_death_rotation(&mut self, step: f32) {
        if self.alive || self.death_rotation >= MAX_DEATH_ROTATION {
            return;
        }
        self.death_rotation = (self.death_rotation + step.max(0.0)).min(MAX_DEATH_ROTATION);
    }

    /// Angle the renderer should draw the figure at
    pub fn render_angle(&self) -> f32 {
        if self.alive {
            self.facing
        } else {
            self.death_rotation
        }
    }

    /// Whether the flash is still visible this frame
    pub fn flash_visible(&self) -> bool {
        self.firing && self.muzzle_flash > 0.0
    }
}
