//! Render snapshots for the stick-figure renderer

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::events::ParticipantInfo;
use super::participant::{Participant, ParticipantId};

/// Everything the renderer needs to draw one participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantView {
    pub id: ParticipantId,
    pub name: String,
    pub x: f32,
    pub y: f32,
    /// Facing while alive, death tilt once dead
    pub angle: f32,
    pub alive: bool,
    pub firing: bool,
    pub muzzle_flash: f32,
    pub death_rotation: f32,
}

impl From<&Participant> for ParticipantView {
    fn from(p: &Participant) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            x: p.x,
            y: p.y,
            angle: p.render_angle(),
            alive: p.alive,
            firing: p.flash_visible(),
            muzzle_flash: p.muzzle_flash,
            death_rotation: p.death_rotation,
        }
    }
}

/// Full picture of a duel at one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelSnapshot {
    pub game_id: Uuid,
    pub frame: u64,
    pub running: bool,
    pub round: u32,
    pub winner: Option<ParticipantInfo>,
    pub participants: Vec<ParticipantView>,
}

/// Decides which animation frames get published as snapshots
pub struct SnapshotBuilder {
    /// Frames since last snapshot
    frames_since_snapshot: u32,
    /// Snapshot interval in frames
    snapshot_interval: u32,
}

impl SnapshotBuilder {
    pub fn new(snapshot_interval: u32) -> Self {
        Self {
            frames_since_snapshot: 0,
            snapshot_interval: snapshot_interval.max(1),
        }
    }

    /// Check if it's time to send a snapshot
    pub fn should_send(&mut self) -> bool {
        self.frames_since_snapshot += 1;
        if self.frames_since_snapshot >= self.snapshot_interval {
            self.frames_since_snapshot = 0;
            true
        } else {
            false
        }
    }

    /// Force snapshot on next check (used for lifecycle events)
    pub fn force_next(&mut self) {
        self.frames_since_snapshot = self.snapshot_interval;
    }

    pub fn build(
        game_id: Uuid,
        frame: u64,
        running: bool,
        round: u32,
        winner: Option<ParticipantInfo>,
        participants: &[Participant],
    ) -> DuelSnapshot {
        DuelSnapshot {
            game_id,
            frame,
            running,
            round,
            winner,
            participants: participants.iter().map(ParticipantView::from).collect(),
        }
    }
}
