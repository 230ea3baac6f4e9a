//! Per-frame easing of visual fields, independent of round cadence

use super::participant::{Participant, MAX_DEATH_ROTATION};

/// Flash fade per frame
pub const FLASH_DECAY_STEP: f32 = 0.1;
/// Death tilt per frame, in radians
pub const DEATH_ROTATION_STEP: f32 = 0.1;

/// Advances muzzle flash and death rotation once per render tick
#[derive(Debug, Clone, Copy)]
pub struct AnimationClock {
    flash_step: f32,
    rotation_step: f32,
    frames: u64,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new(FLASH_DECAY_STEP, DEATH_ROTATION_STEP)
    }
}

impl AnimationClock {
    pub fn new(flash_step: f32, rotation_step: f32) -> Self {
        Self {
            flash_step,
            rotation_step,
            frames: 0,
        }
    }

    /// Frames ticked so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advance one frame. Never changes `alive`.
    pub fn tick(&mut self, participants: &mut [Participant]) {
        self.frames += 1;
        for participant in participants.iter_mut() {
            participant.decay_muzzle_flash(self.flash_step);
            if !participant.alive {
                participant.advance_death_rotation(self.rotation_step);
            }
        }
    }

    /// True once every visual field sits at its bound
    pub fn is_settled(participants: &[Participant]) -> bool {
        participants.iter().all(|p| {
            !p.flash_visible() && (p.alive || p.death_rotation >= MAX_DEATH_ROTATION)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::arena::ArenaLayout;

    fn roster() -> Vec<Participant> {
        ArenaLayout::default()
            .seat_participants(&["Ada", "Bo", "Cy", "Di"])
            .unwrap()
    }

    #[test]
    fn tick_decays_flash_and_rotates_dead() {
        let mut clock = AnimationClock::default();
        let mut participants = roster();
        participants[0].start_firing();
        participants[1].kill();

        clock.tick(&mut participants);

        assert!((participants[0].muzzle_flash - 0.9).abs() < 1e-6);
        assert!((participants[1].death_rotation - 0.1).abs() < 1e-6);
        assert_eq!(participants[2].death_rotation, 0.0);
        assert_eq!(clock.frames(), 1);
    }

    #[test]
    fn tick_never_touches_alive() {
        let mut clock = AnimationClock::default();
        let mut participants = roster();
        participants[3].kill();

        for _ in 0..50 {
            clock.tick(&mut participants);
        }

        let alive: Vec<bool> = participants.iter().map(|p| p.alive).collect();
        assert_eq!(alive, vec![true, true, true, false]);
    }

    #[test]
    fn settles_within_bounded_frames() {
        let mut clock = AnimationClock::default();
        let mut participants = roster();
        for p in participants.iter_mut() {
            p.start_firing();
        }
        for p in participants.iter_mut().skip(1) {
            p.kill();
        }
        assert!(!AnimationClock::is_settled(&participants));

        // ceil(π/2 / 0.1) = 16 frames for the tilt, 11 for the flash
        for _ in 0..16 {
            clock.tick(&mut participants);
        }
        assert!(AnimationClock::is_settled(&participants));
        assert!(participants.iter().all(|p| p.muzzle_flash == 0.0));
        assert!(participants
            .iter()
            .skip(1)
            .all(|p| p.death_rotation == MAX_DEATH_ROTATION));
    }

    #[test]
    fn ticking_settled_state_is_harmless() {
        let mut clock = AnimationClock::default();
        let mut participants = roster();
        participants[0].kill();
        for _ in 0..20 {
            clock.tick(&mut participants);
        }
        let before: Vec<(f32, f32)> = participants
            .iter()
            .map(|p| (p.muzzle_flash, p.death_rotation))
            .collect();

        for _ in 0..1000 {
            clock.tick(&mut participants);
        }
        let after: Vec<(f32, f32)> = participants
            .iter()
            .map(|p| (p.muzzle_flash, p.death_rotation))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn empty_roster_tick_is_noop() {
        let mut clock = AnimationClock::default();
        clock.tick(&mut []);
        assert!(AnimationClock::is_settled(&[]));
    }
}
