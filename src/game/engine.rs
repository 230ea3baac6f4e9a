//! Round elimination engine: decides when the next volley happens and who survives it

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use tracing::{debug, warn};

use super::participant::{Participant, ParticipantId};

/// Round timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTiming {
    /// Shortest wait before a volley
    pub min_delay: Duration,
    /// Width of the random window added to `min_delay`
    pub delay_span: Duration,
    /// Time between a volley and its resolution
    pub resolve_delay: Duration,
}

impl Default for RoundTiming {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(3000),
            delay_span: Duration::from_millis(2000),
            resolve_delay: Duration::from_millis(500),
        }
    }
}

/// Source of the two random draws a round makes
pub trait RoundRandom: Send {
    /// Fraction in [0, 1) of the delay window to wait before firing
    fn delay_fraction(&mut self) -> f64;

    /// Index in [0, alive) of the round's survivor
    fn survivor_index(&mut self, alive: usize) -> usize;
}

/// Default random source backed by ChaCha
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Fresh source seeded from the thread RNG
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u64>())
    }
}

impl RoundRandom for SeededRandom {
    fn delay_fraction(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn survivor_index(&mut self, alive: usize) -> usize {
        self.rng.gen_range(0..alive)
    }
}

/// Round phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// No round scheduled
    Idle,
    /// Volley scheduled after `delay`
    Armed { delay: Duration },
    /// Volley fired, flash triggered
    Firing,
    /// Waiting out the resolution delay
    Resolving,
    /// Survivor chosen, the rest dead
    Resolved,
    /// One or zero participants remain
    GameOver,
}

/// One fire-then-resolve cycle
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub number: u32,
    /// Participants alive when the volley fired
    pub alive_at_fire: Vec<ParticipantId>,
    /// Chosen survivor, `None` until resolved or when nobody was left
    pub survivor: Option<ParticipantId>,
    pub fire_delay: Duration,
    pub resolve_delay: Duration,
}

/// Result of resolving a round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundOutcome {
    pub survivors: Vec<ParticipantId>,
    pub killed: Vec<ParticipantId>,
}

/// Drives the per-round state machine
pub struct EliminationEngine {
    timing: RoundTiming,
    random: Box<dyn RoundRandom>,
    phase: RoundPhase,
    rounds_played: u32,
    pending_delay: Duration,
    current: Option<Round>,
}

impl EliminationEngine {
    pub fn new(timing: RoundTiming, random: Box<dyn RoundRandom>) -> Self {
        Self {
            timing,
            random,
            phase: RoundPhase::Idle,
            rounds_played: 0,
            pending_delay: Duration::ZERO,
            current: None,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Return to `Idle` for a new game
    pub fn reset(&mut self) {
        self.phase = RoundPhase::Idle;
        self.rounds_played = 0;
        self.pending_delay = Duration::ZERO;
        self.current = None;
    }

    /// Pick the wait before the next volley, or `None` once the game is decided
    pub fn schedule_next_round(&mut self, alive_count: usize) -> Option<Duration> {
        if alive_count <= 1 {
            self.phase = RoundPhase::GameOver;
            return None;
        }

        match self.phase {
            RoundPhase::Idle | RoundPhase::Resolved => {}
            other => {
                warn!(phase = ?other, "Round scheduled out of order");
                return None;
            }
        }

        // Draws outside [0, 1) fall back to the shortest wait
        let fraction = self.random.delay_fraction();
        let fraction = if (0.0..1.0).contains(&fraction) {
            fraction
        } else {
            0.0
        };
        let delay = self.timing.min_delay + self.timing.delay_span.mul_f64(fraction);

        self.pending_delay = delay;
        self.phase = RoundPhase::Armed { delay };
        debug!(delay_ms = delay.as_millis() as u64, alive = alive_count, "Round armed");
        Some(delay)
    }

    /// Trigger the volley: every alive participant starts firing
    pub fn fire(&mut self, participants: &mut [Participant]) -> Option<&Round> {
        if !matches!(self.phase, RoundPhase::Armed { .. }) {
            warn!(phase = ?self.phase, "Fire ignored outside armed phase");
            return None;
        }

        let mut alive_at_fire = Vec::new();
        for participant in participants.iter_mut().filter(|p| p.alive) {
            participant.start_firing();
            alive_at_fire.push(participant.id);
        }

        self.rounds_played += 1;
        self.current = Some(Round {
            number: self.rounds_played,
            alive_at_fire,
            survivor: None,
            fire_delay: self.pending_delay,
            resolve_delay: self.timing.resolve_delay,
        });
        self.phase = RoundPhase::Firing;
        self.current.as_ref()
    }

    /// Start the resolution wait, returning how long it lasts
    pub fn begin_resolving(&mut self) -> Option<Duration> {
        if self.phase != RoundPhase::Firing {
            warn!(phase = ?self.phase, "Resolution wait requested outside firing phase");
            return None;
        }
        self.phase = RoundPhase::Resolving;
        Some(self.timing.resolve_delay)
    }

    /// Choose the survivor among those alive at fire time and kill the rest
    pub fn resolve(&mut self, participants: &mut [Participant]) -> RoundOutcome {
        if !matches!(self.phase, RoundPhase::Firing | RoundPhase::Resolving) {
            warn!(phase = ?self.phase, "Resolve ignored without a fired round");
            return RoundOutcome::default();
        }

        let Some(round) = self.current.as_mut() else {
            return RoundOutcome::default();
        };

        // Anyone who died since the volley no longer counts
        let candidates: Vec<ParticipantId> = round
            .alive_at_fire
            .iter()
            .copied()
            .filter(|id| participants.get(id.0).is_some_and(|p| p.alive))
            .collect();

        let outcome = match candidates.len() {
            0 => RoundOutcome::default(),
            1 => RoundOutcome {
                survivors: candidates,
                killed: Vec::new(),
            },
            alive => {
                let index = self.random.survivor_index(alive).min(alive - 1);
                let survivor = candidates[index];
                let killed: Vec<ParticipantId> = candidates
                    .iter()
                    .copied()
                    .filter(|id| *id != survivor)
                    .collect();

                for id in &killed {
                    participants[id.0].kill();
                }

                RoundOutcome {
                    survivors: vec![survivor],
                    killed,
                }
            }
        };

        round.survivor = outcome.survivors.first().copied();
        self.phase = RoundPhase::Resolved;
        outcome
    }

    /// Settle into `Idle` or `GameOver` after a resolve
    pub fn finish_round(&mut self, alive_count: usize) -> RoundPhase {
        if self.phase != RoundPhase::Resolved {
            return self.phase;
        }
        self.phase = if alive_count <= 1 {
            RoundPhase::GameOver
        } else {
            RoundPhase::Idle
        };
        self.phase
    }
}
