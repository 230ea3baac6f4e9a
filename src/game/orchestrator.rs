//! Duel lifecycle: round task, animation task and event fan-out

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use super::animation::AnimationClock;
use super::arena::ArenaLayout;
use super::duel::Game;
use super::engine::{EliminationEngine, RoundPhase, RoundRandom, RoundTiming};
use super::error::DuelError;
use super::events::DuelEvent;
use super::scheduler::ScheduledTask;
use super::snapshot::{DuelSnapshot, SnapshotBuilder};

/// Orchestrator configuration
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorConfig {
    pub layout: ArenaLayout,
    pub timing: RoundTiming,
    /// Animation frames per second
    pub frame_rate: u32,
    /// Snapshots published per second
    pub snapshot_rate: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            layout: ArenaLayout::default(),
            timing: RoundTiming::default(),
            frame_rate: 60,
            snapshot_rate: 20,
        }
    }
}

impl OrchestratorConfig {
    pub fn frame_duration(&self) -> Duration {
        Duration::from_micros((1_000_000 / self.frame_rate.max(1) as u64).max(1))
    }

    /// Frames between published snapshots
    pub fn snapshot_interval(&self) -> u32 {
        (self.frame_rate / self.snapshot_rate.max(1)).max(1)
    }
}

/// State shared by the round task and the animation task
struct DuelState {
    game: Option<Game>,
    engine: EliminationEngine,
    clock: AnimationClock,
    snapshots: SnapshotBuilder,
}

impl DuelState {
    fn snapshot(&self) -> Option<DuelSnapshot> {
        self.game.as_ref().map(|game| {
            SnapshotBuilder::build(
                game.id,
                self.clock.frames(),
                game.running,
                self.engine.rounds_played(),
                game.winner_info(),
                &game.participants,
            )
        })
    }
}

/// Runs one duel at a time and publishes its lifecycle
pub struct RoundOrchestrator {
    config: OrchestratorConfig,
    state: Arc<Mutex<DuelState>>,
    events_tx: broadcast::Sender<DuelEvent>,
    snapshot_tx: broadcast::Sender<DuelSnapshot>,
    round_task: Mutex<Option<ScheduledTask>>,
    animation_task: Mutex<Option<ScheduledTask>>,
}

impl RoundOrchestrator {
    pub fn new(config: OrchestratorConfig, random: Box<dyn RoundRandom>) -> Self {
        let (events_tx, _) = broadcast::channel(64);
        let (snapshot_tx, _) = broadcast::channel(64);

        let state = DuelState {
            game: None,
            engine: EliminationEngine::new(config.timing, random),
            clock: AnimationClock::default(),
            snapshots: SnapshotBuilder::new(config.snapshot_interval()),
        };

        Self {
            config,
            state: Arc::new(Mutex::new(state)),
            events_tx,
            snapshot_tx,
            round_task: Mutex::new(None),
            animation_task: Mutex::new(None),
        }
    }

    /// Receive lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<DuelEvent> {
        self.events_tx.subscribe()
    }

    /// Receive render snapshots at the snapshot rate
    pub fn subscribe_snapshots(&self) -> broadcast::Receiver<DuelSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Current render snapshot, `None` before any duel
    pub fn snapshot(&self) -> Option<DuelSnapshot> {
        self.state.lock().snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().game.as_ref().is_some_and(|g| g.running)
    }

    pub fn round_phase(&self) -> RoundPhase {
        self.state.lock().engine.phase()
    }

    /// Seat a new duel and schedule its first round.
    ///
    /// Any duel already in progress is reset first. On error nothing changes.
    /// Must be called from within a tokio runtime.
    pub fn start<S: AsRef<str>>(&self, names: &[S]) -> Result<Uuid, DuelError> {
        let participants = self.config.layout.seat_participants(names)?;

        // Held across clear, seat and spawn so concurrent starts and resets serialize
        let mut round_task = self.round_task.lock();
        self.clear(&mut round_task);

        let mut game = Game::new(participants);
        game.running = true;
        let game_id = game.id;
        let count = game.participants.len();

        let first_delay = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            state.engine.reset();

            let _ = self.events_tx.send(DuelEvent::DuelStarted {
                game_id,
                participants: game.roster(),
            });

            let delay = state.engine.schedule_next_round(game.alive_count());
            if delay.is_none() {
                let winner = game.finish();
                let _ = self.events_tx.send(DuelEvent::GameOver { game_id, winner });
            }

            state.game = Some(game);
            state.snapshots.force_next();
            delay
        };

        info!(game_id = %game_id, participants = count, "Duel started");

        if let Some(delay) = first_delay {
            *round_task = Some(ScheduledTask::spawn(run_rounds(
                self.state.clone(),
                self.events_tx.clone(),
                game_id,
                delay,
            )));
        }
        drop(round_task);

        self.ensure_animation();
        Ok(game_id)
    }

    /// Cancel pending rounds and clear the duel
    pub fn reset(&self) {
        let mut round_task = self.round_task.lock();
        self.clear(&mut round_task);
    }

    /// Caller holds the `round_task` lock; `state` is always taken after it
    fn clear(&self, round_task: &mut Option<ScheduledTask>) {
        if let Some(mut task) = round_task.take() {
            task.cancel();
        }

        let mut state = self.state.lock();
        state.engine.reset();
        if let Some(game) = state.game.take() {
            let _ = self.events_tx.send(DuelEvent::DuelReset { game_id: game.id });
            info!(game_id = %game.id, "Duel reset");
        }
    }

    /// Start the animation loop once; it keeps running across duels
    fn ensure_animation(&self) {
        let mut slot = self.animation_task.lock();
        if slot.as_ref().is_some_and(ScheduledTask::is_active) {
            return;
        }

        *slot = Some(ScheduledTask::spawn(run_animation(
            self.state.clone(),
            self.snapshot_tx.clone(),
            self.config.frame_duration(),
        )));
        debug!("Animation loop started");
    }
}

/// Round loop for one game: wait, fire, wait, resolve, repeat
async fn run_rounds(
    state: Arc<Mutex<DuelState>>,
    events_tx: broadcast::Sender<DuelEvent>,
    game_id: Uuid,
    first_delay: Duration,
) {
    let mut delay = first_delay;

    loop {
        tokio::time::sleep(delay).await;

        let resolve_delay = {
            let mut guard = state.lock();
            let DuelState {
                game,
                engine,
                snapshots,
                ..
            } = &mut *guard;

            let Some(game) = game.as_mut().filter(|g| g.id == game_id && g.running) else {
                return;
            };
            let Some(round) = engine.fire(&mut game.participants) else {
                return;
            };
            let round_number = round.number;
            let participant_ids = round.alive_at_fire.clone();

            info!(
                game_id = %game_id,
                round = round_number,
                shooters = participant_ids.len(),
                "Shots fired"
            );
            let _ = events_tx.send(DuelEvent::ShotsFired {
                game_id,
                round: round_number,
                participant_ids,
            });
            snapshots.force_next();

            engine.begin_resolving()
        };

        let Some(resolve_delay) = resolve_delay else {
            return;
        };
        tokio::time::sleep(resolve_delay).await;

        let next_delay = {
            let mut guard = state.lock();
            let DuelState {
                game,
                engine,
                snapshots,
                ..
            } = &mut *guard;

            let Some(game) = game.as_mut().filter(|g| g.id == game_id && g.running) else {
                return;
            };

            let outcome = engine.resolve(&mut game.participants);
            let round = engine.rounds_played();
            let alive = game.alive_count();

            info!(
                game_id = %game_id,
                round,
                survivors = outcome.survivors.len(),
                killed = outcome.killed.len(),
                "Round resolved"
            );
            let _ = events_tx.send(DuelEvent::RoundResolved {
                game_id,
                round,
                survivor_ids: outcome.survivors,
                killed_ids: outcome.killed,
            });
            snapshots.force_next();

            let next = match engine.finish_round(alive) {
                RoundPhase::GameOver => None,
                _ => engine.schedule_next_round(alive),
            };
            if next.is_none() {
                let winner = game.finish();
                info!(
                    game_id = %game_id,
                    winner = winner.as_ref().map(|w| w.name.as_str()).unwrap_or("No one"),
                    "Game over"
                );
                let _ = events_tx.send(DuelEvent::GameOver { game_id, winner });
            }
            next
        };

        match next_delay {
            Some(next) => delay = next,
            None => return,
        }
    }
}

/// Frame loop: ease visual fields and publish snapshots
async fn run_animation(
    state: Arc<Mutex<DuelState>>,
    snapshot_tx: broadcast::Sender<DuelSnapshot>,
    frame_duration: Duration,
) {
    let mut frames = interval(frame_duration);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        frames.tick().await;

        let snapshot = {
            let mut guard = state.lock();
            let state = &mut *guard;
            match state.game.as_mut() {
                Some(game) => state.clock.tick(&mut game.participants),
                None => state.clock.tick(&mut []),
            }

            if state.snapshots.should_send() {
                state.snapshot()
            } else {
                None
            }
        };

        if let Some(snapshot) = snapshot {
            let _ = snapshot_tx.send(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::engine::SeededRandom;

    fn orchestrator() -> RoundOrchestrator {
        RoundOrchestrator::new(
            OrchestratorConfig::default(),
            Box::new(SeededRandom::new(1)),
        )
    }

    #[test]
    fn config_derives_intervals() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.frame_duration(), Duration::from_micros(16_666));
        assert_eq!(config.snapshot_interval(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_roster_leaves_no_game() {
        let orchestrator = orchestrator();
        let err = orchestrator.start(&["Ada", "Bo"]).unwrap_err();
        assert_eq!(err, DuelError::InvalidParticipantCount { count: 2 });
        assert!(orchestrator.snapshot().is_none());
        assert!(!orchestrator.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn start_arms_first_round() {
        let orchestrator = orchestrator();
        let mut events = orchestrator.subscribe();

        let game_id = orchestrator.start(&["Ada", "Bo", "Cy"]).unwrap();
        assert!(orchestrator.is_running());
        assert!(matches!(orchestrator.round_phase(), RoundPhase::Armed { .. }));

        match events.recv().await.unwrap() {
            DuelEvent::DuelStarted {
                game_id: started,
                participants,
            } => {
                assert_eq!(started, game_id);
                assert_eq!(participants.len(), 3);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failed_restart_keeps_running_duel() {
        let orchestrator = orchestrator();
        let game_id = orchestrator.start(&["Ada", "Bo", "Cy"]).unwrap();

        assert!(orchestrator.start(&["Solo"]).is_err());
        assert!(orchestrator.is_running());
        assert_eq!(orchestrator.snapshot().unwrap().game_id, game_id);
    }
}
