//! Shared helpers for duel integration tests

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::broadcast;

use duel_server::game::{
    DuelEvent, OrchestratorConfig, RoundOrchestrator, RoundRandom, RoundTiming, SeededRandom,
};

/// Replays fixed draws, then falls back to the minimum delay and first seat
pub struct Scripted {
    fractions: VecDeque<f64>,
    indices: VecDeque<usize>,
}

impl Scripted {
    pub fn new(fractions: &[f64], indices: &[usize]) -> Self {
        Self {
            fractions: fractions.iter().copied().collect(),
            indices: indices.iter().copied().collect(),
        }
    }
}

impl RoundRandom for Scripted {
    fn delay_fraction(&mut self) -> f64 {
        self.fractions.pop_front().unwrap_or(0.0)
    }

    fn survivor_index(&mut self, _alive: usize) -> usize {
        self.indices.pop_front().unwrap_or(0)
    }
}

pub fn scripted_orchestrator(fractions: &[f64], indices: &[usize]) -> RoundOrchestrator {
    RoundOrchestrator::new(
        OrchestratorConfig::default(),
        Box::new(Scripted::new(fractions, indices)),
    )
}

/// Millisecond rounds on real time, for multi-threaded tests
pub fn quick_orchestrator(seed: u64) -> RoundOrchestrator {
    let config = OrchestratorConfig {
        timing: RoundTiming {
            min_delay: Duration::from_millis(1),
            delay_span: Duration::from_millis(1),
            resolve_delay: Duration::from_millis(1),
        },
        ..OrchestratorConfig::default()
    };
    RoundOrchestrator::new(config, Box::new(SeededRandom::new(seed)))
}

pub fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("Gunslinger {}", i + 1)).collect()
}

/// Next event, failing the test if none arrives within 10s of (virtual) time
pub async fn next_event(rx: &mut broadcast::Receiver<DuelEvent>) -> DuelEvent {
    tokio::time::timeout(Duration::from_secs(10), rx.recv())
        .await
        .expect("timed out waiting for duel event")
        .expect("event channel closed")
}

/// Collect events up to and including the first `GameOver`
pub async fn events_until_game_over(rx: &mut broadcast::Receiver<DuelEvent>) -> Vec<DuelEvent> {
    let mut events = Vec::new();
    loop {
        let event = next_event(rx).await;
        let done = matches!(event, DuelEvent::GameOver { .. });
        events.push(event);
        if done {
            return events;
        }
    }
}
