//! Application state shared across routes

use std::sync::Arc;

use crate::config::Config;
use crate::game::{RoundOrchestrator, SeededRandom};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub orchestrator: Arc<RoundOrchestrator>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let orchestrator = RoundOrchestrator::new(
            config.orchestrator(),
            Box::new(SeededRandom::from_entropy()),
        );
        Self::with_orchestrator(config, orchestrator)
    }

    /// Build state around an existing orchestrator (tests inject scripted randomness)
    pub fn with_orchestrator(config: Config, orchestrator: RoundOrchestrator) -> Self {
        Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
        }
    }
}
