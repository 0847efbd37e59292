//! Shared application state.

use std::sync::{Arc, Mutex};

use twotruths_core::clock::Clock;
use twotruths_core::rng::GameRng;
use twotruths_game::repository::GameRepository;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository over the partitioned table store.
    pub repo: GameRepository,
    /// Clock used for session creation timestamps.
    pub clock: Arc<dyn Clock + Send + Sync>,
    /// Random source for presentation shuffles.
    pub rng: Arc<Mutex<dyn GameRng + Send>>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        repo: GameRepository,
        clock: Arc<dyn Clock + Send + Sync>,
        rng: Arc<Mutex<dyn GameRng + Send>>,
    ) -> Self {
        Self { repo, clock, rng }
    }
}
