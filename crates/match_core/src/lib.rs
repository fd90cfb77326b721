//! Matching game controller: round state, drop gating and the celebration timer.

use shared::{
    domain::{KeyId, ValueId},
    protocol::{GameEvent, GameView},
};
use tracing::{debug, warn};

pub mod error;
pub mod state;
pub mod timer;

pub use error::GestureError;
pub use state::{reduce, Effect, GameState, RoundState, DEFAULT_CELEBRATION_WINDOW};
pub use timer::{CelebrationScheduler, TokioCelebrationTimer};

/// Owns the game state and carries out the effects its transitions ask for.
pub struct MatchController<S> {
    state: GameState,
    scheduler: S,
}

impl<S: CelebrationScheduler> MatchController<S> {
    pub fn new(state: GameState, scheduler: S) -> Self {
        Self { state, scheduler }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn view(&self) -> GameView {
        self.state.view()
    }

    pub fn handle(&mut self, event: GameEvent) -> Result<(), GestureError> {
        let name = event_name(&event);
        match self.state.apply(event) {
            Ok(effects) => {
                debug!(event = name, effects = effects.len(), "applied game event");
                self.run_effects(effects);
                Ok(())
            }
            Err(err) => {
                warn!(event = name, error = %err, "refused drop gesture");
                Err(err)
            }
        }
    }

    /// One completed drop gesture from the interaction layer.
    pub fn drop_gesture(&mut self, key: KeyId, value: ValueId) -> Result<(), GestureError> {
        self.handle(GameEvent::Drop { key, value })
    }

    pub fn advance_page(&mut self) {
        self.run_infallible(GameEvent::AdvancePage);
    }

    pub fn restart(&mut self) {
        self.run_infallible(GameEvent::Restart);
    }

    pub fn celebration_expired(&mut self, generation: u64) {
        self.run_infallible(GameEvent::CelebrationExpired { generation });
    }

    fn run_infallible(&mut self, event: GameEvent) {
        // Only drops can be refused.
        if let Err(err) = self.handle(event) {
            warn!(error = %err, "unexpected refusal of navigation event");
        }
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ScheduleCelebrationExpiry { generation, after } => {
                    self.scheduler.schedule(generation, after)
                }
                Effect::CancelCelebration => self.scheduler.cancel(),
            }
        }
    }
}

fn event_name(event: &GameEvent) -> &'static str {
    match event {
        GameEvent::Drop { .. } => "drop",
        GameEvent::AdvancePage => "advance_page",
        GameEvent::Restart => "restart",
        GameEvent::CelebrationExpired { .. } => "celebration_expired",
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
