//! Round and game state with event-driven transitions.
//!
//! `GameState::apply` is deterministic for a given state: the shuffle RNG lives
//! in the state, and anything time-based comes back out as an [`Effect`] for the
//! owner to schedule.

use std::{collections::BTreeSet, sync::Arc, time::Duration};

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use shared::{
    dataset::{Dataset, Page},
    domain::{Feedback, KeyId, NavigationAction, PageNumber, ValueId},
    protocol::{GameEvent, GameView, KeyTileView, ValueTileView},
};
use tracing::{debug, info, warn};

use crate::error::GestureError;

pub const DEFAULT_CELEBRATION_WINDOW: Duration = Duration::from_secs(10);

/// Side effects a transition asks its owner to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replaces any pending expiry; never stacks.
    ScheduleCelebrationExpiry { generation: u64, after: Duration },
    CancelCelebration,
}

/// Per-page play state, discarded wholesale on every page change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    shuffled_keys: Vec<KeyId>,
    shuffled_values: Vec<ValueId>,
    matched_keys: BTreeSet<KeyId>,
    matched_values: BTreeSet<ValueId>,
    tries: u32,
    feedback: Feedback,
    celebrating: bool,
}

impl RoundState {
    fn fresh(page: &Page, rng: &mut StdRng) -> Self {
        let mut shuffled_keys: Vec<KeyId> = page.keys().cloned().collect();
        let mut shuffled_values: Vec<ValueId> = page.values().cloned().collect();
        shuffled_keys.shuffle(rng);
        shuffled_values.shuffle(rng);

        Self {
            shuffled_keys,
            shuffled_values,
            matched_keys: BTreeSet::new(),
            matched_values: BTreeSet::new(),
            tries: 0,
            feedback: Feedback::None,
            celebrating: false,
        }
    }

    pub fn shuffled_keys(&self) -> &[KeyId] {
        &self.shuffled_keys
    }

    pub fn shuffled_values(&self) -> &[ValueId] {
        &self.shuffled_values
    }

    pub fn matched_keys(&self) -> &BTreeSet<KeyId> {
        &self.matched_keys
    }

    pub fn matched_values(&self) -> &BTreeSet<ValueId> {
        &self.matched_values
    }

    pub fn tries(&self) -> u32 {
        self.tries
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    pub fn celebrating(&self) -> bool {
        self.celebrating
    }

    pub fn is_key_matched(&self, key: &KeyId) -> bool {
        self.matched_keys.contains(key)
    }

    pub fn is_value_matched(&self, value: &ValueId) -> bool {
        self.matched_values.contains(value)
    }
}

#[derive(Debug, Clone)]
pub struct GameState {
    dataset: Arc<Dataset>,
    page: PageNumber,
    round: RoundState,
    generation: u64,
    celebration_window: Duration,
    rng: StdRng,
}

impl GameState {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self::with_rng(dataset, StdRng::from_os_rng())
    }

    /// Same seed and same events give the same shuffles.
    pub fn with_seed(dataset: Arc<Dataset>, seed: u64) -> Self {
        Self::with_rng(dataset, StdRng::seed_from_u64(seed))
    }

    fn with_rng(dataset: Arc<Dataset>, mut rng: StdRng) -> Self {
        let round = RoundState::fresh(dataset.first_page(), &mut rng);

        info!(page_count = dataset.page_count(), "starting game on page 1");
        Self {
            dataset,
            page: PageNumber::FIRST,
            round,
            generation: 0,
            celebration_window: DEFAULT_CELEBRATION_WINDOW,
            rng,
        }
    }

    pub fn with_celebration_window(mut self, window: Duration) -> Self {
        self.celebration_window = window;
        self
    }

    pub fn page(&self) -> PageNumber {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.dataset.page_count()
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.dataset.page(self.page)
    }

    pub fn apply(&mut self, event: GameEvent) -> Result<Vec<Effect>, GestureError> {
        match event {
            GameEvent::Drop { key, value } => self.drop_gesture(key, value),
            GameEvent::AdvancePage => Ok(self.advance_page()),
            GameEvent::Restart => Ok(self.restart()),
            GameEvent::CelebrationExpired { generation } => {
                self.celebration_expired(generation);
                Ok(Vec::new())
            }
        }
    }

    /// Replaces the round with a freshly shuffled one for `page`.
    ///
    /// Callers only pass pages that exist; an unknown page leaves state untouched.
    pub fn initialize_round(&mut self, page: PageNumber) -> Vec<Effect> {
        let Some(data) = self.dataset.page(page) else {
            warn!(%page, "ignoring round initialization for unknown page");
            return Vec::new();
        };

        self.round = RoundState::fresh(data, &mut self.rng);
        self.page = page;
        self.generation += 1;
        info!(%page, pairs = data.len(), "round initialized");
        vec![Effect::CancelCelebration]
    }

    /// Records one drop attempt. Every call counts as a try.
    pub fn attempt_match(&mut self, dragged: KeyId, dropped_onto: ValueId) -> Vec<Effect> {
        self.round.tries += 1;

        let is_match = self
            .current_page()
            .and_then(|page| page.key_for_value(&dropped_onto))
            .is_some_and(|owner| *owner == dragged);

        if !is_match {
            self.round.feedback = Feedback::Incorrect;
            debug!(
                key = %dragged,
                value = %dropped_onto,
                tries = self.round.tries,
                "incorrect match"
            );
            return Vec::new();
        }

        self.round.feedback = Feedback::Correct;
        self.round.matched_keys.insert(dragged.clone());
        self.round.matched_values.insert(dropped_onto.clone());
        self.round.celebrating = true;
        self.generation += 1;
        debug!(
            key = %dragged,
            value = %dropped_onto,
            tries = self.round.tries,
            matched = self.round.matched_keys.len(),
            "correct match"
        );

        vec![Effect::ScheduleCelebrationExpiry {
            generation: self.generation,
            after: self.celebration_window,
        }]
    }

    /// Applies the drop-target gating rule, then delegates to [`Self::attempt_match`].
    ///
    /// Refused gestures never count as tries.
    pub fn drop_gesture(
        &mut self,
        key: KeyId,
        value: ValueId,
    ) -> Result<Vec<Effect>, GestureError> {
        let page = self.page;
        let on_page = self.current_page();
        if !on_page.is_some_and(|data| data.contains_key(&key)) {
            return Err(GestureError::UnknownKey { key, page });
        }
        if !on_page.is_some_and(|data| data.contains_value(&value)) {
            return Err(GestureError::UnknownValue { value, page });
        }
        if !self.can_drag(&key) {
            return Err(GestureError::KeyFixed(key));
        }
        if !self.can_drop(&value) {
            return Err(GestureError::ValueFixed(value));
        }

        Ok(self.attempt_match(key, value))
    }

    pub fn can_drag(&self, key: &KeyId) -> bool {
        self.current_page().is_some_and(|page| page.contains_key(key))
            && !self.round.is_key_matched(key)
    }

    pub fn can_drop(&self, value: &ValueId) -> bool {
        self.current_page()
            .is_some_and(|page| page.contains_value(value))
            && !self.round.is_value_matched(value)
    }

    /// No-op on the last page; round state is left as is.
    pub fn advance_page(&mut self) -> Vec<Effect> {
        if self.dataset.is_last_page(self.page) {
            debug!(page = %self.page, "already on the last page; advance ignored");
            return Vec::new();
        }
        self.initialize_round(self.page.next())
    }

    pub fn restart(&mut self) -> Vec<Effect> {
        self.initialize_round(PageNumber::FIRST)
    }

    /// Clears the celebration if `generation` is still the latest one.
    pub fn celebration_expired(&mut self, generation: u64) {
        if generation != self.generation {
            debug!(
                generation,
                current = self.generation,
                "ignoring stale celebration expiry"
            );
            return;
        }
        self.round.celebrating = false;
    }

    pub fn is_round_complete(&self) -> bool {
        self.current_page()
            .is_some_and(|page| self.round.matched_keys.len() == page.len())
    }

    pub fn navigation(&self) -> NavigationAction {
        if self.dataset.is_last_page(self.page) {
            NavigationAction::Restart
        } else {
            NavigationAction::Next
        }
    }

    pub fn view(&self) -> GameView {
        let round = &self.round;
        GameView {
            page: self.page,
            page_count: self.page_count(),
            keys: round
                .shuffled_keys
                .iter()
                .map(|key| KeyTileView {
                    key: key.clone(),
                    matched: round.is_key_matched(key),
                })
                .collect(),
            values: round
                .shuffled_values
                .iter()
                .map(|value| {
                    let matched = round.is_value_matched(value);
                    ValueTileView {
                        value: value.clone(),
                        matched,
                        fixed: matched,
                    }
                })
                .collect(),
            feedback: round.feedback,
            tries: round.tries,
            celebrating: round.celebrating,
            navigation: self.navigation(),
            round_complete: self.is_round_complete(),
        }
    }
}

/// By-value form of [`GameState::apply`]; a refused gesture returns the state unchanged.
pub fn reduce(
    mut state: GameState,
    event: GameEvent,
) -> (GameState, Result<Vec<Effect>, GestureError>) {
    let outcome = state.apply(event);
    (state, outcome)
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
