use std::{collections::BTreeSet, path::Path, sync::Arc, time::Duration};

use match_core::{CelebrationScheduler, GameState, MatchController};
use shared::{
    dataset::Dataset,
    domain::{Feedback, KeyId, NavigationAction, PageNumber},
};

struct NoopScheduler;

impl CelebrationScheduler for NoopScheduler {
    fn schedule(&mut self, _generation: u64, _after: Duration) {}
    fn cancel(&mut self) {}
}

fn bundled_dataset() -> Arc<Dataset> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/images.json");
    Arc::new(Dataset::load(path).expect("bundled dataset"))
}

#[test]
fn full_playthrough_of_bundled_dataset() {
    let dataset = bundled_dataset();
    let mut controller =
        MatchController::new(GameState::with_seed(Arc::clone(&dataset), 2024), NoopScheduler);

    for (number, page) in dataset.pages() {
        assert_eq!(controller.view().page, number);
        let expected_tries = page.len() as u32 + 1;

        // One miss, then every pair.
        let (first_key, _) = &page.pairs()[0];
        let wrong_value = page
            .values()
            .find(|value| page.value_for(first_key) != Some(*value));
        if let Some(wrong_value) = wrong_value {
            controller
                .drop_gesture(first_key.clone(), wrong_value.clone())
                .expect("wrong drop is still a drop");
            assert_eq!(controller.view().feedback, Feedback::Incorrect);
        }

        for (key, value) in page.pairs() {
            controller
                .drop_gesture(key.clone(), value.clone())
                .expect("correct drop");
        }

        let view = controller.view();
        assert!(view.round_complete);
        assert_eq!(view.matched_count(), page.len());
        if page.len() > 1 {
            assert_eq!(view.tries, expected_tries);
        }

        if dataset.is_last_page(number) {
            assert_eq!(view.navigation, NavigationAction::Restart);
        } else {
            assert_eq!(view.navigation, NavigationAction::Next);
            controller.advance_page();
        }
    }

    controller.advance_page();
    assert_eq!(controller.view().page, PageNumber(dataset.page_count()));

    controller.restart();
    let view = controller.view();
    assert_eq!(view.page, PageNumber(1));
    assert_eq!(view.tries, 0);
    assert_eq!(view.matched_count(), 0);
}

#[test]
fn shuffles_vary_across_seeds_but_keep_contents() {
    let dataset = bundled_dataset();
    let page = dataset.page(PageNumber(2)).expect("page 2");
    let expected: BTreeSet<_> = page.keys().cloned().collect();

    let orders: BTreeSet<Vec<KeyId>> = (0..16)
        .map(|seed| {
            let mut state = GameState::with_seed(Arc::clone(&dataset), seed);
            state.advance_page();
            let keys = state.round().shuffled_keys().to_vec();
            assert_eq!(keys.iter().cloned().collect::<BTreeSet<_>>(), expected);
            keys
        })
        .collect();

    assert!(orders.len() > 1, "16 seeds should not all give one order");
}
