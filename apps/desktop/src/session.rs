//! Maps terminal commands onto controller operations, playing the interaction layer's part.

use anyhow::{bail, Result};
use match_core::{CelebrationScheduler, MatchController};
use shared::{
    domain::{KeyId, NavigationAction, ValueId},
    protocol::GameView,
};

use crate::commands::{Command, HELP};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Redraw,
    Notice(String),
    Quit,
}

pub fn execute<S: CelebrationScheduler>(
    controller: &mut MatchController<S>,
    command: Command,
) -> Result<Outcome> {
    match command {
        Command::Drag { key, value } => {
            let (key, value) = resolve_drag(&controller.view(), key, value)?;
            controller.drop_gesture(key, value)?;
            Ok(Outcome::Redraw)
        }
        Command::Next => {
            if controller.view().navigation == NavigationAction::Restart {
                return Ok(Outcome::Notice(
                    "This is the last page; type 'restart' to play again.".to_string(),
                ));
            }
            controller.advance_page();
            Ok(Outcome::Redraw)
        }
        Command::Restart => {
            controller.restart();
            Ok(Outcome::Redraw)
        }
        Command::Show => Ok(Outcome::Redraw),
        Command::Help => Ok(Outcome::Notice(HELP.to_string())),
        Command::Quit => Ok(Outcome::Quit),
    }
}

/// Turns displayed positions into identifiers, refusing fixed tiles before any drop happens.
fn resolve_drag(view: &GameView, key_pos: usize, value_pos: usize) -> Result<(KeyId, ValueId)> {
    let Some(key_tile) = key_pos.checked_sub(1).and_then(|i| view.keys.get(i)) else {
        bail!("there is no key tile {key_pos} (1..={})", view.keys.len());
    };
    let Some(value_tile) = value_pos.checked_sub(1).and_then(|i| view.values.get(i)) else {
        bail!("there is no value tile {value_pos} (1..={})", view.values.len());
    };

    if key_tile.matched {
        bail!("key tile {key_pos} is already matched and fixed in place");
    }
    if value_tile.fixed {
        bail!("value tile {value_pos} is already matched");
    }

    Ok((key_tile.key.clone(), value_tile.value.clone()))
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use match_core::GameState;
    use shared::{
        dataset::Dataset,
        domain::{Feedback, PageNumber},
    };

    use super::*;

    struct NoopScheduler;

    impl CelebrationScheduler for NoopScheduler {
        fn schedule(&mut self, _generation: u64, _after: Duration) {}
        fn cancel(&mut self) {}
    }

    fn controller(raw: &str) -> MatchController<NoopScheduler> {
        let dataset = Arc::new(Dataset::from_json_str(raw).expect("dataset"));
        MatchController::new(GameState::with_seed(dataset, 5), NoopScheduler)
    }

    fn position_of_value(view: &GameView, value: &str) -> usize {
        view.values
            .iter()
            .position(|tile| tile.value.as_str() == value)
            .expect("value on board")
            + 1
    }

    fn position_of_key(view: &GameView, key: &str) -> usize {
        view.keys
            .iter()
            .position(|tile| tile.key.as_str() == key)
            .expect("key on board")
            + 1
    }

    #[test]
    fn drag_by_position_reaches_the_matcher() {
        let mut controller = controller(r#"{"1": {"a": "1", "b": "2"}}"#);
        let view = controller.view();
        let key = position_of_key(&view, "a");
        let value = position_of_value(&view, "1");

        let outcome = execute(&mut controller, Command::Drag { key, value }).expect("drag");

        assert_eq!(outcome, Outcome::Redraw);
        assert_eq!(controller.view().feedback, Feedback::Correct);
        assert_eq!(controller.view().tries, 1);
    }

    #[test]
    fn fixed_tiles_are_refused_before_counting() {
        let mut controller = controller(r#"{"1": {"a": "1", "b": "2"}}"#);
        let view = controller.view();
        let a = position_of_key(&view, "a");
        let b = position_of_key(&view, "b");
        let one = position_of_value(&view, "1");
        let two = position_of_value(&view, "2");
        execute(&mut controller, Command::Drag { key: a, value: one }).expect("match a");

        assert!(execute(&mut controller, Command::Drag { key: a, value: two }).is_err());
        assert!(execute(&mut controller, Command::Drag { key: b, value: one }).is_err());
        assert_eq!(controller.view().tries, 1);
    }

    #[test]
    fn out_of_range_positions_are_refused() {
        let mut controller = controller(r#"{"1": {"a": "1"}}"#);

        let err = execute(&mut controller, Command::Drag { key: 2, value: 1 })
            .expect_err("no second key");
        assert!(err.to_string().contains("key tile 2"));
        assert_eq!(controller.view().tries, 0);
    }

    #[test]
    fn next_on_last_page_suggests_restart() {
        let mut controller = controller(r#"{"1": {"a": "1"}, "2": {"b": "2"}}"#);

        assert_eq!(
            execute(&mut controller, Command::Next).expect("next"),
            Outcome::Redraw
        );
        assert_eq!(controller.view().page, PageNumber(2));

        let outcome = execute(&mut controller, Command::Next).expect("next at end");
        assert!(matches!(outcome, Outcome::Notice(text) if text.contains("restart")));
        assert_eq!(controller.view().page, PageNumber(2));

        execute(&mut controller, Command::Restart).expect("restart");
        assert_eq!(controller.view().page, PageNumber(1));
    }

    #[test]
    fn quit_and_help() {
        let mut controller = controller(r#"{"1": {"a": "1"}}"#);

        assert_eq!(
            execute(&mut controller, Command::Quit).expect("quit"),
            Outcome::Quit
        );
        assert!(matches!(
            execute(&mut controller, Command::Help).expect("help"),
            Outcome::Notice(text) if text.contains("drag <key#> <value#>")
        ));
    }
}
