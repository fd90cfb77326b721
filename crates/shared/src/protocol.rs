use serde::{Deserialize, Serialize};

use crate::domain::{Feedback, KeyId, NavigationAction, PageNumber, ValueId};

/// Everything that can move the game forward: player gestures, navigation and timer expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum GameEvent {
    Drop {
        key: KeyId,
        value: ValueId,
    },
    AdvancePage,
    Restart,
    CelebrationExpired {
        generation: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTileView {
    pub key: KeyId,
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueTileView {
    pub value: ValueId,
    pub matched: bool,
    /// Fixed tiles no longer accept drops.
    pub fixed: bool,
}

/// Snapshot handed to the presentation layer after every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub page: PageNumber,
    pub page_count: usize,
    pub keys: Vec<KeyTileView>,
    pub values: Vec<ValueTileView>,
    pub feedback: Feedback,
    pub tries: u32,
    pub celebrating: bool,
    pub navigation: NavigationAction,
    pub round_complete: bool,
}

impl GameView {
    pub fn feedback_message(&self) -> Option<&'static str> {
        self.feedback.message()
    }

    pub fn matched_count(&self) -> usize {
        self.keys.iter().filter(|tile| tile.matched).count()
    }
}
