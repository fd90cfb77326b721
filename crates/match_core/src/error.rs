use shared::domain::{KeyId, PageNumber, ValueId};
use thiserror::Error;

/// Reasons a drop gesture is refused before it reaches the matcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GestureError {
    #[error("key '{key}' is not on page {page}")]
    UnknownKey { key: KeyId, page: PageNumber },
    #[error("value '{value}' is not on page {page}")]
    UnknownValue { value: ValueId, page: PageNumber },
    #[error("key '{0}' is already matched and can no longer be dragged")]
    KeyFixed(KeyId),
    #[error("value '{0}' is already matched and no longer accepts drops")]
    ValueFixed(ValueId),
}
