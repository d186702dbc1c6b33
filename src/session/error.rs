use thiserror::Error;

/// Rejected session operations. Each one is a caller bug or a UI action that
/// should have been disabled, so nothing is applied when one is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("level '{0}' has no questions")]
    EmptyLevel(String),
    #[error("no question is awaiting an answer")]
    NotActive,
    #[error("the current question has not been answered yet")]
    NotAnswered,
    #[error("this operation needs a {expected} question")]
    WrongKind { expected: &'static str },
    #[error("select an option before submitting")]
    NoSelection,
    #[error("place at least one segment before submitting")]
    EmptyCitation,
    #[error("option {index} is out of range ({count} options)")]
    OptionOutOfRange { index: usize, count: usize },
    #[error("no available segment with id {0}")]
    UnknownSegment(u32),
    #[error("no placed segment at position {position} ({len} placed)")]
    PositionOutOfRange { position: usize, len: usize },
    #[error("no token with id '{0}'")]
    UnknownToken(String),
    #[error("token '{0}' is locked")]
    TokenLocked(String),
    #[error("token '{0}' has no open selector")]
    SelectorClosed(String),
    #[error("'{option}' is not an option for token '{token}'")]
    InvalidTokenOption { token: String, option: String },
}
