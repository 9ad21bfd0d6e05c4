use crate::models::{CallbackHandle, MethodId, ValueKind};

/// Failures surfaced across the callback boundary.
///
/// None of these is ever folded into a default return value: a caller that
/// receives `Ok(false)` or `Ok(0)` got a real result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Stale or unknown callback handle: {0}")]
    StaleHandle(CallbackHandle),
    #[error("No public method bound to id {0}")]
    UnknownMethod(MethodId),
    #[error("Method `{name}` collides with `{existing}` (id {id})")]
    MethodCollision {
        name: String,
        existing: String,
        id: MethodId,
    },
    #[error("Wrong number of arguments: expected {expected}, got {found}")]
    Arity { expected: usize, found: usize },
    #[error("Argument {index} has kind {found}, expected {expected}")]
    ArgumentKind {
        index: usize,
        expected: ValueKind,
        found: ValueKind,
    },
    #[error("Call returned {found}, caller expected {expected}")]
    ReturnKind {
        expected: ValueKind,
        found: ValueKind,
    },
    #[error("Callback raised: {0}")]
    Raised(String),
    #[error("Callbacks are only allowed from the thread that owns the table")]
    WrongThread,
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
