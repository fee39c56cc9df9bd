//! Error types for the assertion engine.
//!
//! Assertion failures are never errors in their own right: they are
//! reported through a [`Reporter`](crate::Reporter). The types here cover
//! the fail-fast outcome and operand conversion.

use thiserror::Error;

/// Outcome of a fail-fast assertion whose condition was false.
///
/// Every `assert::*` operation returns `Result<(), Aborted>`. The caller
/// must not continue past an `Err(Aborted)`; propagate it with `?`. A
/// `#[test]` returning `Result<(), Aborted>` is reported as failed when it
/// ends in this error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("test aborted by a failed assertion")]
pub struct Aborted;

/// Error converting a `Serialize` operand into a [`Value`](crate::Value).
#[derive(Debug, Error)]
pub enum ValueError {
    /// The serializer rejected the input (e.g. a map with non-string keys).
    #[error("failed to convert operand: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for operand conversion.
pub type ValueResult<T> = Result<T, ValueError>;
