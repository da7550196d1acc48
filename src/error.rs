// src/error.rs
use core::fmt;

/// Library-wide error for gr-digest-tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TdError {
    /// Caller passed a handle that cannot be used here (NIL, out of range, or already removed).
    InvalidArgument { what: &'static str },

    /// The slot allocator was asked to release a handle it never issued.
    InvalidState { what: &'static str },

    /// User tried to insert NaN/±inf into a centroid tree.
    /// `context` pinpoints where it came from (e.g., "sample value").
    NonFiniteInput { context: &'static str },

    /// Adding a weight would overflow `u64`; `context` names the counter that overflowed.
    WeightOverflow { context: &'static str },

    /// Internal invariant violation reported by `validate()` (should never happen).
    Invariant { what: &'static str },
}

impl fmt::Display for TdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TdError::InvalidArgument { what } => {
                write!(f, "tdigest: invalid argument: {}", what)
            }
            TdError::InvalidState { what } => {
                write!(f, "tdigest: invalid allocator state: {}", what)
            }
            TdError::NonFiniteInput { context } => write!(
                f,
                "tdigest: non-finite values are not allowed ({}). \
hint: clean your data or drop NaN/±inf before building the digest",
                context
            ),
            TdError::WeightOverflow { context } => {
                write!(f, "tdigest: weight overflow ({}). hint: weights are u64 counts", context)
            }
            TdError::Invariant { what } => {
                write!(f, "tdigest: internal invariant violation: {}", what)
            }
        }
    }
}

impl std::error::Error for TdError {}

pub type TdResult<T> = Result<T, TdError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_context() {
        let e = TdError::NonFiniteInput {
            context: "sample value",
        };
        let s = e.to_string();
        assert!(s.contains("sample value"), "{s}");

        let e = TdError::InvalidArgument {
            what: "cannot remove NIL",
        };
        assert_eq!(e.to_string(), "tdigest: invalid argument: cannot remove NIL");

        let e = TdError::WeightOverflow {
            context: "total weight",
        };
        assert!(e.to_string().contains("total weight"));
    }
}
