//! Code allocation for implicitly-coded declarations.
//!
//! Every scope owns a [`CodeCursor`]. A cursor starts unseeded; once seeded
//! with `code_start_at`, each implicit declaration takes the current value and
//! the cursor moves one step further away from zero:
//!
//! ```text
//! seed  100  ->  100, 101, 102, ...
//! seed   -1  ->   -1,  -2,  -3, ...
//! seed    0  ->    0,   1,   2, ...
//! ```
//!
//! The direction is fixed by the sign of the seed and never flips for the life
//! of the cursor.
//!
//! # Copy Semantics
//!
//! The cursor is `Copy`. A nested group receives its own copy, so whatever the
//! nested group allocates never leaks back into the parent: the parent resumes
//! exactly where it stopped.
//!
//! # Example
//!
//! ```rust
//! use business_errors::{CodeCursor, Direction};
//!
//! let mut cursor = CodeCursor::seeded(-10);
//! assert_eq!(cursor.direction(), Some(Direction::Descending));
//! assert_eq!(cursor.next(), Some(-10));
//! assert_eq!(cursor.next(), Some(-11));
//!
//! let mut unseeded = CodeCursor::UNSEEDED;
//! assert_eq!(unseeded.next(), None);
//! ```

use std::fmt;

/// Direction a seeded cursor moves in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Non-negative seed: codes grow.
    Ascending,
    /// Negative seed: codes shrink.
    Descending,
}

/// Per-scope code counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CodeCursor(Option<i64>);

impl CodeCursor {
    /// A cursor that has never been seeded.
    pub const UNSEEDED: Self = Self(None);

    /// Create a cursor whose first allocation is `seed`.
    #[inline]
    pub const fn seeded(seed: i64) -> Self {
        Self(Some(seed))
    }

    /// Check whether a seed has been set.
    #[inline]
    pub const fn is_seeded(&self) -> bool {
        self.0.is_some()
    }

    /// The code the next allocation would return.
    #[inline]
    pub const fn peek(&self) -> Option<i64> {
        self.0
    }

    /// Allocation direction, if seeded.
    #[inline]
    pub const fn direction(&self) -> Option<Direction> {
        match self.0 {
            Some(code) if code < 0 => Some(Direction::Descending),
            Some(_) => Some(Direction::Ascending),
            None => None,
        }
    }

    /// Hand out the current code and advance.
    ///
    /// Returns `None` when the cursor was never seeded; callers turn that into
    /// [`crate::Error::MissingCodeSeed`] with the declaration's context.
    ///
    /// Codes saturate at the `i64` bounds rather than wrapping across zero.
    #[allow(clippy::should_implement_trait)]
    #[inline]
    pub fn next(&mut self) -> Option<i64> {
        let code = self.0?;
        self.0 = Some(if code < 0 {
            code.saturating_sub(1)
        } else {
            code.saturating_add(1)
        });
        Some(code)
    }
}

impl From<i64> for CodeCursor {
    fn from(seed: i64) -> Self {
        Self::seeded(seed)
    }
}

impl fmt::Display for CodeCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, "{code}"),
            None => f.write_str("<unseeded>"),
        }
    }
}
