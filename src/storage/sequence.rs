//! Auto-increment sequences

use serde::{Deserialize, Serialize};

/// Counter behind an `AUTO_INCREMENT` column.
///
/// Generated values are strictly increasing for the lifetime of the table:
/// deleting rows never hands an id out again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoIncrement {
    next: i64,
}

impl AutoIncrement {
    /// A fresh sequence starting at 1
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Restore a sequence from a persisted next value
    pub fn starting_at(next: i64) -> Self {
        Self { next: next.max(1) }
    }

    /// Value the next generated row will receive
    pub fn peek(&self) -> i64 {
        self.next
    }

    /// Record that `value` was stored in the column.
    ///
    /// Explicit values at or beyond the counter move it past them.
    pub fn observe(&mut self, value: i64) {
        if value >= self.next {
            self.next = value.saturating_add(1);
        }
    }
}

impl Default for AutoIncrement {
    fn default() -> Self {
        Self::new()
    }
}
