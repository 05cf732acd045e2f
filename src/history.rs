// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Bounded history of previously current values.
//!
//! Each counter snapshots its value here before every mutating command so
//! that rollback can restore it. The buffer is capped: once full, pushing
//! silently evicts the oldest entry. The bound keeps memory flat for
//! long-lived assets while still allowing several consecutive corrections
//! to be undone.

use crate::error::CounterError;
use rust_decimal::Decimal;
use std::collections::VecDeque;

/// Maximum number of historical values retained per counter.
pub const MAX_HISTORY: usize = 10;

/// Bounded deque of prior values, most recent last.
#[derive(Debug, Clone)]
pub struct ValueHistory {
    entries: VecDeque<Decimal>,
}

impl ValueHistory {
    /// Creates an empty history. History always starts empty, including
    /// after a restart; only the current value survives persistence.
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_HISTORY),
        }
    }

    /// Appends a value, evicting the oldest entry when at capacity.
    pub fn push(&mut self, value: Decimal) {
        if self.entries.len() == MAX_HISTORY {
            self.entries.pop_front();
        }
        self.entries.push_back(value);
    }

    /// Removes and returns the most recently pushed value.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::EmptyHistory`] when nothing has been pushed.
    pub fn pop(&mut self) -> Result<Decimal, CounterError> {
        self.entries.pop_back().ok_or(CounterError::EmptyHistory)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ValueHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn push_then_pop_returns_last_value() {
        let mut history = ValueHistory::new();
        history.push(dec!(1.0));
        history.push(dec!(2.0));
        assert_eq!(history.pop().unwrap(), dec!(2.0));
        assert_eq!(history.pop().unwrap(), dec!(1.0));
        assert!(history.is_empty());
    }

    #[test]
    fn pop_on_empty_fails() {
        let mut history = ValueHistory::new();
        assert_eq!(history.pop(), Err(CounterError::EmptyHistory));
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut history = ValueHistory::new();
        for i in 0..=MAX_HISTORY {
            history.push(Decimal::from(i as u32));
        }
        assert_eq!(history.len(), MAX_HISTORY);

        // Entry 0 was evicted; draining yields 10 down to 1.
        for expected in (1..=MAX_HISTORY).rev() {
            assert_eq!(history.pop().unwrap(), Decimal::from(expected as u32));
        }
        assert_eq!(history.pop(), Err(CounterError::EmptyHistory));
    }

    #[test]
    fn len_never_exceeds_capacity() {
        let mut history = ValueHistory::new();
        for i in 0..100u32 {
            history.push(Decimal::from(i));
            assert!(history.len() <= MAX_HISTORY);
        }
    }
}
