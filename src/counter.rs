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

//! The tracked counter state machine.
//!
//! A counter's state is the pair (`current_value`, `history`). Four
//! commands transition it:
//!
//! | Command | Effect |
//! |---------|--------|
//! | `Reset` | push current value, set to zero |
//! | `Refuel` | push current value, add amount |
//! | `Calibrate` | push current value, overwrite with amount |
//! | `Rollback` | pop history tail, restore it |
//!
//! Every successful transition pushes the pre-transition value first, so a
//! rollback restores exactly the value that was current before the last
//! command. Rollback itself never pushes: there is no redo stack, and two
//! rollbacks in a row pop two historical entries.
//!
//! # Example
//!
//! ```
//! use fuel_tracker_rs::{AssetId, Command, TrackedCounter, UnitKind};
//! use rust_decimal_macros::dec;
//!
//! let counter = TrackedCounter::new(AssetId(1), UnitKind::Fuel);
//! counter.apply(Command::Refuel { amount: dec!(32.5) }).unwrap();
//! assert_eq!(counter.value(), dec!(32.5));
//! ```

use crate::base::{AssetId, CounterKey, UnitKind};
use crate::command::Command;
use crate::error::CounterError;
use crate::history::ValueHistory;
use crate::profile::UnitProfile;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::{debug, info, warn};

#[derive(Debug)]
struct CounterData {
    key: CounterKey,
    value: Decimal,
    history: ValueHistory,
}

impl CounterData {
    fn new(key: CounterKey, value: Decimal) -> Self {
        Self {
            key,
            value,
            history: ValueHistory::new(),
        }
    }

    /// Stores the current value in history before a mutating command.
    fn store_current(&mut self) {
        self.history.push(self.value);
        debug!(
            counter = %self.key,
            value = %self.value,
            history_size = self.history.len(),
            "stored value in history"
        );
    }

    fn reset(&mut self) {
        self.store_current();
        self.value = Decimal::ZERO;
    }

    /// Accumulates a refuel delta. Amounts are validated strictly positive
    /// at the dispatch boundary before they reach this point.
    fn refuel(&mut self, amount: Decimal) {
        debug_assert!(amount > Decimal::ZERO, "refuel amount must be positive: {amount}");
        self.store_current();
        self.value += amount;
    }

    /// Overwrites the value to an exact externally known reading.
    fn calibrate(&mut self, amount: Decimal) {
        debug_assert!(amount > Decimal::ZERO, "calibrate amount must be positive: {amount}");
        self.store_current();
        self.value = amount;
    }

    fn rollback(&mut self) -> Result<(), CounterError> {
        // Pop before touching the value, so a failure mutates nothing.
        let previous = self.history.pop().map_err(|e| {
            warn!(counter = %self.key, "no history available for rollback");
            e
        })?;
        info!(
            counter = %self.key,
            from = %self.value,
            to = %previous,
            remaining = self.history.len(),
            "rolling back"
        );
        self.value = previous;
        Ok(())
    }
}

/// A stateful counter with bounded undo history.
///
/// One instance exists per (asset, unit kind) pair; the asset's cost and
/// quantity counters are peer instances of this one type, differing only
/// in their [`UnitProfile`]. Each command is a single in-memory mutation
/// guarded by a mutex spanning the full transition, so callers in
/// environments without serialized delivery still observe atomic commands.
#[derive(Debug)]
pub struct TrackedCounter {
    key: CounterKey,
    profile: UnitProfile,
    inner: Mutex<CounterData>,
}

impl TrackedCounter {
    /// Decimal places shown on the diagnostics surface.
    pub const DECIMAL_PRECISION: u32 = 3;

    /// Creates a counter starting at zero with empty history.
    pub fn new(asset: AssetId, kind: UnitKind) -> Self {
        Self::restore(asset, kind, Decimal::ZERO)
    }

    /// Creates a counter with a value restored from durable storage.
    ///
    /// History is not persisted and always starts empty after a restart.
    pub fn restore(asset: AssetId, kind: UnitKind, value: Decimal) -> Self {
        let key = CounterKey::new(asset, kind);
        Self {
            key,
            profile: UnitProfile::for_kind(kind),
            inner: Mutex::new(CounterData::new(key, value)),
        }
    }

    pub fn key(&self) -> CounterKey {
        self.key
    }

    pub fn profile(&self) -> &UnitProfile {
        &self.profile
    }

    /// The authoritative present reading.
    pub fn value(&self) -> Decimal {
        self.inner.lock().value
    }

    pub fn history_size(&self) -> usize {
        self.inner.lock().history.len()
    }

    /// Whether a rollback would currently succeed.
    pub fn can_rollback(&self) -> bool {
        !self.inner.lock().history.is_empty()
    }

    /// Applies one validated command atomically.
    ///
    /// On success returns the post-transition snapshot for persistence and
    /// broadcast. On failure the value and history are left exactly as
    /// they were before the call.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::EmptyHistory`] when a rollback finds
    /// nothing to restore.
    pub fn apply(&self, command: Command) -> Result<CounterSnapshot, CounterError> {
        let mut data = self.inner.lock();
        match command {
            Command::Reset => data.reset(),
            Command::Refuel { amount } => data.refuel(amount),
            Command::Calibrate { amount } => data.calibrate(amount),
            Command::Rollback => data.rollback()?,
        }
        Ok(CounterSnapshot {
            key: self.key,
            unit: self.profile.unit,
            value: data.value,
            history_size: data.history.len(),
            can_rollback: !data.history.is_empty(),
        })
    }

    /// The current observable state, without mutating anything.
    pub fn snapshot(&self) -> CounterSnapshot {
        let data = self.inner.lock();
        CounterSnapshot {
            key: self.key,
            unit: self.profile.unit,
            value: data.value,
            history_size: data.history.len(),
            can_rollback: !data.history.is_empty(),
        }
    }
}

/// Observable state of a counter after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub key: CounterKey,
    pub unit: &'static str,
    pub value: Decimal,
    pub history_size: usize,
    pub can_rollback: bool,
}

impl Serialize for CounterSnapshot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("CounterSnapshot", 6)?;
        state.serialize_field("asset", &self.key.asset)?;
        state.serialize_field("kind", &self.key.kind)?;
        state.serialize_field("unit", &self.unit)?;
        state.serialize_field(
            "value",
            &self.value.round_dp(TrackedCounter::DECIMAL_PRECISION),
        )?;
        state.serialize_field("history_size", &self.history_size)?;
        state.serialize_field("can_rollback", &self.can_rollback)?;
        state.end()
    }
}
