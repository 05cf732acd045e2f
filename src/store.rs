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

//! Persistence collaborator boundary.
//!
//! The registry asks the store to restore a counter's last known value at
//! creation and to persist the new value after every successful command.
//! Only the most recent value is kept per counter; history is never
//! persisted. The store is invoked strictly after the in-memory mutation,
//! so its failures can never leave a counter inconsistent with what was
//! already pushed to history.

use crate::base::CounterKey;
use dashmap::DashMap;
use rust_decimal::Decimal;

/// External key/value store holding one value per counter identity.
pub trait ValueStore: Send + Sync {
    /// Returns the last persisted value for `key`, if any.
    fn restore(&self, key: &CounterKey) -> Option<Decimal>;

    /// Records `value` as the durable reading for `key`, replacing any
    /// previous one.
    fn persist(&self, key: &CounterKey, value: Decimal);
}

/// In-memory [`ValueStore`].
///
/// The default store for tests and for hosts that load and flush durable
/// state themselves (the CLI seeds it from a CSV file and writes it back
/// on exit).
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: DashMap<CounterKey, Decimal>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All persisted entries, sorted by key for deterministic output.
    pub fn entries(&self) -> Vec<(CounterKey, Decimal)> {
        let mut entries: Vec<_> = self
            .values
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect();
        entries.sort_by_key(|(key, _)| *key);
        entries
    }
}

impl ValueStore for MemoryStore {
    fn restore(&self, key: &CounterKey) -> Option<Decimal> {
        self.values.get(key).map(|value| *value)
    }

    fn persist(&self, key: &CounterKey, value: Decimal) {
        self.values.insert(*key, value);
    }
}
