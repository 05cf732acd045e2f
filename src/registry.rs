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

//! Counter registry and command dispatch.
//!
//! The [`Registry`] owns every counter, keyed by (asset, unit kind). It
//! receives raw [`ServiceCall`]s, validates them into typed commands at
//! the boundary, applies them to the addressed counter, and then asks the
//! persistence collaborator to store the new value and publishes the
//! snapshot to observers.
//!
//! # Dispatch
//!
//! - [`Registry::dispatch`] addresses one counter. The counter reads only
//!   its own argument key and ignores the sibling's.
//! - [`Registry::dispatch_asset`] routes one call to the asset's counter
//!   pair: `reset`/`rollback` go to both; `refuel`/`calibrate` go to each
//!   counter whose argument is present in the call.

use crate::base::{AssetId, CounterKey, UnitKind};
use crate::command::{Command, CommandKind, ServiceCall};
use crate::counter::{CounterSnapshot, TrackedCounter};
use crate::error::CounterError;
use crate::store::{MemoryStore, ValueStore};
use crate::updates::UpdateQueue;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

/// Registry of tracked counters with persistence and broadcast wiring.
///
/// # Invariants
///
/// - Each registered asset owns exactly one cost counter and one quantity
///   counter.
/// - A command is validated before any counter mutates, and a successful
///   mutation is always followed by persist and broadcast.
/// - Counter history starts empty at registration, even when the value
///   was restored from the store.
pub struct Registry {
    /// Counters indexed by (asset, unit kind).
    counters: DashMap<CounterKey, TrackedCounter>,
    /// Durable store for current values.
    store: Arc<dyn ValueStore>,
    /// Broadcast queue of post-command snapshots.
    updates: UpdateQueue,
}

impl Registry {
    /// Creates a registry backed by the given persistence collaborator.
    pub fn new(store: Arc<dyn ValueStore>) -> Self {
        Self {
            counters: DashMap::new(),
            store,
            updates: UpdateQueue::new(),
        }
    }

    /// Creates a registry backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Registers an asset, creating its cost counter and its quantity
    /// counter of the given kind.
    ///
    /// Each counter's value is restored from the store when a prior value
    /// exists, else starts at zero. Registering an already known asset is
    /// a no-op for counters that exist.
    pub fn add_asset(&self, asset: AssetId, quantity: UnitKind) {
        self.add_asset_with_initial(asset, quantity, None, None);
    }

    /// Registers an asset with optional initial readings.
    ///
    /// Seeds are used (and persisted) only when the store has no prior
    /// value for the counter; a restored value always wins over a seed.
    pub fn add_asset_with_initial(
        &self,
        asset: AssetId,
        quantity: UnitKind,
        initial_cost: Option<Decimal>,
        initial_quantity: Option<Decimal>,
    ) {
        debug_assert!(quantity != UnitKind::Cost, "quantity kind must not be Cost");
        info!(%asset, %quantity, "registering asset counter pair");

        for (kind, seed) in [(UnitKind::Cost, initial_cost), (quantity, initial_quantity)] {
            let key = CounterKey::new(asset, kind);
            self.counters.entry(key).or_insert_with(|| {
                let value = match self.store.restore(&key) {
                    Some(restored) => restored,
                    None => {
                        let value = seed.unwrap_or(Decimal::ZERO);
                        if seed.is_some() {
                            self.store.persist(&key, value);
                        }
                        value
                    }
                };
                TrackedCounter::restore(asset, kind, value)
            });
        }
    }

    /// Drops an asset's counters. No teardown beyond releasing the
    /// in-memory instances; persisted values stay in the store.
    pub fn remove_asset(&self, asset: AssetId) {
        self.counters.retain(|key, _| key.asset != asset);
    }

    pub fn has_asset(&self, asset: AssetId) -> bool {
        self.counters.iter().any(|entry| entry.key().asset == asset)
    }

    /// Dispatches a raw call to one counter.
    ///
    /// Validation happens before any mutation; on success the new value is
    /// persisted and the snapshot broadcast.
    ///
    /// # Errors
    ///
    /// - [`CounterError::CounterNotFound`] - No counter registered under `key`.
    /// - [`CounterError::MissingArgument`] - Refuel/calibrate without this
    ///   counter's amount.
    /// - [`CounterError::InvalidNumber`] - Amount present but not strictly positive.
    /// - [`CounterError::EmptyHistory`] - Rollback with nothing to restore.
    pub fn dispatch(
        &self,
        key: &CounterKey,
        call: &ServiceCall,
    ) -> Result<CounterSnapshot, CounterError> {
        let counter = self
            .counters
            .get(key)
            .ok_or(CounterError::CounterNotFound(*key))?;
        let command = Command::from_call(call, key.kind)?;
        let snapshot = counter.apply(command)?;
        self.commit(&snapshot);
        Ok(snapshot)
    }

    /// Routes one call to the asset's counter pair.
    ///
    /// `reset` and `rollback` address both counters. `refuel` and
    /// `calibrate` address each counter whose argument key is present in
    /// the call; a call naming neither argument fails with
    /// [`CounterError::MissingArgument`] before anything mutates.
    ///
    /// All addressed commands are validated up front, so an invalid amount
    /// mutates neither counter. Rollback failures surface per counter, in
    /// key order.
    pub fn dispatch_asset(
        &self,
        asset: AssetId,
        call: &ServiceCall,
    ) -> Result<Vec<CounterSnapshot>, CounterError> {
        let mut keys: Vec<CounterKey> = self
            .counters
            .iter()
            .map(|entry| *entry.key())
            .filter(|key| key.asset == asset)
            .collect();
        if keys.is_empty() {
            return Err(CounterError::AssetNotFound(asset));
        }
        keys.sort();

        if matches!(call.kind, CommandKind::Refuel | CommandKind::Calibrate) {
            keys.retain(|key| call.has_arg(key.kind.arg_key()));
            if keys.is_empty() {
                return Err(CounterError::MissingArgument("amount"));
            }
        }

        // Validate every addressed command before applying any, so one
        // bad argument cannot leave the pair half-updated.
        let commands = keys
            .iter()
            .map(|key| Ok((*key, Command::from_call(call, key.kind)?)))
            .collect::<Result<Vec<_>, CounterError>>()?;

        let mut snapshots = Vec::with_capacity(commands.len());
        for (key, command) in commands {
            let counter = self
                .counters
                .get(&key)
                .ok_or(CounterError::CounterNotFound(key))?;
            let snapshot = counter.apply(command)?;
            self.commit(&snapshot);
            snapshots.push(snapshot);
        }
        Ok(snapshots)
    }

    /// Retrieves a counter by key.
    pub fn get(
        &self,
        key: &CounterKey,
    ) -> Option<dashmap::mapref::one::Ref<'_, CounterKey, TrackedCounter>> {
        self.counters.get(key)
    }

    /// Snapshots of every registered counter, sorted by key.
    pub fn snapshots(&self) -> Vec<CounterSnapshot> {
        let mut snapshots: Vec<_> = self
            .counters
            .iter()
            .map(|entry| entry.value().snapshot())
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.key);
        snapshots
    }

    /// The broadcast queue observers drain for state updates.
    pub fn updates(&self) -> &UpdateQueue {
        &self.updates
    }

    fn commit(&self, snapshot: &CounterSnapshot) {
        // Persistence runs strictly after the in-memory mutation and never
        // gates reads of the current value.
        self.store.persist(&snapshot.key, snapshot.value);
        self.updates.publish(snapshot.clone());
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::in_memory()
    }
}
