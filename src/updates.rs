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

//! State update broadcasts.
//!
//! After every successful command the registry publishes the counter's
//! new snapshot here for whatever UI or telemetry layer observes it. The
//! queue is lock-free and preserves publish order, so observers see
//! transitions in the order they were applied.

use crate::counter::CounterSnapshot;
use crossbeam::queue::SegQueue;

/// Lock-free FIFO of counter state broadcasts.
#[derive(Debug, Default)]
pub struct UpdateQueue {
    updates: SegQueue<CounterSnapshot>,
}

impl UpdateQueue {
    /// Creates a new empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a snapshot to observers.
    pub fn publish(&self, snapshot: CounterSnapshot) {
        self.updates.push(snapshot);
    }

    /// Removes and returns the oldest unobserved snapshot.
    pub fn try_pop(&self) -> Option<CounterSnapshot> {
        self.updates.pop()
    }

    /// Drains all pending snapshots in publish order.
    pub fn drain(&self) -> Vec<CounterSnapshot> {
        let mut drained = Vec::with_capacity(self.updates.len());
        while let Some(snapshot) = self.updates.pop() {
            drained.push(snapshot);
        }
        drained
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}
