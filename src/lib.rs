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

//! # Fuel Tracker
//!
//! This library tracks cumulative metered quantities per asset (vehicle):
//! money spent on fuel plus the fuel volume, electric charge, or weight
//! added. Each asset carries a pair of [`TrackedCounter`]s — one cost, one
//! quantity — driven by four commands: `reset`, `refuel`, `calibrate`, and
//! `rollback` against a bounded undo history.
//!
//! ## Core Components
//!
//! - [`TrackedCounter`]: Stateful counter with a bounded undo history
//! - [`Registry`]: Counter registry wiring dispatch, persistence, and broadcasts
//! - [`ServiceCall`] / [`Command`]: Loosely typed inbound calls and their
//!   validated command forms
//! - [`ValueStore`]: Persistence collaborator restoring current values
//!   across restarts (history is ephemeral)
//! - [`CounterError`]: Recoverable command failures
//!
//! ## Example
//!
//! ```
//! use fuel_tracker_rs::{AssetId, CommandKind, CounterKey, Registry, ServiceCall, UnitKind};
//! use rust_decimal_macros::dec;
//!
//! let registry = Registry::in_memory();
//! registry.add_asset(AssetId(1), UnitKind::Fuel);
//!
//! // One refuel carries arguments for both counters of the pair.
//! let call = ServiceCall::new(CommandKind::Refuel)
//!     .with_arg("cost", "54.30")
//!     .with_arg("fuel", "32.1");
//! registry.dispatch_asset(AssetId(1), &call).unwrap();
//!
//! let cost = CounterKey::new(AssetId(1), UnitKind::Cost);
//! assert_eq!((*registry.get(&cost).unwrap()).value(), dec!(54.30));
//! ```
//!
//! ## Concurrency
//!
//! The host is expected to deliver commands to one counter serially, but
//! each counter guards its full transition with a mutex and the registry
//! is shareable across threads, so the ordering invariant holds even
//! without that guarantee.

pub mod counter;
mod base;
mod command;
pub mod error;
pub mod history;
mod profile;
mod registry;
mod store;
mod updates;
pub mod validate;

pub use base::{AssetId, CounterKey, UnitKind};
pub use command::{Command, CommandKind, ServiceCall};
pub use counter::{CounterSnapshot, TrackedCounter};
pub use error::CounterError;
pub use history::{MAX_HISTORY, ValueHistory};
pub use profile::{DeviceClass, StateClass, UnitProfile};
pub use registry::Registry;
pub use store::{MemoryStore, ValueStore};
pub use updates::UpdateQueue;
